use std::io::{self, Read};

use flate2::read::GzDecoder;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decompress one gzip member.
///
/// Container records are individually gzip framed; anything without a gzip
/// header is rejected rather than guessed at.
pub fn gunzip(member: &[u8]) -> io::Result<Vec<u8>> {
    if !member.starts_with(&GZIP_MAGIC) {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "missing gzip header"));
    }

    let mut decoder = GzDecoder::new(member);
    let mut out = Vec::with_capacity(member.len().saturating_mul(4));
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
