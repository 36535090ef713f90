use std::fmt;

/// An inclusive byte range `[start, end]` inside a container file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    /// The range covering `length` bytes from `offset`.
    ///
    /// `None` for an empty record or one that would run past `u64::MAX`.
    ///
    /// ```
    /// use cdx_fetch::ByteRange;
    ///
    /// let range = ByteRange::for_record(100, 50).unwrap();
    /// assert_eq!((range.start, range.end), (100, 149));
    /// assert_eq!(range.header_value(), "bytes=100-149");
    /// ```
    pub fn for_record(offset: u64, length: u64) -> Option<Self> {
        let last = length.checked_sub(1)?;
        let end = offset.checked_add(last)?;
        Some(Self { start: offset, end })
    }

    /// Number of bytes covered.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Never true; a range always covers at least one byte.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value for an HTTP `Range` request header.
    pub fn header_value(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_end() {
        let range = ByteRange::for_record(100, 50).unwrap();
        assert_eq!(range.end, 149);
        assert_eq!(range.len(), 50);
        assert_eq!(range.to_string(), "100-149");
    }

    #[test]
    fn single_byte_record() {
        let range = ByteRange::for_record(0, 1).unwrap();
        assert_eq!((range.start, range.end, range.len()), (0, 0, 1));
    }

    #[test]
    fn empty_or_overflowing_records_have_no_range() {
        assert_eq!(ByteRange::for_record(10, 0), None);
        assert_eq!(ByteRange::for_record(u64::MAX, 2), None);
        assert!(ByteRange::for_record(u64::MAX, 1).is_some());
    }
}
