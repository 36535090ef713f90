/// File name for a record written under its URL: `/` becomes `_`, and
/// `.gz` is appended for records kept compressed.
pub fn record_file_name(url: &str, compressed: bool) -> String {
    let mut name = url.replace('/', "_");
    if compressed {
        name.push_str(".gz");
    }
    name
}
