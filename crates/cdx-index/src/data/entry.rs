use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::endpoint::IndexEndpoint;

/// Descriptor of one archived capture, as returned by the index.
///
/// `offset` and `length` locate the gzip-framed record inside `filename`.
/// The index serves both as JSON strings; they are accepted as strings or
/// numbers and written back as strings. Fields this type does not model
/// (`timestamp`, `mime`, `status`, ...) are kept in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataEntry {
    pub urlkey: String,
    pub url: String,
    pub digest: String,
    pub filename: String,
    #[serde(with = "numeric")]
    pub offset: u64,
    #[serde(with = "numeric")]
    pub length: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MetadataEntry {
    /// Look up a pass-through field such as `timestamp` or `status`.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

/// The entries of one `(endpoint, page number)` pair, in server order.
#[derive(Debug, Clone)]
pub struct Page {
    pub endpoint: IndexEndpoint,
    pub number: u64,
    pub entries: Vec<MetadataEntry>,
}

mod numeric {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Numeric {
        Int(u64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        match Numeric::deserialize(deserializer)? {
            Numeric::Int(n) => Ok(n),
            Numeric::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("expected an unsigned integer, got {s:?}"))),
        }
    }

    pub fn serialize<S: Serializer>(value: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = r#"{"urlkey": "com,example)/", "timestamp": "20150302032705", "url": "http://example.com/", "mime": "text/html", "status": "200", "digest": "SHA1:ABC", "length": "1043", "offset": "2093", "filename": "crawl-data/CC-MAIN-2015-11/segments/1/warc/part-00001.warc.gz"}"#;

    #[test]
    fn decodes_index_line_with_string_numbers() {
        let entry: MetadataEntry = serde_json::from_str(LINE).unwrap();
        assert_eq!(entry.urlkey, "com,example)/");
        assert_eq!(entry.offset, 2093);
        assert_eq!(entry.length, 1043);
        assert_eq!(entry.field("status"), Some(&Value::from("200")));
        assert_eq!(entry.extra.len(), 3);
    }

    #[test]
    fn accepts_plain_numbers() {
        let entry: MetadataEntry = serde_json::from_str(
            r#"{"urlkey":"k","url":"u","digest":"d","filename":"f","offset":100,"length":50}"#,
        )
        .unwrap();
        assert_eq!((entry.offset, entry.length), (100, 50));
        assert!(entry.extra.is_empty());
    }

    #[test]
    fn rejects_missing_location_fields() {
        let result: Result<MetadataEntry, _> =
            serde_json::from_str(r#"{"urlkey":"k","url":"u","digest":"d","offset":"1","length":"2"}"#);
        assert!(result.is_err());

        let result: Result<MetadataEntry, _> = serde_json::from_str(
            r#"{"urlkey":"k","url":"u","digest":"d","filename":"f","offset":"-1","length":"2"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn serializes_back_with_pass_through_fields() {
        let entry: MetadataEntry = serde_json::from_str(LINE).unwrap();
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["offset"], "2093");
        assert_eq!(value["mime"], "text/html");
    }
}
