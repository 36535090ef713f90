use url::Url;

use crate::data::IndexEndpoint;

/// URL of the metadata-only request answering "how many pages match".
pub fn page_count_url(endpoint: &IndexEndpoint, pattern: &str) -> Url {
    let mut url = endpoint.url().clone();
    url.query_pairs_mut()
        .append_pair("url", pattern)
        .append_pair("showNumPages", "true");
    url
}

/// URL of page `page` of the newline-delimited JSON listing.
pub fn page_url(endpoint: &IndexEndpoint, pattern: &str, page: u64) -> Url {
    let mut url = endpoint.url().clone();
    url.query_pairs_mut()
        .append_pair("url", pattern)
        .append_pair("output", "json")
        .append_pair("page", &page.to_string());
    url
}
