//! Pure transformations: request URLs, response decoding, scheduling, backoff.

mod decode;
mod query;
mod retry;
mod schedule;

pub use decode::{PageCount, decode_page, decode_page_count};
pub use query::{page_count_url, page_url};
pub use retry::retry_delay;
pub use schedule::{PagePlan, PageTask};
