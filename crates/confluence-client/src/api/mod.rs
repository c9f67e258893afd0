//! API endpoint implementations.

mod content;
mod search;
mod spaces;

pub use content::{ContentApi, PAGE_BATCH_SIZE};
pub use search::SearchApi;
pub use spaces::SpacesApi;
