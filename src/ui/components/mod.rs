mod error_banner;
mod input;
mod search_field;

pub use error_banner::ErrorBanner;
pub use search_field::{FieldKey, SearchField};
