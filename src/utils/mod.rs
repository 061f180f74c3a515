pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{board_slug_from_url, is_fetchable_url, resolve_url};
