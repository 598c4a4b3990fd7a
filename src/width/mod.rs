//! Display width helpers used when clipping tile labels.

mod utils;

pub use utils::{display_width, truncate_to_width};
