pub mod normalize;
pub mod pattern;

pub use normalize::{normalize_id, WILDCARD};
pub use pattern::{is_pattern, Pattern};
