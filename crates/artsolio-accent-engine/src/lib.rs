pub mod anchor;
pub mod attributes;
pub mod block;
pub mod css_value;
pub mod model;
pub mod render;
pub mod resolve;
pub mod store;
pub mod style;
pub mod variation;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use anchor::*;
pub use artsolio_accent_config::{OffsetStyle, PresetConfig, PresetLabel, PresetTable};
pub use block::*;
pub use css_value::{is_valid_length, sanitize_length};
pub use model::*;
pub use render::*;
pub use resolve::*;
pub use store::*;
pub use style::*;
pub use variation::*;
