/// Rich-text case studies and embedded shortcodes

pub mod document;
pub mod shortcode;

pub use document::{collect_shortcodes, plain_text, DocumentRenderer};
pub use shortcode::{Segment, Shortcode};
