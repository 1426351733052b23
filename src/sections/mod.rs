//! Password strength sections
//!
//! Each section checks one criterion and is worth one point.

mod length;
mod variety;

pub use length::length_section;
pub use variety::{digit_section, lowercase_section, special_section, uppercase_section};

/// Result type for section functions.
/// - `None` - criterion met
/// - `Some(hint)` - criterion unmet, with a short description of what is missing
pub type SectionResult = Option<&'static str>;
