//! Character variety sections - uppercase, lowercase, digits, special chars.
//!
//! Character classes are ASCII: `é` is neither upper nor lower case here and
//! counts as a special character.

use super::SectionResult;

pub fn uppercase_section(password: &str) -> SectionResult {
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        return None;
    }
    Some("an uppercase letter")
}

pub fn lowercase_section(password: &str) -> SectionResult {
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        return None;
    }
    Some("a lowercase letter")
}

pub fn digit_section(password: &str) -> SectionResult {
    if password.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    Some("a number")
}

/// Anything outside `[A-Za-z0-9]` is special, including spaces.
pub fn special_section(password: &str) -> SectionResult {
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        return None;
    }
    Some("a special character")
}
