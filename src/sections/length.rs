//! Length section - checks password minimum length.

use super::SectionResult;

pub const MIN_LENGTH: usize = 8;

/// Checks if the password has at least [`MIN_LENGTH`] characters.
///
/// # Returns
/// - `Some(hint)` if password is too short
/// - `None` if password has sufficient length
pub fn length_section(password: &str) -> SectionResult {
    if password.chars().count() < MIN_LENGTH {
        return Some("at least 8 characters");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_section_too_short() {
        assert_eq!(length_section("Short1!"), Some("at least 8 characters"));
    }

    #[test]
    fn test_length_section_exactly_minimum() {
        assert_eq!(length_section("12345678"), None);
    }

    #[test]
    fn test_length_section_counts_characters() {
        assert_eq!(length_section("ééééééé"), Some("at least 8 characters"));
        assert_eq!(length_section("éééééééé"), None);
    }
}
