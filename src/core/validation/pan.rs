// src/core/validation/pan.rs
use once_cell::sync::Lazy;
use regex::Regex;

/// PAN structure: 5 letters, 4 digits, 1 letter. Example: ABCDE1234F.
static PAN_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("PAN pattern is valid")
});

/// Validates PAN structure after trimming and uppercasing.
///
/// Malformed input yields `false`, never an error.
pub fn validate_pan_number(pan: &str) -> bool {
    let pan = pan.trim().to_ascii_uppercase();
    if pan.len() != 10 {
        return false;
    }
    PAN_SHAPE.is_match(&pan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_pan() {
        assert!(validate_pan_number("ABCDE1234F"));
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert!(validate_pan_number("abcde1234f"));
        assert!(validate_pan_number("  ABCDE1234F  "));
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(!validate_pan_number("ABCD1234FF"));
        assert!(!validate_pan_number("ABCDE12345"));
        assert!(!validate_pan_number("1BCDE1234F"));
        assert!(!validate_pan_number("ABCDE1234"));
        assert!(!validate_pan_number("ABCDE1234FG"));
        assert!(!validate_pan_number(""));
    }

    #[test]
    fn rejects_embedded_punctuation() {
        assert!(!validate_pan_number("ABCDE-234F"));
        assert!(!validate_pan_number("ABC E1234F"));
    }
}
