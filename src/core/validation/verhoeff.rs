// src/core/validation/verhoeff.rs
//
// Verhoeff checksum over the dihedral group D5. Aadhaar numbers carry their
// check digit in the last position; the whole 12-digit string must reduce
// to 0 under the multiplication/permutation tables below.

/// Dihedral group D5 multiplication table.
const MULTIPLICATION: [[u8; 10]; 10] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 2, 3, 4, 0, 6, 7, 8, 9, 5],
    [2, 3, 4, 0, 1, 7, 8, 9, 5, 6],
    [3, 4, 0, 1, 2, 8, 9, 5, 6, 7],
    [4, 0, 1, 2, 3, 9, 5, 6, 7, 8],
    [5, 9, 8, 7, 6, 0, 4, 3, 2, 1],
    [6, 5, 9, 8, 7, 1, 0, 4, 3, 2],
    [7, 6, 5, 9, 8, 2, 1, 0, 4, 3],
    [8, 7, 6, 5, 9, 3, 2, 1, 0, 4],
    [9, 8, 7, 6, 5, 4, 3, 2, 1, 0],
];

/// Position-dependent digit permutation, cycling with period 8.
const PERMUTATION: [[u8; 10]; 8] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
    [1, 5, 7, 6, 2, 8, 3, 0, 9, 4],
    [5, 8, 0, 3, 7, 9, 6, 1, 4, 2],
    [8, 9, 1, 6, 0, 4, 3, 5, 2, 7],
    [9, 4, 5, 3, 1, 2, 6, 8, 7, 0],
    [4, 2, 8, 6, 5, 7, 3, 9, 0, 1],
    [2, 7, 9, 3, 8, 0, 6, 4, 1, 5],
    [7, 0, 4, 6, 9, 1, 3, 5, 8, 2],
];

/// Group inverses, needed only when generating a check digit.
const INVERSE: [u8; 10] = [0, 4, 3, 2, 1, 5, 6, 7, 8, 9];

/// Checks a 12-digit identifier against its trailing Verhoeff check digit.
///
/// Anything that is not exactly 12 ASCII digits is simply not a valid
/// number; that is a normal `false`, not an error.
pub fn validate(number: &str) -> bool {
    if number.len() != 12 || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let mut checksum = 0usize;
    for (position, byte) in number.bytes().rev().enumerate() {
        let digit = (byte - b'0') as usize;
        checksum = MULTIPLICATION[checksum][PERMUTATION[position % 8][digit] as usize] as usize;
    }
    checksum == 0
}

/// Computes the Verhoeff check digit for a digit payload.
///
/// Appending the returned digit to `payload` yields a string accepted by
/// [`validate`] (for an 11-digit payload). Returns `None` when the payload
/// is empty or contains non-digits.
pub fn checksum_digit(payload: &str) -> Option<u8> {
    if payload.is_empty() || !payload.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut checksum = 0usize;
    for (position, byte) in payload.bytes().rev().enumerate() {
        let digit = (byte - b'0') as usize;
        // The payload digits sit one position further left once the check
        // digit is appended.
        checksum =
            MULTIPLICATION[checksum][PERMUTATION[(position + 1) % 8][digit] as usize] as usize;
    }
    Some(INVERSE[checksum])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_valid_numbers() {
        assert!(validate("234567890124"));
        assert!(validate("998877665540"));
        assert!(validate("123456789010"));
        assert!(validate("100000039012"));
    }

    #[test]
    fn rejects_known_invalid_numbers() {
        assert!(!validate("123456789012"));
        assert!(!validate("234568890124"));
    }

    #[test]
    fn single_digit_flip_breaks_the_checksum() {
        assert!(validate("234567890124"));
        // flip the 6th digit (7 -> 8)
        assert!(!validate("234568890124"));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(!validate(""));
        assert!(!validate("12345678901")); // 11 digits
        assert!(!validate("1234567890123")); // 13 digits
        assert!(!validate("23456789012A"));
        assert!(!validate("2345 7890124"));
    }

    #[test]
    fn is_deterministic() {
        for number in ["234567890124", "123456789012", "000000000000"] {
            assert_eq!(validate(number), validate(number));
        }
    }

    #[test]
    fn generated_check_digit_round_trips() {
        assert_eq!(checksum_digit("23456789012"), Some(4));

        for payload in ["99887766554", "12345678901", "55566677788"] {
            let digit = checksum_digit(payload).unwrap();
            let full = format!("{}{}", payload, digit);
            assert!(validate(&full), "{} should validate", full);
        }
    }

    #[test]
    fn checksum_digit_rejects_non_digits() {
        assert_eq!(checksum_digit(""), None);
        assert_eq!(checksum_digit("12a45"), None);
    }
}
