// src/core/document/extract.rs
//
// Structures the raw text an OCR engine read off a card. The rules here are
// disambiguation policy, not parsing: OCR output is noisy and the cards
// carry several look-alike numbers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::validation::pan;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("digit pattern is valid"));

/// Pulls the Aadhaar number out of raw OCR text.
///
/// Spaces and hyphens are stripped first (the card groups the number as
/// `1234 5678 9012`), then maximal digit runs of exactly 12 digits are
/// candidates. The **last** run wins: the Aadhaar number is printed near
/// the bottom of the card, while enrollment and reference numbers appear
/// above it. Returns `None` when nothing matches; that is not an error.
pub fn extract_aadhaar_number(raw_text: &str) -> Option<String> {
    let cleaned: String = raw_text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    DIGIT_RUN
        .find_iter(&cleaned)
        .filter(|run| run.as_str().len() == 12)
        .last()
        .map(|run| run.as_str().to_string())
}

/// Pulls the PAN code out of raw OCR text.
///
/// Tokens are uppercased and stripped to letters and digits before the
/// shape check; the **first** matching token wins.
pub fn extract_pan_number(raw_text: &str) -> Option<String> {
    raw_text
        .split_whitespace()
        .map(|token| {
            token
                .to_ascii_uppercase()
                .chars()
                .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
                .collect::<String>()
        })
        .find(|token| pan::validate_pan_number(token))
}
