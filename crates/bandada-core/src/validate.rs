// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Phone number validation and normalization.
//!
//! Pure functions with no error path; validity is always a boolean. Blank
//! numbers are deliberately valid so the contact table can hold rows that
//! are still being edited.

/// Returns true when `number` is an acceptable delivery identifier.
///
/// Three cases:
/// - Anything containing `@` is a resolved channel address (group or chat
///   id) and is always valid.
/// - A blank or whitespace-only number means "not yet specified" and is
///   valid.
/// - Otherwise, after stripping spaces, hyphens, and parentheses, an
///   optional leading `+` must be followed by 10 to 15 digits.
pub fn validate_number(number: &str) -> bool {
    if number.contains('@') {
        return true;
    }
    if number.trim().is_empty() {
        return true;
    }
    let cleaned = strip_formatting(number);
    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    (10..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

/// Normalize a number to the form the gateway expects.
///
/// Resolved channel addresses (containing `@`) pass through verbatim;
/// everything else loses formatting characters and any leading `+`. This is
/// also the dedup equality key, so it applies no canonicalization beyond
/// stripping.
pub fn normalize_number(number: &str) -> String {
    if number.contains('@') {
        return number.to_string();
    }
    let cleaned = strip_formatting(number);
    cleaned
        .strip_prefix('+')
        .map(str::to_string)
        .unwrap_or(cleaned)
}

fn strip_formatting(number: &str) -> String {
    number
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect()
}
