// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Duplicate detection for candidate contacts against an existing list.
//!
//! Runs at contact-list edit time (CSV import, clipboard paste), before any
//! dispatch starts. Equality is the normalized number; validity is never
//! consulted, so an invalid number can still be unique and is surfaced to
//! the operator for correction instead of being silently dropped.

use std::collections::HashSet;

use crate::types::Contact;
use crate::validate::normalize_number;

/// Result of partitioning candidates into unique and duplicate contacts.
/// Both lists preserve the candidates' input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub unique: Vec<Contact>,
    pub duplicates: Vec<Contact>,
}

/// Partition `candidates` by whether their normalized number already occurs
/// in `existing`. Candidates are only compared against `existing`, never
/// against each other; repeats within one candidate list all stay unique.
pub fn partition(candidates: Vec<Contact>, existing: &[Contact]) -> Partition {
    let existing_numbers: HashSet<String> = existing
        .iter()
        .map(|c| normalize_number(&c.number))
        .collect();

    let mut result = Partition::default();
    for candidate in candidates {
        if existing_numbers.contains(&normalize_number(&candidate.number)) {
            result.duplicates.push(candidate);
        } else {
            result.unique.push(candidate);
        }
    }
    result
}
