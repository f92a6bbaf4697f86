// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contact and variable file loading.
//!
//! Contacts come from a CSV file with `name,number` columns. Variables come
//! from a TOML file mapping each token name to its value pool.

use std::collections::BTreeMap;
use std::path::Path;

use bandada_core::dedup::{self, Partition};
use bandada_core::types::{Contact, ContactId, MessageVariable};
use bandada_core::validate::validate_number;
use bandada_core::BandadaError;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ContactRow {
    #[serde(default)]
    name: String,
    #[serde(default)]
    number: String,
}

/// Load contacts from a CSV file with `name,number` columns.
///
/// Every row becomes a [`Contact`] keyed by its 1-based row position;
/// validity is stamped at load time and never blocks the load itself.
pub fn load_contacts(path: &Path) -> Result<Vec<Contact>, BandadaError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| {
        BandadaError::Validation(format!("cannot read contact file {}: {e}", path.display()))
    })?;

    let mut contacts = Vec::new();
    for (index, row) in reader.deserialize::<ContactRow>().enumerate() {
        let row = row.map_err(|e| {
            BandadaError::Validation(format!("bad row {} in contact file: {e}", index + 1))
        })?;
        let is_valid = validate_number(&row.number);
        contacts.push(Contact {
            id: ContactId((index + 1).to_string()),
            name: row.name,
            number: row.number,
            is_valid,
        });
    }
    Ok(contacts)
}

/// Split freshly loaded rows into first occurrences and later repeats of
/// the same normalized number.
///
/// Each accepted row acts as the existing list for the rows after it, so
/// loading a file behaves like adding its rows to the contact list one at
/// a time. Callers must filter placeholder rows first; their blank numbers
/// would otherwise collide with each other.
pub fn screen_repeats(rows: Vec<Contact>) -> Partition {
    let mut result = Partition::default();
    for row in rows {
        let mut screened = dedup::partition(vec![row], &result.unique);
        result.unique.append(&mut screened.unique);
        result.duplicates.append(&mut screened.duplicates);
    }
    result
}

/// Load message variables from a TOML file.
///
/// The file maps each token name to its value pool:
///
/// ```toml
/// greeting = ["Hi", "Hello", "Hey"]
/// city = ["Lisbon", "Porto"]
/// ```
pub fn load_variables(path: &Path) -> Result<Vec<MessageVariable>, BandadaError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BandadaError::Validation(format!("cannot read variable file {}: {e}", path.display()))
    })?;
    let table: BTreeMap<String, Vec<String>> = toml::from_str(&content).map_err(|e| {
        BandadaError::Validation(format!("bad variable file {}: {e}", path.display()))
    })?;

    Ok(table
        .into_iter()
        .map(|(name, values)| MessageVariable {
            id: name.clone(),
            name,
            description: String::new(),
            values,
        })
        .collect())
}
