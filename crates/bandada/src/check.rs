// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bandada check` command implementation.
//!
//! Validates a contact file offline: counts valid, invalid, placeholder and
//! duplicate rows and estimates how long a run would take with the current
//! pacing. Never touches the network.

use std::path::PathBuf;

use bandada_config::BandadaConfig;
use bandada_core::types::Contact;
use bandada_core::BandadaError;
use clap::Args;

use crate::contacts;

/// Arguments for `bandada check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// CSV file with `name,number` columns.
    #[arg(long)]
    pub contacts: PathBuf,
}

/// Counts for one contact file. Every row lands in exactly one bucket:
/// placeholder, duplicate, or sendable.
#[derive(Debug)]
struct FileSummary {
    total_rows: usize,
    placeholders: usize,
    duplicates: usize,
    sendable: Vec<Contact>,
}

fn summarize(loaded: Vec<Contact>) -> FileSummary {
    let total_rows = loaded.len();
    // Placeholder rows all normalize to a blank number, so they must leave
    // before repeat screening or the second one counts as a duplicate.
    let (placeholder_rows, rows): (Vec<_>, Vec<_>) =
        loaded.into_iter().partition(Contact::is_placeholder);
    let screened = contacts::screen_repeats(rows);
    FileSummary {
        total_rows,
        placeholders: placeholder_rows.len(),
        duplicates: screened.duplicates.len(),
        sendable: screened.unique,
    }
}

/// Run the `bandada check` command.
pub fn run_check(args: CheckArgs, config: &BandadaConfig) -> Result<(), BandadaError> {
    let loaded = contacts::load_contacts(&args.contacts)?;
    let summary = summarize(loaded);
    let sendable = &summary.sendable;
    let invalid: Vec<_> = sendable.iter().filter(|c| !c.is_valid).collect();
    let valid = sendable.len() - invalid.len();

    let pacing = config.sending;
    let batches = (sendable.len() as u64).div_ceil(u64::from(pacing.batch_size));
    let estimate_secs = if sendable.is_empty() {
        0
    } else {
        (batches - 1) * pacing.batch_delay_secs + sendable.len() as u64 * pacing.message_delay_secs
    };

    println!();
    println!("  {}", args.contacts.display());
    println!("  {}", "-".repeat(35));
    println!("    Rows:        {}", summary.total_rows);
    println!("    Sendable:    {}", sendable.len());
    println!("    Valid:       {valid}");
    println!("    Invalid:     {}", invalid.len());
    for contact in &invalid {
        println!("      {} ({})", contact.name, contact.number);
    }
    println!("    Duplicates:  {}", summary.duplicates);
    println!("    Placeholder: {}", summary.placeholders);
    println!();
    println!(
        "    Estimated run: {} batches, about {}",
        batches,
        format_duration(estimate_secs)
    );
    println!();
    Ok(())
}

/// Format seconds into a human-readable duration string.
fn format_duration(secs: u64) -> String {
    let minutes = secs / 60;
    let seconds = secs % 60;
    if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandada_core::types::ContactId;

    fn contact(id: &str, name: &str, number: &str) -> Contact {
        Contact {
            id: ContactId(id.to_string()),
            name: name.to_string(),
            number: number.to_string(),
            is_valid: bandada_core::validate::validate_number(number),
        }
    }

    #[test]
    fn blank_rows_all_count_as_placeholders() {
        // Two blank rows both normalize to an empty number; neither may leak
        // into the duplicate bucket.
        let summary = summarize(vec![
            contact("1", "", ""),
            contact("2", "", ""),
            contact("3", "Ana", "5511912345678"),
        ]);
        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.placeholders, 2);
        assert_eq!(summary.duplicates, 0);
        assert_eq!(summary.sendable.len(), 1);
    }

    #[test]
    fn repeated_numbers_count_as_duplicates() {
        let summary = summarize(vec![
            contact("1", "Ana", "5511912345678"),
            contact("2", "Ana again", "+55 11 91234-5678"),
        ]);
        assert_eq!(summary.placeholders, 0);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.sendable.len(), 1);
    }

    #[test]
    fn format_duration_seconds_only() {
        assert_eq!(format_duration(45), "45s");
    }

    #[test]
    fn format_duration_with_minutes() {
        assert_eq!(format_duration(156), "2m 36s");
    }
}
