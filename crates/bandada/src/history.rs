// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bandada history` command implementation.
//!
//! Reads past dispatch outcomes from the SQLite history database, newest
//! first, optionally filtered to one run.

use bandada_config::BandadaConfig;
use bandada_core::types::{BatchId, HistoryRecord};
use bandada_core::BandadaError;
use bandada_storage::SqliteHistory;
use clap::Args;

/// Arguments for `bandada history`.
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Show only the records of one run.
    #[arg(long)]
    pub batch: Option<String>,

    /// Maximum number of records to print.
    #[arg(long, default_value_t = 50)]
    pub limit: usize,
}

/// Run the `bandada history` command.
pub async fn run_history(args: HistoryArgs, config: &BandadaConfig) -> Result<(), BandadaError> {
    let history = SqliteHistory::open(&config.storage.database_path).await?;

    let records = match &args.batch {
        Some(batch_id) => {
            history
                .records_for_batch(&BatchId(batch_id.clone()))
                .await?
        }
        None => history.all_records().await?,
    };

    if records.is_empty() {
        println!("no history records found");
        return Ok(());
    }

    for record in records.iter().take(args.limit) {
        print_record(record);
    }
    if records.len() > args.limit {
        println!("  ... {} more (use --limit)", records.len() - args.limit);
    }
    Ok(())
}

fn print_record(record: &HistoryRecord) {
    let when = record.sent_at.format("%Y-%m-%d %H:%M:%S");
    match &record.error_message {
        Some(error) => println!(
            "{when}  {:<7}  {} ({})  {}  [{}]",
            record.status.to_string(),
            record.contact.name,
            record.contact.number,
            error,
            record.batch_id
        ),
        None => println!(
            "{when}  {:<7}  {} ({})  {}  [{}]",
            record.status.to_string(),
            record.contact.name,
            record.contact.number,
            truncate(&record.message, 60),
            record.batch_id
        ),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}
