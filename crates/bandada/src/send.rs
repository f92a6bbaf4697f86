// SPDX-FileCopyrightText: 2026 Bandada Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `bandada send` command implementation.
//!
//! Loads contacts and the message payload, builds a dispatch job, and runs
//! it against the configured gateway with a live progress bar. Ctrl+C stops
//! the run at the next contact boundary; everything already sent stays in
//! the history database.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use bandada_config::BandadaConfig;
use bandada_core::types::{
    MediaDescriptor, MediaKind, MessagePayload, SendOptions, SendingConfig,
};
use bandada_core::BandadaError;
use bandada_engine::{DispatchEvent, DispatchJob, Dispatcher, LogStatus, RunSummary};
use bandada_gateway::EvolutionGateway;
use bandada_storage::SqliteHistory;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::contacts;

/// Arguments for `bandada send`.
#[derive(Args, Debug)]
pub struct SendArgs {
    /// CSV file with `name,number` columns.
    #[arg(long)]
    pub contacts: PathBuf,

    /// File holding the text message template.
    #[arg(long, conflicts_with_all = ["media", "voice"])]
    pub message: Option<PathBuf>,

    /// Media URL or base64 payload to attach.
    #[arg(long, requires = "media_kind", conflicts_with = "voice")]
    pub media: Option<String>,

    /// Kind of media attachment: image, video, document or audio.
    #[arg(long)]
    pub media_kind: Option<MediaKind>,

    /// MIME type of the media payload.
    #[arg(long)]
    pub mime_type: Option<String>,

    /// Caption shown under the media attachment.
    #[arg(long)]
    pub caption: Option<String>,

    /// File name shown for document attachments.
    #[arg(long)]
    pub file_name: Option<String>,

    /// Voice note URL or base64 payload.
    #[arg(long)]
    pub voice: Option<String>,

    /// Ask the gateway to re-encode the voice note.
    #[arg(long)]
    pub encoding: bool,

    /// TOML file mapping variable names to value pools.
    #[arg(long)]
    pub variables: Option<PathBuf>,

    /// Render link previews for URLs in the message body.
    #[arg(long)]
    pub link_preview: bool,

    /// Contacts per batch (1-20). Defaults to the configured value.
    #[arg(long)]
    pub batch_size: Option<u32>,

    /// Seconds between batches (30-300). Defaults to the configured value.
    #[arg(long)]
    pub batch_delay: Option<u64>,

    /// Seconds between contacts (1-30). Defaults to the configured value.
    #[arg(long)]
    pub message_delay: Option<u64>,
}

/// Run the `bandada send` command.
pub async fn run_send(args: SendArgs, config: &BandadaConfig) -> Result<(), BandadaError> {
    let payload = build_payload(&args)?;

    let loaded = contacts::load_contacts(&args.contacts)?;
    // Placeholder rows carry blank numbers and would collide with each other
    // during repeat screening; the job drops them anyway.
    let rows: Vec<_> = loaded
        .into_iter()
        .filter(|c| !c.is_placeholder())
        .collect();
    let screened = contacts::screen_repeats(rows);
    if !screened.duplicates.is_empty() {
        info!(
            skipped = screened.duplicates.len(),
            "duplicate numbers removed from the contact list"
        );
    }

    let variables = match &args.variables {
        Some(path) => contacts::load_variables(path)?,
        None => Vec::new(),
    };

    let pacing = SendingConfig {
        batch_size: args.batch_size.unwrap_or(config.sending.batch_size),
        batch_delay_secs: args.batch_delay.unwrap_or(config.sending.batch_delay_secs),
        message_delay_secs: args
            .message_delay
            .unwrap_or(config.sending.message_delay_secs),
    };

    let options = SendOptions {
        link_preview: args.link_preview,
        ..SendOptions::default()
    };

    let job = DispatchJob::new(screened.unique, payload, variables, options, pacing)?;

    let gateway = build_gateway(config)?;
    let history = open_history(config).await?;
    let dispatcher = Dispatcher::new(Arc::new(gateway), Arc::new(history));

    let cancel = crate::install_signal_handler();
    let (mut handle, task) = dispatcher.dispatch(job, cancel);

    info!(
        total = handle.progress.borrow().total,
        batches = handle.progress.borrow().total_batches,
        "dispatch started"
    );

    let bar = ProgressBar::new(handle.progress.borrow().total as u64);
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner} [{bar:30}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> "),
    );

    while let Some(event) = handle.events.recv().await {
        match event {
            DispatchEvent::BatchStarted {
                batch,
                total_batches,
                remaining_secs,
            } => {
                bar.println(format!(
                    "batch {batch}/{total_batches} (about {remaining_secs}s remaining)"
                ));
            }
            DispatchEvent::Log(entry) => match entry.status {
                LogStatus::Pending => bar.set_message(entry.contact_name),
                LogStatus::Success => bar.inc(1),
                LogStatus::Failure => {
                    bar.println(format!("  failed: {}: {}", entry.contact_name, entry.message));
                    bar.inc(1);
                }
            },
            DispatchEvent::HistoryFlushFailed { error } => {
                warn!(%error, "history flush failed, will retry with the next batch");
            }
            DispatchEvent::Finished(_) => break,
        }
    }
    bar.finish_and_clear();

    let failed = handle.progress.borrow().failed.clone();
    let summary = task
        .await
        .map_err(|e| BandadaError::Internal(format!("dispatch task panicked: {e}")))?;

    print_report(&summary, &failed);
    Ok(())
}

fn build_payload(args: &SendArgs) -> Result<MessagePayload, BandadaError> {
    if let Some(path) = &args.message {
        let text = std::fs::read_to_string(path).map_err(|e| {
            BandadaError::Validation(format!("cannot read message file {}: {e}", path.display()))
        })?;
        return Ok(MessagePayload::Text { text });
    }
    if let Some(media) = &args.media {
        let kind = args.media_kind.ok_or_else(|| {
            BandadaError::Validation("--media requires --media-kind".to_string())
        })?;
        return Ok(MessagePayload::Media(MediaDescriptor {
            kind,
            media: media.clone(),
            mime_type: args.mime_type.clone(),
            caption: args.caption.clone(),
            file_name: args.file_name.clone(),
        }));
    }
    if let Some(voice) = &args.voice {
        return Ok(MessagePayload::Voice {
            audio: voice.clone(),
            encoding: args.encoding,
        });
    }
    Err(BandadaError::Validation(
        "pass one of --message, --media or --voice".to_string(),
    ))
}

fn build_gateway(config: &BandadaConfig) -> Result<EvolutionGateway, BandadaError> {
    let gateway = &config.gateway;
    let server_url = gateway.server_url.as_deref().ok_or_else(|| {
        BandadaError::Config("set gateway.server_url in bandada.toml".to_string())
    })?;
    let api_key = gateway
        .api_key
        .as_deref()
        .ok_or_else(|| BandadaError::Config("set gateway.api_key in bandada.toml".to_string()))?;
    let instance = gateway.instance.as_deref().ok_or_else(|| {
        BandadaError::Config("set gateway.instance in bandada.toml".to_string())
    })?;

    EvolutionGateway::with_timeout(
        server_url,
        api_key,
        instance,
        Duration::from_secs(gateway.request_timeout_secs),
    )
}

async fn open_history(config: &BandadaConfig) -> Result<SqliteHistory, BandadaError> {
    let path = std::path::Path::new(&config.storage.database_path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BandadaError::Config(format!(
                    "cannot create history directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
    }
    SqliteHistory::open(path).await
}

fn print_report(summary: &RunSummary, failed: &[(bandada_core::types::Contact, String)]) {
    println!();
    println!("  run {}", summary.batch_id);
    println!("  {}", "-".repeat(35));
    println!("    Sent:     {}/{}", summary.sent, summary.total);
    if summary.failed > 0 {
        println!("    Failed:   {}", summary.failed);
        for (contact, error) in failed {
            println!("      {} ({}): {}", contact.name, contact.number, error);
        }
    }
    if summary.cancelled {
        println!("    Stopped early by request.");
    }
    if !summary.history_flushed {
        println!("    Warning: some outcomes could not be written to history.");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use bandada_core::types::{BatchId, Contact, ContactId};
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: SendArgs,
    }

    fn parse(args: &[&str]) -> SendArgs {
        let mut full = vec!["test"];
        full.extend_from_slice(args);
        Harness::parse_from(full).args
    }

    #[test]
    fn media_payload_requires_kind_flag() {
        let args = parse(&[
            "--contacts",
            "c.csv",
            "--media",
            "https://example.com/a.png",
            "--media-kind",
            "image",
            "--caption",
            "hi",
        ]);
        let payload = build_payload(&args).unwrap();
        assert!(matches!(
            payload,
            MessagePayload::Media(MediaDescriptor {
                kind: MediaKind::Image,
                ..
            })
        ));
    }

    #[test]
    fn voice_payload_carries_encoding_flag() {
        let args = parse(&["--contacts", "c.csv", "--voice", "base64data", "--encoding"]);
        let payload = build_payload(&args).unwrap();
        assert_eq!(
            payload,
            MessagePayload::Voice {
                audio: "base64data".to_string(),
                encoding: true,
            }
        );
    }

    #[test]
    fn missing_payload_is_rejected() {
        let args = parse(&["--contacts", "c.csv"]);
        assert!(build_payload(&args).is_err());
    }

    #[test]
    fn report_lists_failures() {
        let summary = RunSummary {
            batch_id: BatchId::new(),
            total: 3,
            sent: 2,
            failed: 1,
            cancelled: false,
            history_flushed: true,
        };
        let failed = vec![(
            Contact {
                id: ContactId("1".to_string()),
                name: "Ana".to_string(),
                number: "123".to_string(),
                is_valid: false,
            },
            "invalid phone number".to_string(),
        )];
        // Smoke test: must not panic while formatting.
        print_report(&summary, &failed);
    }
}
