//! Progress bar and summary reporting for CLI downloads.

use std::sync::{Mutex, PoisonError};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::download::{DownloadJob, DownloadOutcome};
use crate::format::{display_name, format_bytes, format_duration};
use crate::integrity::FileState;
use crate::progress::ProgressReporter;
use crate::stats::SessionStats;

const SEPARATOR: &str = "────────────────────────────────────────────────────────────";

/// Quoted, elided name padded for column alignment.
fn label(job: &DownloadJob) -> String {
    format!("{:<60}", format!("\"{}\"", display_name(&job.file_name)))
}

/// Creates a progress bar for a single file download.
pub fn make_progress_bar(size: Option<u64>, name: &str) -> ProgressBar {
    let bar = match size {
        Some(size) => {
            let bar = ProgressBar::new(size);
            bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.yellow} [{bar:50.yellow/blue}] {percent:>3}% {bytes}/{total_bytes} @ {bytes_per_sec} - {msg}",
                )
                .expect("progress template is valid")
                .progress_chars("━━╌"),
            );
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner:.yellow} {bytes} @ {bytes_per_sec} - {msg}")
                    .expect("spinner template is valid"),
            );
            bar
        }
    };
    bar.set_message(name.to_string());
    bar
}

/// Terminal reporter: one bar per transfer, one status line per job.
#[derive(Debug, Default)]
pub struct ConsoleProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl ConsoleProgress {
    /// Creates a reporter with no active bar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn on_start(&self, job: &DownloadJob, expected_size: Option<u64>, state: FileState) {
        if let FileState::Corrupted { local_size } = state {
            println!(
                "{} File {} already exists but is corrupted ({} on disk), downloading it again",
                style("!").yellow().bold(),
                style(label(job)).yellow(),
                format_bytes(local_size)
            );
        }
        let bar = make_progress_bar(expected_size, &display_name(&job.file_name));
        *self.bar.lock().unwrap_or_else(PoisonError::into_inner) = Some(bar);
    }

    fn on_chunk(&self, _job: &DownloadJob, bytes_so_far: u64) {
        if let Some(bar) = self
            .bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
        {
            bar.set_position(bytes_so_far);
        }
    }

    fn on_done(&self, job: &DownloadJob, outcome: &DownloadOutcome) {
        let bar = self.take_bar();
        match outcome {
            DownloadOutcome::SkippedComplete => println!(
                "{} File {} already exists, skipping this..",
                style("✓").green().bold(),
                style(label(job)).green()
            ),
            DownloadOutcome::Downloaded { bytes } | DownloadOutcome::Redownloaded { bytes } => {
                if let Some(bar) = bar {
                    bar.finish_and_clear();
                }
                println!(
                    "{} File ready {} {}",
                    style("✓").green().bold(),
                    style(label(job)).green(),
                    format_bytes(*bytes)
                );
            }
            DownloadOutcome::Failed { reason } => {
                if let Some(bar) = bar {
                    bar.abandon();
                }
                println!(
                    "{} {} {}",
                    style("✗").red().bold(),
                    style(format!("{:<60}", "Download failed")).red(),
                    style(reason).red()
                );
                println!("  Try to run again to start from this file");
            }
        }
    }
}

/// Prints a summary of download statistics.
pub fn print_summary(stats: &SessionStats) {
    if stats.total_jobs() == 0 {
        println!("No downloadable videos found at the requested resolution.");
        return;
    }

    println!("\n{SEPARATOR}");
    println!("Download Summary");
    println!("{SEPARATOR}");

    if stats.files_downloaded > 0 {
        println!("  Files downloaded:  {}", stats.files_downloaded);
    }
    if stats.files_redownloaded > 0 {
        println!("  Files repaired:    {}", stats.files_redownloaded);
    }
    if stats.files_downloaded + stats.files_redownloaded > 0 {
        println!("  Total size:        {}", format_bytes(stats.total_bytes));
        println!("  Total time:        {}", format_duration(stats.elapsed));
        println!(
            "  Average speed:     {}/s",
            format_bytes(stats.average_speed())
        );
    }
    if stats.files_skipped > 0 {
        println!("  Files skipped:     {} (already exist)", stats.files_skipped);
    }
    if stats.files_failed > 0 {
        println!(
            "  Files failed:      {}",
            style(stats.files_failed).red().bold()
        );
    }

    println!("{SEPARATOR}");
}
