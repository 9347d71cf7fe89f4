// DayzWatch - app/cycle.rs
//
// One poll tick: select -> read -> extract -> summarise -> notify.
//
// Design principles:
// - The remote session lives in an inner scope and is dropped before the
//   (slow) summariser call, on success, early return, and `?` alike.
// - Absence (no file for today, nothing in the window) is an `Ok` outcome,
//   distinct from failures.
// - `tick` is the error boundary: it logs failures and never propagates them,
//   so the poll loop always reaches the next tick.
// - "Now" is always passed in; nothing here reads the clock.

use crate::app::source::{LogSession, LogSourceConnector, Notifier, Summarizer};
use crate::core::discovery;
use crate::core::filter::IgnoreRuleSet;
use crate::core::model::{LogLocation, LogNaming, LogWindow};
use crate::core::window;
use crate::util::constants::NOTIFICATION_TITLE;
use crate::util::error::Result;
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

/// What a successful tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// No file for today's date in the logs directory.
    NoLogFile,
    /// The file exists but nothing was written in the previous minute.
    NoNewLines { file: LogLocation },
    /// A summary of `lines` lines was delivered.
    Notified { file: LogLocation, lines: usize },
}

/// Where to look for logs and which lines to drop.
#[derive(Debug, Clone)]
pub struct CycleConfig {
    /// Remote directory holding the rotated log files.
    pub logs_path: String,
    pub naming: LogNaming,
    pub ignore: IgnoreRuleSet,
}

/// Composes the collaborators into the per-tick pipeline.
pub struct Monitor<C, S, N> {
    connector: C,
    summarizer: S,
    notifier: N,
    config: CycleConfig,
}

impl<C, S, N> Monitor<C, S, N>
where
    C: LogSourceConnector,
    S: Summarizer,
    N: Notifier,
{
    pub fn new(connector: C, summarizer: S, notifier: N, config: CycleConfig) -> Self {
        Self {
            connector,
            summarizer,
            notifier,
            config,
        }
    }

    /// Run one full cycle for a tick observed at `now`.
    ///
    /// Today's file is chosen from `now`'s calendar date in its own zone.
    pub fn run_once<Tz>(&self, now: &DateTime<Tz>) -> Result<CycleOutcome>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        tracing::debug!(now = %now, "Starting log cycle");

        let (location, lines) = {
            let mut session = self.connector.connect()?;

            let entries = session.list(&self.config.logs_path)?;
            let target_date = now.date_naive();
            let Some(location) = discovery::select_location(
                &self.config.logs_path,
                &entries,
                target_date,
                &self.config.naming,
            ) else {
                tracing::warn!(
                    date = %target_date,
                    directory = %self.config.logs_path,
                    "No log files found for date"
                );
                return Ok(CycleOutcome::NoLogFile);
            };
            tracing::info!(file = %location, "Selected log file");

            let lines = session.read_lines(&location)?;
            tracing::debug!(file = %location, lines = lines.len(), "Read log file");
            (location, lines)
        };

        let Some(window) = window::extract(&self.config.ignore, &lines, now) else {
            return Ok(CycleOutcome::NoNewLines { file: location });
        };

        tracing::debug!(lines = window.lines.len(), "Sending log lines for analysis");
        let summary = self.summarizer.summarize(&window.lines)?;
        let message = compose_message(&window, &summary);
        self.notifier.send(&message)?;

        tracing::info!(file = %location, lines = window.lines.len(), "Sent notification");
        Ok(CycleOutcome::Notified {
            file: location,
            lines: window.lines.len(),
        })
    }

    /// Run one cycle and swallow its failure after logging it.
    ///
    /// Returns `None` when the cycle failed.
    pub fn tick<Tz>(&self, now: &DateTime<Tz>) -> Option<CycleOutcome>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        match self.run_once(now) {
            Ok(outcome) => {
                tracing::debug!(outcome = ?outcome, "Log cycle finished");
                Some(outcome)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error while processing log cycle");
                None
            }
        }
    }
}

/// Build the notification text: a heading with the window, then the summary.
pub fn compose_message<Tz>(window: &LogWindow<Tz>, summary: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{NOTIFICATION_TITLE} {} - {}\n{summary}",
        window.since.format("%Y-%m-%d %H:%M"),
        window.until.format("%H:%M"),
    )
}
