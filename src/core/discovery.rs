// DayzWatch - core/discovery.rs
//
// Selection of the active log file for a calendar day.
//
// Architecture note: this module only looks at file *names*. Listing the
// directory and reading the chosen file belong to the app layer, which owns
// the remote session.
//
// The server rotates its admin log several times a day, producing files such
// as `DayZServer_2024-01-01_10-00-00.ADM` and `DayZServer_2024-01-01_16-30-12.ADM`.
// The suffix after the date is assumed to sort chronologically, so the
// lexicographically greatest name is the one currently being written. That
// assumption is documented, not verified.

use crate::core::model::{LogLocation, LogNaming};
use chrono::NaiveDate;

/// Pick the active log file name for `target_date` out of `entries`.
///
/// Candidates must start with `<prefix>_<YYYY-MM-DD>_` and end with
/// `.<extension>`. Returns `None` when no entry qualifies.
pub fn select<'a, I, S>(entries: I, target_date: NaiveDate, naming: &LogNaming) -> Option<String>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + ?Sized + 'a,
{
    let prefix = naming.date_prefix(target_date);
    let suffix = naming.suffix();

    entries
        .into_iter()
        .map(|name: &'a S| -> &'a str { name.as_ref() })
        .filter(|name| name.starts_with(&prefix) && name.ends_with(&suffix))
        .max()
        .map(str::to_string)
}

/// Like [`select`], wrapped into a [`LogLocation`] under `directory`.
pub fn select_location<'a, I, S>(
    directory: &str,
    entries: I,
    target_date: NaiveDate,
    naming: &LogNaming,
) -> Option<LogLocation>
where
    I: IntoIterator<Item = &'a S>,
    S: AsRef<str> + ?Sized + 'a,
{
    let filename = select(entries, target_date, naming)?;
    Some(LogLocation {
        directory: directory.to_string(),
        filename,
    })
}
