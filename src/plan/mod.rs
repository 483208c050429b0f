//! Backfill planning
//!
//! Resolves the four mutually exclusive date-input modes into one ordered
//! list of target dates, then derives a per-date commit plan (full ISO-8601
//! timestamp plus rendered message). Pure calendar arithmetic; git is only
//! consulted by the caller to feed auto mode.

use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, Days, NaiveDate, Utc};

/// Placeholder substituted with the bare date in the message template.
pub const DATE_PLACEHOLDER: &str = "{date}";

/// The four date-input modes, in precedence order. Resolved once at startup;
/// exactly one is active per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateSpec {
    /// Explicit dates, used verbatim (malformed entries skipped later).
    List(Vec<String>),
    /// Inclusive range, both bounds `YYYY-MM-DD`.
    Range { start: String, end: String },
    /// One date, `YYYY-MM-DD` or full ISO-8601 with a time designator.
    Single(String),
    /// Derive from the most recent commit up to today (UTC).
    Auto,
}

impl DateSpec {
    /// Pick the active mode from CLI inputs, first match wins.
    pub fn from_args(
        dates: Vec<String>,
        start: Option<String>,
        end: Option<String>,
        single: Option<String>,
        auto: bool,
    ) -> Result<Self> {
        if !dates.is_empty() {
            return Ok(DateSpec::List(dates));
        }
        if let (Some(start), Some(end)) = (start, end) {
            return Ok(DateSpec::Range { start, end });
        }
        if let Some(date) = single {
            return Ok(DateSpec::Single(date));
        }
        if auto {
            return Ok(DateSpec::Auto);
        }
        bail!("no target dates: pass --date, --dates, or --start-date/--end-date, or drop --no-auto")
    }
}

/// Strict `YYYY-MM-DD` check: exact shape and a real calendar date.
pub fn is_day(s: &str) -> bool {
    s.len() == 10 && NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn parse_day(s: &str) -> Result<NaiveDate> {
    if s.len() != 10 {
        bail!("'{s}' does not match YYYY-MM-DD");
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| anyhow!("'{s}' does not match YYYY-MM-DD"))
}

/// Normalize an ISO-8601 author timestamp to its UTC calendar date.
pub fn utc_day_of(iso: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(iso)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

/// Resolve a `DateSpec` into the ordered list of target date strings.
///
/// `last_commit_day` is only consulted in auto mode; None means the query
/// failed or the repository is empty, in which case yesterday is assumed.
/// An empty result is valid (nothing to do), not an error.
pub fn resolve_dates(
    spec: &DateSpec,
    last_commit_day: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<Vec<String>> {
    match spec {
        DateSpec::List(dates) => Ok(dates.clone()),
        DateSpec::Range { start, end } => {
            let start = parse_day(start)?;
            let end = parse_day(end)?;
            if start > end {
                bail!("start date {start} is after end date {end}");
            }
            Ok(start
                .iter_days()
                .take_while(|d| *d <= end)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect())
        }
        DateSpec::Single(date) => Ok(vec![date.clone()]),
        DateSpec::Auto => {
            let last = last_commit_day
                .unwrap_or_else(|| today.checked_sub_days(Days::new(1)).unwrap_or(today));
            // Strictly after the last commit day, through today inclusive.
            Ok(last
                .iter_days()
                .skip(1)
                .take_while(|d| *d <= today)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .collect())
        }
    }
}

/// One date's worth of work: the timestamp git will record and the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPlan {
    pub date: String,
    pub timestamp: String,
    pub message: String,
}

impl CommitPlan {
    /// Build the plan for one target date.
    ///
    /// An input containing `T` is already a complete timestamp and passes
    /// through untouched; anything else must be a valid `YYYY-MM-DD` day and
    /// gets the configured time-of-day and timezone token appended. The
    /// message always gets the input date string, never the derived
    /// timestamp.
    pub fn build(date: &str, time: &str, tz: &str, template: &str) -> Result<Self> {
        let timestamp = if date.contains('T') {
            date.to_string()
        } else if is_day(date) {
            format!("{date}T{time}{tz}")
        } else {
            bail!("'{date}' is not YYYY-MM-DD or an ISO-8601 timestamp");
        };
        Ok(Self {
            date: date.to_string(),
            timestamp,
            message: template.replace(DATE_PLACEHOLDER, date),
        })
    }
}
