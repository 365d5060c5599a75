use crate::models::PeriodKind;
use chrono::{Datelike, NaiveDate};

/// Canonical bucket identifier for `date` under the given cadence.
/// Two dates map to the same key iff they fall in the same local day,
/// ISO week, or calendar month.
pub fn key_for(kind: PeriodKind, date: NaiveDate) -> String {
    match kind {
        PeriodKind::Daily => day_key(date),
        PeriodKind::Weekly => week_key(date),
        PeriodKind::Monthly => month_key(date),
    }
}

fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// ISO week, not a 7-day count from epoch: the first days of January can
// belong to the previous ISO year's last week and vice versa.
fn week_key(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

fn month_key(date: NaiveDate) -> String {
    date.format("%Y-%m").to_string()
}
