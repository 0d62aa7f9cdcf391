use std::collections::HashMap;

use chrono::{DateTime, Datelike, FixedOffset, Months, NaiveDate, Offset, Utc};
use academy_db::models::{AttendanceLog, Class};
use serde::Serialize;

/// One cell of a monthly attendance view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub status: Option<String>,
}

/// Minutes east of UTC as a chrono offset; out-of-range values fall back to UTC.
pub fn fixed_offset(utc_offset_minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60)).unwrap_or_else(|| Utc.fix())
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 0,
    }
}

pub fn local_date(instant: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    instant.with_timezone(offset).date_naive()
}

pub fn today_in(offset: &FixedOffset) -> NaiveDate {
    local_date(Utc::now(), offset)
}

/// UTC instants of local midnight on the first of `target`'s month and on
/// the first of the following month; the window is half-open.
pub fn month_bounds(target: NaiveDate, offset: &FixedOffset) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = target.with_day(1)?;
    let next = first.checked_add_months(Months::new(1))?;
    let to_utc = |date: NaiveDate| -> Option<DateTime<Utc>> {
        Some(
            date.and_hms_opt(0, 0, 0)?
                .and_local_timezone(*offset)
                .single()?
                .with_timezone(&Utc),
        )
    };
    Some((to_utc(first)?, to_utc(next)?))
}

/// 0 = Sunday .. 6 = Saturday, the convention used by `Class::class_days`.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Builds one entry per day of `target`'s month.
///
/// Records are bucketed by their local date in `offset`; for a day with
/// several records the first one in input order wins.
pub fn build_monthly_calendar(
    records: &[AttendanceLog],
    target: NaiveDate,
    offset: &FixedOffset,
) -> Vec<CalendarDay> {
    let mut by_day: HashMap<NaiveDate, String> = HashMap::new();
    for record in records {
        let day = local_date(record.check_in_time.to_chrono(), offset);
        by_day
            .entry(day)
            .or_insert_with(|| record.status.label().to_string());
    }

    let (year, month) = (target.year(), target.month());
    (1..=days_in_month(year, month))
        .filter_map(|d| NaiveDate::from_ymd_opt(year, month, d))
        .map(|date| CalendarDay {
            date,
            status: by_day.get(&date).cloned(),
        })
        .collect()
}

/// First enrolled class that meets on `weekday`.
pub fn class_for_weekday(classes: &[Class], weekday: u32) -> Option<&Class> {
    classes.iter().find(|c| c.meets_on(weekday))
}
