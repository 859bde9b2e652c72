//! Empty hour grid and all-day date row for one window.

use chrono::{DateTime, Duration, NaiveTime, TimeZone};

use crate::error::{LayoutError, Result};
use crate::models::layout::{DateCell, GridCell, DAYS_PER_WEEK, HOURS_PER_DAY};
use crate::utils::date::{local_midnight, resolve_local};

/// Build `rows[hour][day]` starting at `window_start`.
///
/// Times are computed on the wall clock and then resolved, so an hour
/// skipped by DST lands on the first valid instant after the gap.
pub fn build_empty_grid<Tz: TimeZone>(window_start: &DateTime<Tz>) -> Result<Vec<Vec<GridCell<Tz>>>>
where
    Tz::Offset: Copy,
{
    let tz = window_start.timezone();
    let origin = window_start.naive_local();

    (0..HOURS_PER_DAY as i64)
        .map(|hour| -> Result<Vec<GridCell<Tz>>> {
            (0..DAYS_PER_WEEK as i64)
                .map(|day| -> Result<GridCell<Tz>> {
                    let naive = origin
                        .checked_add_signed(Duration::hours(hour) + Duration::days(day))
                        .ok_or(LayoutError::OutOfRange(origin))?;
                    Ok(GridCell {
                        time: resolve_local(&tz, naive)?,
                        events: Vec::new(),
                    })
                })
                .collect()
        })
        .collect()
}

/// `n` consecutive calendar dates starting at `window_start`'s day.
pub fn build_date_row<Tz: TimeZone>(window_start: &DateTime<Tz>, n: usize) -> Result<Vec<DateCell<Tz>>>
where
    Tz::Offset: Copy,
{
    let tz = window_start.timezone();
    // Noon never sits in a DST gap, so its calendar date is the one the
    // window actually starts on.
    let noon = window_start
        .date_naive()
        .and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));

    (0..n as i64)
        .map(|day| -> Result<DateCell<Tz>> {
            let date = (noon + Duration::days(day)).date();
            Ok(DateCell {
                date: local_midnight(&tz, date)?,
                events: Vec::new(),
            })
        })
        .collect()
}
