// Date utility functions
// Week ranges, DST-safe local time resolution and ISO week numbers

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Utc,
};

use crate::error::{LayoutError, Result};
use crate::models::layout::DateRange;

/// Resolve a local wall-clock time to an instant.
///
/// Times skipped by a DST gap are pushed forward past the gap; ambiguous
/// times (repeated by a fall-back transition) take the earlier instant.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Result<DateTime<Tz>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => {
            let skipped = naive
                .checked_add_signed(Duration::hours(1))
                .ok_or(LayoutError::OutOfRange(naive))?;
            tz.from_local_datetime(&skipped)
                .earliest()
                .ok_or(LayoutError::TimeZone(naive))
        }
    }
}

pub fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Result<DateTime<Tz>> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

/// Add whole calendar days, keeping the wall-clock time.
pub fn add_days<Tz: TimeZone>(date: &DateTime<Tz>, days: i64) -> Result<DateTime<Tz>> {
    let naive = date.naive_local();
    let shifted = naive
        .checked_add_signed(Duration::days(days))
        .ok_or(LayoutError::OutOfRange(naive))?;
    resolve_local(&date.timezone(), shifted)
}

/// The week containing `date`, starting on `starting_day_of_week`
/// (0 = Sunday), from local midnight to local midnight seven days later.
pub fn week_range<Tz: TimeZone>(
    date: &DateTime<Tz>,
    starting_day_of_week: u8,
) -> Result<DateRange<Tz>>
where
    Tz::Offset: Copy,
{
    let tz = date.timezone();
    let first_day = week_start(date.date_naive(), starting_day_of_week);
    let end_day = first_day
        .checked_add_signed(Duration::days(7))
        .ok_or(LayoutError::OutOfRange(date.naive_local()))?;

    Ok(DateRange {
        start_time: local_midnight(&tz, first_day)?,
        end_time: local_midnight(&tz, end_day)?,
    })
}

/// Calendar date of the most recent `starting_day_of_week` on or before `date`.
pub fn week_start(date: NaiveDate, starting_day_of_week: u8) -> NaiveDate {
    let weekday = date.weekday().num_days_from_sunday() as i64;
    let offset = (weekday - starting_day_of_week as i64).rem_euclid(7);
    date - Duration::days(offset)
}

/// ISO-8601 week number: move to the Thursday of the week, then count weeks
/// from January 1 of that Thursday's year.
pub fn iso_week_number(date: NaiveDate) -> u32 {
    let day_of_week = match date.weekday().num_days_from_sunday() {
        0 => 7,
        day => day as i64,
    };
    let thursday = date + Duration::days(4 - day_of_week);
    let jan_first = NaiveDate::from_ymd_opt(thursday.year(), 1, 1).unwrap_or(thursday);
    let days = (thursday - jan_first).num_days();
    (days / 7 + 1) as u32
}

/// UTC offset in effect at `date`, in minutes east of UTC.
pub fn utc_offset_minutes<Tz: TimeZone>(date: &DateTime<Tz>) -> i32 {
    date.offset().fix().local_minus_utc() / 60
}

/// The local wall-clock reading of `date` reinterpreted as a UTC instant.
pub fn wall_clock_as_utc<Tz: TimeZone>(date: &DateTime<Tz>) -> DateTime<Utc> {
    date.naive_local().and_utc()
}

/// Realign `shifted`, obtained by moving `source` a whole number of weeks in
/// absolute time, back onto the wall-clock reading of `source` when a DST
/// transition lies between them.
pub fn realign_shifted<Tz: TimeZone>(source: &DateTime<Tz>, shifted: DateTime<Tz>) -> DateTime<Tz> {
    let delta = utc_offset_minutes(source) - utc_offset_minutes(&shifted);
    if delta == 0 {
        shifted
    } else {
        shifted + Duration::minutes(i64::from(delta))
    }
}

/// Shift by whole months, clamping the day to the target month's length.
pub fn shift_month_preserving_day(current: NaiveDate, delta_months: i32) -> NaiveDate {
    let total_months = (current.year() * 12) + (current.month() as i32 - 1) + delta_months;
    let new_year = total_months.div_euclid(12);
    let new_month = total_months.rem_euclid(12) as u32 + 1;
    let day = current.day().min(last_day_of_month(new_year, new_month));
    NaiveDate::from_ymd_opt(new_year, new_month, day).unwrap_or(current)
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}
