//! Event binning: decide which windows an event appears in, turn its time
//! range into grid indices with sub-hour offsets, split it per day and
//! append the resulting records to their cells.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};

use super::overlap::{place_all_day_events, place_events};
use crate::models::event::Event;
use crate::models::layout::{PlacementRecord, TimeWindow, WeekView, HOURS_PER_DAY};
use crate::models::settings::WindowAssignment;

/// Slack subtracted before rounding an end up to the next row, so an event
/// ending exactly on the hour (or up to a minute past) does not spill into
/// an extra empty row.
pub const END_EPSILON_HOURS: f64 = 0.016;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Counts from one binning pass, for logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BinSummary {
    pub timed_records: usize,
    pub all_day_records: usize,
    pub skipped_events: usize,
}

/// Indices into `windows` (ordered current, next, previous) that `event`
/// should be placed in.
pub fn assign_windows<Tz: TimeZone>(
    event: &Event,
    windows: [&TimeWindow<Tz>; 3],
    policy: WindowAssignment,
) -> Vec<usize>
where
    Tz::Offset: Copy,
{
    let bounds: Vec<(DateTime<Utc>, DateTime<Utc>)> = windows
        .iter()
        .map(|window| window_bounds(event, window))
        .collect();
    let (current, next, previous) = (bounds[0], bounds[1], bounds[2]);

    if !intersects(event, previous.0, next.1) {
        return Vec::new();
    }

    match policy {
        WindowAssignment::FirstMatch => {
            let idx = if event.end <= current.0 && event.start < current.0 {
                2
            } else if event.start >= current.1 {
                1
            } else {
                0
            };
            vec![idx]
        }
        WindowAssignment::EveryIntersecting => bounds
            .iter()
            .enumerate()
            .filter(|(_, (start, end))| intersects(event, *start, *end))
            .map(|(idx, _)| idx)
            .collect(),
    }
}

/// A zero-length event sitting exactly on a window start belongs to that
/// window.
fn intersects(event: &Event, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    event.start < end && (event.end > start || event.start >= start)
}

fn window_bounds<Tz: TimeZone>(event: &Event, window: &TimeWindow<Tz>) -> (DateTime<Utc>, DateTime<Utc>)
where
    Tz::Offset: Copy,
{
    if event.all_day {
        (window.utc_start_time, window.utc_end_time)
    } else {
        (
            window.start_time.with_timezone(&Utc),
            window.end_time.with_timezone(&Utc),
        )
    }
}

/// Place one all-day event into the window's date row. Returns whether a
/// record was stored.
pub fn bin_all_day<Tz: TimeZone>(event: &Arc<Event>, view: &mut WeekView<Tz>) -> bool
where
    Tz::Offset: Copy,
{
    let window = view.window;
    let span_ms = (window.utc_end_time - window.utc_start_time).num_milliseconds();

    let start_index = if event.start <= window.utc_start_time {
        0
    } else {
        let offset_ms = (event.start - window.utc_start_time).num_milliseconds();
        offset_ms.div_euclid(MILLIS_PER_DAY) as usize
    };

    let end_ms = if event.end >= window.utc_end_time {
        span_ms
    } else {
        (event.end - window.utc_start_time).num_milliseconds()
    };
    let end_index = (ceil_div(end_ms, MILLIS_PER_DAY).max(0) as usize).min(view.dates.len());

    match view.dates.get_mut(start_index) {
        Some(cell) => {
            cell.events
                .push(PlacementRecord::new(Arc::clone(event), start_index, end_index.max(start_index)));
            true
        }
        None => {
            log::warn!(
                "all-day event {:?} starts outside the date row (day {})",
                event.title,
                start_index
            );
            false
        }
    }
}

/// Place one timed event into the window's hour grid, one record per day it
/// touches. Returns the number of records stored.
pub fn bin_timed<Tz: TimeZone>(event: &Arc<Event>, view: &mut WeekView<Tz>, hour_parts: u32) -> usize
where
    Tz::Offset: Copy,
{
    let window = view.window;
    let window_hours = window.wall_clock_hours();

    let window_start = window.start_time.with_timezone(&Utc);
    let window_end = window.end_time.with_timezone(&Utc);

    let diff_start = if event.start <= window_start {
        0.0
    } else {
        wall_clock_hours_between(&window.start_time, &event.start).clamp(0.0, window_hours)
    };
    let diff_end = if event.end >= window_end {
        window_hours
    } else {
        wall_clock_hours_between(&window.start_time, &event.end).min(window_hours)
    }
    // A fall-back transition can make the wall-clock end read earlier.
    .max(diff_start);

    let start_index = diff_start.floor() as usize;
    let end_index = (diff_end - END_EPSILON_HOURS).ceil().max(0.0) as usize;
    let mut start_row = start_index % HOURS_PER_DAY;
    let mut day = start_index / HOURS_PER_DAY;
    let mut end_of_day = day * HOURS_PER_DAY;

    let mut start_offset = if hour_parts != 1 {
        fraction_to_parts(diff_start - start_index as f64, hour_parts)
    } else {
        0
    };

    let mut stored = 0;
    loop {
        end_of_day += HOURS_PER_DAY;
        let end_row = if end_of_day <= end_index {
            HOURS_PER_DAY
        } else {
            end_index % HOURS_PER_DAY
        };
        // Only the last day's record carries the trailing offset, including
        // when that day ends on the last row.
        let end_offset = if end_of_day >= end_index && hour_parts != 1 {
            fraction_to_parts(end_index as f64 - diff_end, hour_parts)
        } else {
            0
        };

        let Some(cell) = view.rows.get_mut(start_row).and_then(|row| row.get_mut(day)) else {
            log::warn!(
                "event {:?} runs past the grid (row {}, day {})",
                event.title,
                start_row,
                day
            );
            break;
        };
        cell.events.push(
            PlacementRecord::new(Arc::clone(event), start_row, end_row)
                .with_offsets(start_offset, end_offset),
        );
        stored += 1;

        start_row = 0;
        start_offset = 0;
        day += 1;

        if end_of_day >= end_index {
            break;
        }
    }

    stored
}

/// Bin every event into the three views, then resolve overlaps.
///
/// `views` is indexed by carousel slot; `order` lists the slots of the
/// current, next and previous windows. Every cell is cleared first.
pub fn bin_events<Tz: TimeZone>(
    views: &mut [WeekView<Tz>],
    order: [usize; 3],
    events: &[Arc<Event>],
    hour_parts: u32,
    policy: WindowAssignment,
) -> BinSummary
where
    Tz::Offset: Copy,
{
    for view in views.iter_mut() {
        view.clear_events();
    }

    let windows = order.map(|slot| views[slot].window);
    let mut summary = BinSummary::default();

    for event in events {
        let targets = assign_windows(event, [&windows[0], &windows[1], &windows[2]], policy);
        if targets.is_empty() {
            summary.skipped_events += 1;
            continue;
        }

        for target in targets {
            let view = &mut views[order[target]];
            if event.all_day {
                if bin_all_day(event, view) {
                    summary.all_day_records += 1;
                }
            } else {
                summary.timed_records += bin_timed(event, view, hour_parts);
            }
        }
    }

    for slot in order {
        resolve_view(&mut views[slot], hour_parts);
    }

    summary
}

/// Order each cell by start offset and run the overlap resolver per day and
/// on the all-day lane.
pub fn resolve_view<Tz: TimeZone>(view: &mut WeekView<Tz>, hour_parts: u32)
where
    Tz::Offset: Copy,
{
    if view.has_timed_events() {
        for row in &mut view.rows {
            for cell in row.iter_mut() {
                cell.events.sort_by_key(|record| record.start_offset);
            }
        }

        let days = view.rows.first().map_or(0, Vec::len);
        for day in 0..days {
            let mut ordered: Vec<&mut PlacementRecord> = view
                .rows
                .iter_mut()
                .filter_map(|row| row.get_mut(day))
                .flat_map(|cell| cell.events.iter_mut())
                .collect();
            if !ordered.is_empty() {
                place_events(&mut ordered, hour_parts);
            }
        }
    }

    if view.has_all_day_events() {
        let mut ordered: Vec<&mut PlacementRecord> = view
            .dates
            .iter_mut()
            .flat_map(|cell| cell.events.iter_mut())
            .collect();
        place_all_day_events(&mut ordered, hour_parts);
    }
}

fn wall_clock_hours_between<Tz: TimeZone>(origin: &DateTime<Tz>, instant: &DateTime<Utc>) -> f64
where
    Tz::Offset: Copy,
{
    let local = instant.with_timezone(&origin.timezone());
    let span: Duration = local.naive_local() - origin.naive_local();
    span.num_milliseconds() as f64 / MILLIS_PER_HOUR
}

fn fraction_to_parts(fraction: f64, hour_parts: u32) -> u32 {
    let parts = (fraction * f64::from(hour_parts)).floor().max(0.0) as u32;
    parts.min(hour_parts.saturating_sub(1))
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    -((-value).div_euclid(divisor))
}
