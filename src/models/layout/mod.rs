//! View model types produced by the layout pass.
//!
//! A [`WeekView`] holds one window's hour grid and all-day lane. Cells own
//! their [`PlacementRecord`]s; records point back at the shared [`Event`].

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

use crate::models::event::Event;

/// Hour rows in a day.
pub const HOURS_PER_DAY: usize = 24;
/// Day columns in a window.
pub const DAYS_PER_WEEK: usize = 7;

/// A half-open `[start_time, end_time)` range, as emitted on range changes.
#[derive(Debug, PartialEq, Eq)]
pub struct DateRange<Tz: TimeZone>
where
    Tz::Offset: Copy,
{
    pub start_time: DateTime<Tz>,
    pub end_time: DateTime<Tz>,
}

// Manual impls: a derive would also demand `Tz: Copy`.
impl<Tz: TimeZone> Clone for DateRange<Tz>
where
    Tz::Offset: Copy,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<Tz: TimeZone> Copy for DateRange<Tz> where Tz::Offset: Copy {}

/// Logical role of a window relative to the cursor date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowRole {
    Current,
    Next,
    Previous,
}

impl WindowRole {
    /// Binning order: current takes priority, then next, then previous.
    pub const ALL: [WindowRole; 3] = [WindowRole::Current, WindowRole::Next, WindowRole::Previous];

    /// Distance in weeks from the current window.
    pub fn week_offset(self) -> i64 {
        match self {
            WindowRole::Current => 0,
            WindowRole::Next => 1,
            WindowRole::Previous => -1,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct TimeWindow<Tz: TimeZone>
where
    Tz::Offset: Copy,
{
    pub start_time: DateTime<Tz>,
    pub end_time: DateTime<Tz>,
    /// Local wall-clock start reinterpreted as UTC; all-day membership only.
    pub utc_start_time: DateTime<Utc>,
    pub utc_end_time: DateTime<Utc>,
}

impl<Tz: TimeZone> Clone for TimeWindow<Tz>
where
    Tz::Offset: Copy,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<Tz: TimeZone> Copy for TimeWindow<Tz> where Tz::Offset: Copy {}

impl<Tz: TimeZone> TimeWindow<Tz>
where
    Tz::Offset: Copy,
{
    pub fn range(&self) -> DateRange<Tz> {
        DateRange {
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    /// Window length on the local wall clock, in hours (168 for a full week).
    pub fn wall_clock_hours(&self) -> f64 {
        let span = self.end_time.naive_local() - self.start_time.naive_local();
        span.num_milliseconds() as f64 / 3_600_000.0
    }
}

/// One event's appearance on one day (timed) or in one window (all-day).
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRecord {
    pub event: Arc<Event>,
    /// Hour row (timed) or day offset (all-day) where the record starts.
    pub start_index: usize,
    /// Exclusive end row (timed) or day offset (all-day).
    pub end_index: usize,
    /// Sub-hour slots skipped at the top of the first row.
    pub start_offset: u32,
    /// Sub-hour slots left empty at the bottom of the last row.
    pub end_offset: u32,
    /// Column assigned by the overlap resolver.
    pub position: usize,
    /// Columns in this record's overlap cluster; `None` until resolved and
    /// always `None` in the all-day lane.
    pub overlap_number: Option<usize>,
}

impl PlacementRecord {
    pub fn new(event: Arc<Event>, start_index: usize, end_index: usize) -> Self {
        Self {
            event,
            start_index,
            end_index,
            start_offset: 0,
            end_offset: 0,
            position: 0,
            overlap_number: None,
        }
    }

    pub fn with_offsets(mut self, start_offset: u32, end_offset: u32) -> Self {
        self.start_offset = start_offset;
        self.end_offset = end_offset;
        self
    }

    /// Rendered geometry in row/column units for a grid with `hour_parts`
    /// slots per row.
    pub fn geometry(&self, hour_parts: u32) -> EventGeometry {
        let parts = f64::from(hour_parts.max(1));
        let columns = self.overlap_number.unwrap_or(1).max(1) as f64;
        EventGeometry {
            top: f64::from(self.start_offset) / parts,
            height: self.end_index as f64
                - self.start_index as f64
                - f64::from(self.start_offset + self.end_offset) / parts,
            left: self.position as f64 / columns,
            width: 1.0 / columns,
        }
    }
}

/// Position of a record inside its starting cell. `top`/`height` are in
/// hour rows, `left`/`width` in fractions of the day column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EventGeometry {
    pub top: f64,
    pub height: f64,
    pub left: f64,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell<Tz: TimeZone>
where
    Tz::Offset: Copy,
{
    pub time: DateTime<Tz>,
    pub events: Vec<PlacementRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DateCell<Tz: TimeZone>
where
    Tz::Offset: Copy,
{
    pub date: DateTime<Tz>,
    pub events: Vec<PlacementRecord>,
}

/// One materialised window: `rows[hour][day]` plus the all-day lane.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekView<Tz: TimeZone>
where
    Tz::Offset: Copy,
{
    pub window: TimeWindow<Tz>,
    pub rows: Vec<Vec<GridCell<Tz>>>,
    pub dates: Vec<DateCell<Tz>>,
}

impl<Tz: TimeZone> WeekView<Tz>
where
    Tz::Offset: Copy,
{
    pub fn clear_events(&mut self) {
        for row in &mut self.rows {
            for cell in row {
                cell.events.clear();
            }
        }
        for cell in &mut self.dates {
            cell.events.clear();
        }
    }

    /// All timed records of one day column, in row order.
    pub fn day_records(&self, day: usize) -> impl Iterator<Item = &PlacementRecord> {
        self.rows
            .iter()
            .filter_map(move |row| row.get(day))
            .flat_map(|cell| cell.events.iter())
    }

    pub fn all_day_records(&self) -> impl Iterator<Item = &PlacementRecord> {
        self.dates.iter().flat_map(|cell| cell.events.iter())
    }

    pub fn has_timed_events(&self) -> bool {
        self.rows
            .iter()
            .any(|row| row.iter().any(|cell| !cell.events.is_empty()))
    }

    pub fn has_all_day_events(&self) -> bool {
        self.dates.iter().any(|cell| !cell.events.is_empty())
    }
}
