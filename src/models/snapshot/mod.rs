//! Serialisable flattening of one [`WeekView`].
//!
//! The snapshot is what a renderer (or the CLI) consumes: one entry per day
//! with its all-day and timed records, each carrying the resolved geometry.
//! Timestamps are RFC 3339 strings in the view's time zone.

use std::fmt::Display;

use chrono::{DateTime, SecondsFormat, TimeZone};
use serde::Serialize;

use crate::models::layout::{EventGeometry, PlacementRecord, WeekView};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub hour_parts: u32,
    pub days: Vec<DaySnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySnapshot {
    pub date: String,
    pub all_day: Vec<RecordSnapshot>,
    pub timed: Vec<RecordSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    pub start_index: usize,
    pub end_index: usize,
    pub start_offset: u32,
    pub end_offset: u32,
    pub position: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlap_number: Option<usize>,
    pub geometry: EventGeometry,
}

impl RecordSnapshot {
    fn from_record(record: &PlacementRecord, hour_parts: u32) -> Self {
        Self {
            id: record.event.id,
            title: record.event.title.clone(),
            start_index: record.start_index,
            end_index: record.end_index,
            start_offset: record.start_offset,
            end_offset: record.end_offset,
            position: record.position,
            overlap_number: record.overlap_number,
            geometry: record.geometry(hour_parts),
        }
    }
}

impl LayoutSnapshot {
    pub fn from_view<Tz: TimeZone>(view: &WeekView<Tz>, hour_parts: u32, title: Option<String>) -> Self
    where
        Tz::Offset: Copy + Display,
    {
        let days = view
            .dates
            .iter()
            .enumerate()
            .map(|(day, cell)| DaySnapshot {
                date: cell.date.date_naive().to_string(),
                all_day: cell
                    .events
                    .iter()
                    .map(|record| RecordSnapshot::from_record(record, hour_parts))
                    .collect(),
                timed: view
                    .day_records(day)
                    .map(|record| RecordSnapshot::from_record(record, hour_parts))
                    .collect(),
            })
            .collect();

        Self {
            title,
            start_time: rfc3339(&view.window.start_time),
            end_time: rfc3339(&view.window.end_time),
            hour_parts,
            days,
        }
    }

    pub fn record_count(&self) -> usize {
        self.days
            .iter()
            .map(|day| day.all_day.len() + day.timed.len())
            .sum()
    }
}

fn rfc3339<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}
