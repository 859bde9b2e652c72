//! Week view layout engine.
//!
//! Keeps three weeks materialised (previous, current, next), bins the event
//! list into their hour grids and all-day lanes, and resolves overlaps so the
//! renderer only has to draw. Every data or range change re-bins from
//! scratch.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, TimeZone};

pub mod binning;
pub mod grid;
pub mod overlap;
pub mod window;

use self::binning::{bin_events, BinSummary};
use self::window::WindowManager;
use crate::error::Result;
use crate::models::event::Event;
use crate::models::layout::{DateRange, PlacementRecord, WeekView, WindowRole};
use crate::models::settings::{WeekViewSettings, WEEK_NUMBER_TOKEN};
use crate::services::date_source::{CalendarMode, DateSource};
use crate::services::paging::{slide_direction, PagingController};
use crate::utils::date::iso_week_number;

/// Outgoing notifications, drained by the host after each call.
#[derive(Debug, Clone, PartialEq)]
pub enum WeekViewNotification<Tz: TimeZone>
where
    Tz::Offset: Copy,
{
    RangeChanged(DateRange<Tz>),
    TitleChanged(String),
    EventSelected(Arc<Event>),
    TimeSelected(TimeSelection<Tz>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSelection<Tz: TimeZone>
where
    Tz::Offset: Copy,
{
    pub selected_time: DateTime<Tz>,
    pub events: Vec<Arc<Event>>,
}

pub struct WeekViewEngine<Tz, S>
where
    Tz: TimeZone + 'static,
    Tz::Offset: Copy,
    S: DateSource<Tz>,
{
    settings: WeekViewSettings,
    source: S,
    windows: WindowManager<Tz>,
    range: DateRange<Tz>,
    events: Vec<Arc<Event>>,
    notifications: Vec<WeekViewNotification<Tz>>,
    paging: PagingController,
}

impl<Tz, S> WeekViewEngine<Tz, S>
where
    Tz: TimeZone + 'static,
    Tz::Offset: Copy + Display,
    S: DateSource<Tz>,
{
    /// Validate `settings`, build the three windows around the source's
    /// current date and emit the initial title and range.
    pub fn new(settings: WeekViewSettings, source: S) -> Result<Self> {
        settings.validate()?;

        let windows = WindowManager::new(&source.current_date(), settings.starting_day_of_week)?;
        let range = windows.view(WindowRole::Current).window.range();

        let mut engine = Self {
            settings,
            source,
            windows,
            range,
            events: Vec::new(),
            notifications: Vec::new(),
            paging: PagingController::default(),
        };
        engine.refresh_view()?;
        Ok(engine)
    }

    /// Replace the event list and re-bin. Nothing changes if any event is
    /// invalid.
    pub fn set_events(&mut self, events: Vec<Event>) -> Result<BinSummary> {
        for event in &events {
            event.validate()?;
        }
        self.events = events.into_iter().map(Arc::new).collect();
        Ok(self.on_data_loaded())
    }

    /// Recompute windows for the source's current date and re-bin.
    pub fn refresh_view(&mut self) -> Result<()> {
        let current_date = self.source.current_date();
        self.refresh_at(&current_date, 0)
    }

    fn refresh_at(&mut self, current_date: &DateTime<Tz>, direction: i32) -> Result<()> {
        self.range = self.windows.refresh(current_date, direction)?;

        let title = self.title();
        self.notifications.push(WeekViewNotification::TitleChanged(title));
        self.notifications.push(WeekViewNotification::RangeChanged(self.range));

        self.on_data_loaded();
        Ok(())
    }

    /// Clear every cell and bin the full event list into all three windows.
    pub fn on_data_loaded(&mut self) -> BinSummary {
        let order = self.windows.carousel().order();
        let summary = bin_events(
            self.windows.views_mut(),
            order,
            &self.events,
            self.settings.hour_parts,
            self.settings.window_assignment,
        );
        log::debug!(
            "binned {} events: {} timed records, {} all-day records, {} outside the windows",
            self.events.len(),
            summary.timed_records,
            summary.all_day_records,
            summary.skipped_events
        );
        summary
    }

    /// Page one week forward (+1) or back (-1). The source's cursor only
    /// moves once the new windows are built.
    pub fn move_by(&mut self, direction: i32) -> Result<()> {
        if direction == 0 {
            return Ok(());
        }
        let direction = direction.signum();
        let adjacent = self.source.adjacent_date(CalendarMode::Week, direction)?;
        self.refresh_at(&adjacent, direction)?;
        self.source.set_current_date(adjacent);
        Ok(())
    }

    /// Record that the carousel came to rest on `visible_slot`.
    pub fn on_slide_changed(&mut self, visible_slot: usize, now: Instant) {
        let direction = slide_direction(self.windows.carousel().current_slot(), visible_slot);
        self.paging.request(direction, now);
    }

    pub fn has_pending_move(&self) -> bool {
        self.paging.has_pending()
    }

    /// Apply the pending page move if it has settled. Returns whether the
    /// view moved.
    pub fn settle(&mut self, now: Instant) -> Result<bool> {
        if !self.paging.has_pending() {
            return Ok(false);
        }
        match self.paging.poll(now) {
            Some(direction) => {
                self.move_by(direction)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Current window's start formatted with `format_week_title`; the week
    /// number token becomes the ISO-8601 week number.
    pub fn title(&self) -> String {
        let start = self.range.start_time;
        let title = start.format(&self.settings.format_week_title).to_string();
        if self.settings.format_week_title.contains(WEEK_NUMBER_TOKEN) {
            let week = iso_week_number(start.date_naive()).to_string();
            title.replace(WEEK_NUMBER_TOKEN, &week)
        } else {
            title
        }
    }

    pub fn day_header(&self, date: &DateTime<Tz>) -> String {
        date.format(&self.settings.format_day_header).to_string()
    }

    pub fn hour_label(&self, time: &DateTime<Tz>) -> String {
        time.format(&self.settings.format_hour_column).to_string()
    }

    pub fn all_day_label(&self) -> &str {
        &self.settings.all_day_label
    }

    /// Report a click on a time slot together with the events shown there.
    pub fn select(&mut self, selected_time: DateTime<Tz>, records: &[PlacementRecord]) {
        let events = records.iter().map(|record| Arc::clone(&record.event)).collect();
        self.notifications
            .push(WeekViewNotification::TimeSelected(TimeSelection {
                selected_time,
                events,
            }));
    }

    /// [`select`](Self::select) for the cell at `hour`/`day` of a window.
    /// Returns false when the cell does not exist.
    pub fn select_slot(&mut self, role: WindowRole, hour: usize, day: usize) -> bool {
        let Some(cell) = self
            .windows
            .view(role)
            .rows
            .get(hour)
            .and_then(|row| row.get(day))
        else {
            return false;
        };
        let time = cell.time;
        let records = cell.events.clone();
        self.select(time, &records);
        true
    }

    pub fn event_selected(&mut self, event: Arc<Event>) {
        self.notifications
            .push(WeekViewNotification::EventSelected(event));
    }

    pub fn drain_notifications(&mut self) -> Vec<WeekViewNotification<Tz>> {
        std::mem::take(&mut self.notifications)
    }

    /// Views by carousel slot.
    pub fn views(&self) -> &[WeekView<Tz>] {
        self.windows.views()
    }

    pub fn view(&self, role: WindowRole) -> &WeekView<Tz> {
        self.windows.view(role)
    }

    pub fn current_slot(&self) -> usize {
        self.windows.carousel().current_slot()
    }

    pub fn range(&self) -> DateRange<Tz> {
        self.range
    }

    pub fn settings(&self) -> &WeekViewSettings {
        &self.settings
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn events(&self) -> &[Arc<Event>] {
        &self.events
    }
}
