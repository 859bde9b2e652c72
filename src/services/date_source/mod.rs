//! The cursor date the week view follows.
//!
//! The engine never owns "today": it asks a [`DateSource`] for the current
//! date and for the date one page away, and writes the new cursor back after
//! a successful navigation.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::utils::date::{add_days, resolve_local, shift_month_preserving_day};

/// Step size used when computing an adjacent date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarMode {
    Day,
    #[default]
    Week,
    Month,
}

#[cfg_attr(test, mockall::automock)]
pub trait DateSource<Tz: TimeZone + 'static> {
    fn current_date(&self) -> DateTime<Tz>;

    /// Move the cursor. The engine calls this once the views for `date`
    /// are built.
    fn set_current_date(&mut self, date: DateTime<Tz>);

    /// The date one `mode` step away from the cursor in `direction`.
    fn adjacent_date(&self, mode: CalendarMode, direction: i32) -> Result<DateTime<Tz>>;
}

/// In-memory cursor with calendar-aware stepping.
#[derive(Debug, Clone)]
pub struct CalendarService<Tz: TimeZone> {
    current_date: DateTime<Tz>,
}

impl<Tz: TimeZone> CalendarService<Tz> {
    pub fn new(current_date: DateTime<Tz>) -> Self {
        Self { current_date }
    }
}

impl<Tz: TimeZone + 'static> DateSource<Tz> for CalendarService<Tz> {
    fn current_date(&self) -> DateTime<Tz> {
        self.current_date.clone()
    }

    fn set_current_date(&mut self, date: DateTime<Tz>) {
        self.current_date = date;
    }

    fn adjacent_date(&self, mode: CalendarMode, direction: i32) -> Result<DateTime<Tz>> {
        let steps = i64::from(direction);
        match mode {
            CalendarMode::Day => add_days(&self.current_date, steps),
            CalendarMode::Week => add_days(&self.current_date, steps * 7),
            CalendarMode::Month => {
                let naive = self.current_date.naive_local();
                let date = shift_month_preserving_day(naive.date(), direction);
                resolve_local(&self.current_date.timezone(), date.and_time(naive.time()))
            }
        }
    }
}
