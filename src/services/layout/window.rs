//! The three live windows (previous, current, next) and the carousel that
//! maps them onto three stable view slots.

use chrono::{DateTime, Duration, TimeZone};

use super::grid::{build_date_row, build_empty_grid};
use crate::error::{LayoutError, Result};
use crate::models::layout::{DateRange, TimeWindow, WeekView, WindowRole, DAYS_PER_WEEK};
use crate::utils::date::{realign_shifted, wall_clock_as_utc, week_range};

/// Which of the three slots currently shows the cursor's week.
///
/// Paging rotates the mapping instead of moving views around, so the slot
/// the user lands on keeps its already-built grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Carousel {
    current: usize,
}

impl Carousel {
    pub fn new(current: usize) -> Self {
        Self { current: current % 3 }
    }

    pub fn current_slot(&self) -> usize {
        self.current
    }

    pub fn slot(&self, role: WindowRole) -> usize {
        match role {
            WindowRole::Current => self.current,
            WindowRole::Next => (self.current + 1) % 3,
            WindowRole::Previous => (self.current + 2) % 3,
        }
    }

    /// Slots in binning order: current, next, previous.
    pub fn order(&self) -> [usize; 3] {
        WindowRole::ALL.map(|role| self.slot(role))
    }

    /// Advance by `direction` (-1, 0 or +1). Returns the slot whose content
    /// went stale, i.e. the one now two steps away from the new current.
    pub fn rotate(&mut self, direction: i32) -> Option<usize> {
        match direction.signum() {
            1 => {
                self.current = (self.current + 1) % 3;
                Some(self.slot(WindowRole::Next))
            }
            -1 => {
                self.current = (self.current + 2) % 3;
                Some(self.slot(WindowRole::Previous))
            }
            _ => None,
        }
    }
}

pub fn time_window<Tz: TimeZone>(start_time: DateTime<Tz>, end_time: DateTime<Tz>) -> TimeWindow<Tz>
where
    Tz::Offset: Copy,
{
    TimeWindow {
        start_time,
        end_time,
        utc_start_time: wall_clock_as_utc(&start_time),
        utc_end_time: wall_clock_as_utc(&end_time),
    }
}

/// Windows for the week containing `current_date`, in role order
/// (current, next, previous).
///
/// Neighbours are shifted by a week of absolute time. When a DST transition
/// lies between a boundary and its shifted copy, the copy is moved by the
/// offset delta so every window still starts and ends at local midnight.
pub fn compute_windows<Tz: TimeZone>(
    current_date: &DateTime<Tz>,
    starting_day_of_week: u8,
) -> Result<[TimeWindow<Tz>; 3]>
where
    Tz::Offset: Copy,
{
    let DateRange {
        start_time,
        end_time,
    } = week_range(current_date, starting_day_of_week)?;

    let shifted = |boundary: DateTime<Tz>, weeks: i64| -> Result<DateTime<Tz>> {
        let moved = boundary
            .checked_add_signed(Duration::weeks(weeks))
            .ok_or(LayoutError::OutOfRange(boundary.naive_local()))?;
        Ok(realign_shifted(&boundary, moved))
    };
    let window_for = |role: WindowRole| -> Result<TimeWindow<Tz>> {
        let weeks = role.week_offset();
        Ok(time_window(shifted(start_time, weeks)?, shifted(end_time, weeks)?))
    };

    Ok([
        window_for(WindowRole::Current)?,
        window_for(WindowRole::Next)?,
        window_for(WindowRole::Previous)?,
    ])
}

pub fn build_view<Tz: TimeZone>(window: TimeWindow<Tz>) -> Result<WeekView<Tz>>
where
    Tz::Offset: Copy,
{
    Ok(WeekView {
        rows: build_empty_grid(&window.start_time)?,
        dates: build_date_row(&window.start_time, DAYS_PER_WEEK)?,
        window,
    })
}

/// Owns the three view slots and keeps them aligned with the cursor date.
#[derive(Debug, Clone)]
pub struct WindowManager<Tz: TimeZone>
where
    Tz::Offset: Copy,
{
    views: Vec<WeekView<Tz>>,
    carousel: Carousel,
    starting_day_of_week: u8,
}

impl<Tz: TimeZone> WindowManager<Tz>
where
    Tz::Offset: Copy,
{
    pub fn new(current_date: &DateTime<Tz>, starting_day_of_week: u8) -> Result<Self> {
        let carousel = Carousel::default();
        let windows = compute_windows(current_date, starting_day_of_week)?;

        let mut slots: [Option<WeekView<Tz>>; 3] = [None, None, None];
        for (role, window) in WindowRole::ALL.into_iter().zip(windows) {
            slots[carousel.slot(role)] = Some(build_view(window)?);
        }

        Ok(Self {
            views: slots.into_iter().flatten().collect(),
            carousel,
            starting_day_of_week,
        })
    }

    /// Rotate by `direction`, recompute the three windows for `current_date`
    /// and rebuild the grids of slots whose window moved. Cells of every
    /// slot are left empty; callers re-bin afterwards.
    ///
    /// Nothing changes when any window fails to compute or build.
    pub fn refresh(&mut self, current_date: &DateTime<Tz>, direction: i32) -> Result<DateRange<Tz>> {
        let windows = compute_windows(current_date, self.starting_day_of_week)?;

        let mut carousel = self.carousel;
        let stale = carousel.rotate(direction);

        let mut rebuilt = Vec::with_capacity(windows.len());
        for (role, window) in WindowRole::ALL.into_iter().zip(windows) {
            let slot = carousel.slot(role);
            let fresh = if self.views[slot].window.start_time != window.start_time {
                Some(build_view(window)?)
            } else {
                None
            };
            rebuilt.push((slot, fresh, window));
        }

        if let Some(stale) = stale {
            log::debug!("carousel rotated {:+}, slot {} is stale", direction, stale);
        }
        self.carousel = carousel;
        for (slot, fresh, window) in rebuilt {
            let view = &mut self.views[slot];
            match fresh {
                Some(fresh) => *view = fresh,
                None => {
                    view.window = window;
                    view.clear_events();
                }
            }
        }

        Ok(self.view(WindowRole::Current).window.range())
    }

    pub fn views(&self) -> &[WeekView<Tz>] {
        &self.views
    }

    pub fn views_mut(&mut self) -> &mut [WeekView<Tz>] {
        &mut self.views
    }

    pub fn view(&self, role: WindowRole) -> &WeekView<Tz> {
        &self.views[self.carousel.slot(role)]
    }

    pub fn carousel(&self) -> Carousel {
        self.carousel
    }

    pub fn starting_day_of_week(&self) -> u8 {
        self.starting_day_of_week
    }
}
