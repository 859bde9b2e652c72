// Test fixtures - reusable test data
// Cursor dates and events shared by the integration test targets

#![allow(dead_code)]

use calendar_weekview::services::date_source::CalendarService;
use calendar_weekview::{Event, WeekViewEngine, WeekViewSettings};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Sample cursor dates
pub mod dates {
    use super::*;

    /// Wednesday 8 January 2025, noon UTC. Sunday-start week is 5-12 January.
    pub fn mid_january_2025() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 8, 12, 0, 0).unwrap()
    }

    /// Tuesday 11 March 2025 in New York; the Sunday-start week contains the
    /// spring-forward transition on 9 March.
    pub fn spring_forward_week() -> DateTime<Tz> {
        chrono_tz::America::New_York
            .with_ymd_and_hms(2025, 3, 11, 9, 0, 0)
            .unwrap()
    }

    /// Tuesday 4 November 2025 in New York; 2 November repeats 01:00-02:00.
    pub fn fall_back_week() -> DateTime<Tz> {
        chrono_tz::America::New_York
            .with_ymd_and_hms(2025, 11, 4, 9, 0, 0)
            .unwrap()
    }

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }
}

/// Sample events
pub mod events {
    use super::*;

    /// Timed event in January 2025, UTC.
    pub fn january(title: &str, day: u32, start: (u32, u32), end: (u32, u32)) -> Event {
        january_span(title, (day, start.0, start.1), (day, end.0, end.1))
    }

    /// Timed event in January 2025 that may cross midnight.
    pub fn january_span(title: &str, start: (u32, u32, u32), end: (u32, u32, u32)) -> Event {
        let at = |(d, h, m): (u32, u32, u32)| Utc.with_ymd_and_hms(2025, 1, d, h, m, 0).unwrap();
        Event::new(title, at(start), at(end)).unwrap()
    }

    /// Monday 6 January: 9:00-10:00, 9:30-11:00, 10:30-11:30.
    pub fn monday_staircase() -> Vec<Event> {
        vec![
            january("Standup", 6, (9, 0), (10, 0)),
            january("Planning", 6, (9, 30), (11, 0)),
            january("Review", 6, (10, 30), (11, 30)),
        ]
    }

    /// Friday 10 through Monday 13 January.
    pub fn long_weekend() -> Event {
        Event::all_day("Long weekend", dates::date(2025, 1, 10), 4).unwrap()
    }
}

pub fn engine_at(
    date: DateTime<Utc>,
    settings: WeekViewSettings,
) -> WeekViewEngine<Utc, CalendarService<Utc>> {
    WeekViewEngine::new(settings, CalendarService::new(date)).unwrap()
}
