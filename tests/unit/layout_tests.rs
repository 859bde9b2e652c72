// Engine-level layout tests
// Scenarios run through WeekViewEngine with a real CalendarService

#[path = "../fixtures/mod.rs"]
mod fixtures;

use std::time::{Duration as StdDuration, Instant};

use calendar_weekview::models::layout::{PlacementRecord, WindowRole};
use calendar_weekview::services::date_source::{CalendarService, DateSource};
use calendar_weekview::services::layout::WeekViewNotification;
use calendar_weekview::{Event, LayoutError, WeekViewEngine, WeekViewSettings, WindowAssignment};
use chrono::{Duration, TimeZone, Utc};
use fixtures::{dates, engine_at, events};
use pretty_assertions::assert_eq;
use test_case::test_case;

fn layout_of(records: &[PlacementRecord]) -> Vec<(usize, usize, usize, Option<usize>)> {
    records
        .iter()
        .map(|r| (r.start_index, r.end_index, r.position, r.overlap_number))
        .collect()
}

#[test]
fn test_monday_staircase_shares_one_width() {
    let mut engine = engine_at(dates::mid_january_2025(), WeekViewSettings::default());
    engine.set_events(events::monday_staircase()).unwrap();

    let monday: Vec<PlacementRecord> = engine
        .view(WindowRole::Current)
        .day_records(1)
        .cloned()
        .collect();

    assert_eq!(
        layout_of(&monday),
        vec![(9, 10, 0, Some(2)), (9, 11, 1, Some(2)), (10, 12, 0, Some(2))]
    );
}

#[test]
fn test_touching_events_stay_full_width() {
    let mut engine = engine_at(dates::mid_january_2025(), WeekViewSettings::default());
    engine
        .set_events(vec![
            events::january("First", 7, (9, 0), (10, 0)),
            events::january("Second", 7, (10, 0), (11, 0)),
        ])
        .unwrap();

    let tuesday: Vec<PlacementRecord> = engine
        .view(WindowRole::Current)
        .day_records(2)
        .cloned()
        .collect();

    assert_eq!(
        layout_of(&tuesday),
        vec![(9, 10, 0, Some(1)), (10, 11, 0, Some(1))]
    );
    assert!(tuesday.iter().all(|r| r.geometry(1).width == 1.0));
}

#[test]
fn test_long_weekend_split_over_windows() {
    let mut engine = engine_at(dates::mid_january_2025(), WeekViewSettings::default());
    engine.set_events(vec![events::long_weekend()]).unwrap();

    let current: Vec<_> = engine.view(WindowRole::Current).all_day_records().collect();
    let next: Vec<_> = engine.view(WindowRole::Next).all_day_records().collect();

    assert_eq!(current.len(), 1);
    assert_eq!((current[0].start_index, current[0].end_index), (5, 7));
    assert_eq!(next.len(), 1);
    assert_eq!((next[0].start_index, next[0].end_index), (0, 2));
    assert!(!engine.view(WindowRole::Previous).has_all_day_events());
}

#[test]
fn test_first_match_keeps_single_copy() {
    let settings = WeekViewSettings {
        window_assignment: WindowAssignment::FirstMatch,
        ..Default::default()
    };
    let mut engine = engine_at(dates::mid_january_2025(), settings);
    engine.set_events(vec![events::long_weekend()]).unwrap();

    assert!(engine.view(WindowRole::Current).has_all_day_events());
    assert!(!engine.view(WindowRole::Next).has_all_day_events());
}

#[test]
fn test_overlapping_all_day_events_stack() {
    let mut engine = engine_at(dates::mid_january_2025(), WeekViewSettings::default());
    engine
        .set_events(vec![
            Event::all_day("Conference", dates::date(2025, 1, 6), 3).unwrap(),
            Event::all_day("Visit", dates::date(2025, 1, 7), 1).unwrap(),
            Event::all_day("Holiday", dates::date(2025, 1, 10), 1).unwrap(),
        ])
        .unwrap();

    let positions: Vec<(String, usize, Option<usize>)> = engine
        .view(WindowRole::Current)
        .all_day_records()
        .map(|r| (r.event.title.clone(), r.position, r.overlap_number))
        .collect();

    assert_eq!(
        positions,
        vec![
            ("Conference".to_string(), 0, None),
            ("Visit".to_string(), 1, None),
            ("Holiday".to_string(), 0, None),
        ]
    );
}

#[test]
fn test_refresh_is_idempotent() {
    let mut engine = engine_at(dates::mid_january_2025(), WeekViewSettings::default());
    let mut list = events::monday_staircase();
    list.push(events::january_span("Overnight", (8, 22, 0), (9, 3, 0)));
    list.push(events::long_weekend());
    engine.set_events(list).unwrap();
    let before = engine.views().to_vec();

    engine.refresh_view().unwrap();
    engine.on_data_loaded();

    assert_eq!(engine.views(), &before[..]);
}

#[test]
fn test_paging_round_trip_restores_layout() {
    let mut engine = engine_at(dates::mid_january_2025(), WeekViewSettings::default());
    engine.set_events(events::monday_staircase()).unwrap();
    let start_range = engine.range();
    let current = engine.view(WindowRole::Current).clone();

    engine.move_by(1).unwrap();
    assert_eq!(engine.range().start_time, start_range.end_time);
    assert!(!engine.view(WindowRole::Current).has_timed_events());
    assert_eq!(engine.view(WindowRole::Previous), &current);

    engine.move_by(-1).unwrap();
    assert_eq!(engine.range(), start_range);
    assert_eq!(engine.view(WindowRole::Current), &current);
    assert_eq!(engine.current_slot(), 0);
}

#[test_case(1, 1; "forward slide")]
#[test_case(2, -1; "backward slide")]
fn test_slide_settles_into_move(visible_slot: usize, weeks: i64) {
    let mut engine = engine_at(dates::mid_january_2025(), WeekViewSettings::default());
    let start = engine.range().start_time;
    let now = Instant::now();

    engine.on_slide_changed(visible_slot, now);
    assert!(!engine.settle(now).unwrap());
    assert!(engine.settle(now + StdDuration::from_millis(250)).unwrap());
    assert!(!engine.settle(now + StdDuration::from_millis(500)).unwrap());

    assert_eq!(engine.current_slot(), visible_slot);
    assert_eq!(engine.range().start_time, start + Duration::weeks(weeks));
}

#[test]
fn test_latest_slide_wins() {
    let mut engine = engine_at(dates::mid_january_2025(), WeekViewSettings::default());
    let start = engine.range().start_time;
    let now = Instant::now();

    engine.on_slide_changed(1, now);
    engine.on_slide_changed(2, now + StdDuration::from_millis(100));
    assert!(!engine.settle(now + StdDuration::from_millis(250)).unwrap());
    assert!(engine.settle(now + StdDuration::from_millis(300)).unwrap());

    assert_eq!(engine.range().start_time, start - Duration::weeks(1));
}

#[test]
fn test_navigation_notifications() {
    let mut engine = engine_at(dates::mid_january_2025(), WeekViewSettings::default());
    engine.drain_notifications();

    engine.move_by(1).unwrap();

    assert_eq!(
        engine.drain_notifications(),
        vec![
            WeekViewNotification::TitleChanged("January 2025, Week 2".to_string()),
            WeekViewNotification::RangeChanged(engine.range()),
        ]
    );
    assert_eq!(
        engine.source().current_date(),
        dates::mid_january_2025() + Duration::weeks(1)
    );
}

#[test]
fn test_monday_start_week() {
    let settings = WeekViewSettings {
        starting_day_of_week: 1,
        ..Default::default()
    };
    let mut engine = engine_at(dates::mid_january_2025(), settings);
    engine.set_events(events::monday_staircase()).unwrap();

    assert_eq!(
        engine.range().start_time,
        Utc.with_ymd_and_hms(2025, 1, 6, 0, 0, 0).unwrap()
    );
    assert_eq!(engine.view(WindowRole::Current).day_records(0).count(), 3);
}

#[test]
fn test_invalid_event_rejected_at_ingestion() {
    let mut engine = engine_at(dates::mid_january_2025(), WeekViewSettings::default());
    let mut inverted = events::january("Inverted", 6, (9, 0), (10, 0));
    std::mem::swap(&mut inverted.start, &mut inverted.end);

    assert!(matches!(
        engine.set_events(vec![inverted]),
        Err(LayoutError::Validation(_))
    ));
    assert!(engine.events().is_empty());
}

#[test]
fn test_spring_forward_week() {
    let cursor = dates::spring_forward_week();
    let tz = cursor.timezone();
    let mut engine =
        WeekViewEngine::new(WeekViewSettings::default(), CalendarService::new(cursor)).unwrap();
    engine
        .set_events(vec![Event::new(
            "Breakfast",
            tz.with_ymd_and_hms(2025, 3, 12, 8, 0, 0).unwrap(),
            tz.with_ymd_and_hms(2025, 3, 12, 9, 0, 0).unwrap(),
        )
        .unwrap()])
        .unwrap();

    let current = engine.view(WindowRole::Current);
    assert_eq!(current.rows.len(), 24);
    assert_eq!(current.rows[8][3].events.len(), 1);
    assert_eq!(current.rows[8][3].time, tz.with_ymd_and_hms(2025, 3, 12, 8, 0, 0).unwrap());

    let range = engine.range();
    assert_eq!(range.end_time - range.start_time, Duration::hours(167));
    assert_eq!(engine.view(WindowRole::Next).window.start_time, range.end_time);
    assert_eq!(
        engine.view(WindowRole::Next).window.end_time - range.end_time,
        Duration::days(7)
    );
}

#[test]
fn test_fall_back_week_event_after_transition() {
    let cursor = dates::fall_back_week();
    let tz = cursor.timezone();
    let mut engine =
        WeekViewEngine::new(WeekViewSettings::default(), CalendarService::new(cursor)).unwrap();
    engine
        .set_events(vec![Event::new(
            "Lunch",
            tz.with_ymd_and_hms(2025, 11, 3, 12, 0, 0).unwrap(),
            tz.with_ymd_and_hms(2025, 11, 3, 13, 0, 0).unwrap(),
        )
        .unwrap()])
        .unwrap();

    let range = engine.range();
    assert_eq!(range.end_time - range.start_time, Duration::hours(169));
    assert_eq!(engine.view(WindowRole::Current).rows[12][1].events.len(), 1);
    assert_eq!(
        engine.view(WindowRole::Previous).window.end_time,
        range.start_time
    );
}
