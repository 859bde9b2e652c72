// Event module
// Pre-expanded calendar event as delivered by the event source

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A single, already-expanded calendar event.
///
/// Instants are absolute. All-day events name calendar dates with UTC
/// midnights: an event covering 10 and 11 January runs from
/// `2025-01-10T00:00:00Z` to `2025-01-12T00:00:00Z`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: Option<i64>,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Event {
    /// Create a timed event.
    ///
    /// # Examples
    /// ```
    /// use calendar_weekview::models::event::Event;
    /// use chrono::{TimeZone, Utc};
    ///
    /// let start = Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap();
    /// let end = Utc.with_ymd_and_hms(2025, 1, 6, 10, 0, 0).unwrap();
    /// let event = Event::new("Standup", start, end).unwrap();
    /// assert!(!event.all_day);
    /// ```
    pub fn new<Tz: TimeZone>(
        title: impl Into<String>,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> Result<Self, ValidationError> {
        let event = Self {
            id: None,
            title: title.into(),
            start: start.with_timezone(&Utc),
            end: end.with_timezone(&Utc),
            all_day: false,
            description: None,
            color: None,
        };
        event.validate()?;
        Ok(event)
    }

    /// Create an all-day event covering `days` calendar days from `date`.
    pub fn all_day(
        title: impl Into<String>,
        date: chrono::NaiveDate,
        days: u32,
    ) -> Result<Self, ValidationError> {
        let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
        let event = Self {
            id: None,
            title: title.into(),
            start,
            end: start + Duration::days(i64::from(days)),
            all_day: true,
            description: None,
            color: None,
        };
        event.validate()?;
        Ok(event)
    }

    /// Create a builder for constructing events with optional fields
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// Zero-length events are allowed; only inverted ranges are rejected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end < self.start {
            return Err(ValidationError::EndBeforeStart {
                title: self.title.clone(),
            });
        }
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Builder for creating events with optional fields
#[derive(Default)]
pub struct EventBuilder {
    id: Option<i64>,
    title: String,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    all_day: bool,
    description: Option<String>,
    color: Option<String>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn start<Tz: TimeZone>(mut self, start: DateTime<Tz>) -> Self {
        self.start = Some(start.with_timezone(&Utc));
        self
    }

    pub fn end<Tz: TimeZone>(mut self, end: DateTime<Tz>) -> Self {
        self.end = Some(end.with_timezone(&Utc));
        self
    }

    pub fn all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the event color (hex format, forwarded to the renderer)
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Build the event. A missing end makes a zero-length event.
    pub fn build(self) -> Result<Event, ValidationError> {
        let start = self.start.unwrap_or_else(Utc::now);
        let event = Event {
            id: self.id,
            title: self.title,
            start,
            end: self.end.unwrap_or(start),
            all_day: self.all_day,
            description: self.description,
            color: self.color,
        };

        event.validate()?;
        Ok(event)
    }
}
