// Settings module
// Week view configuration, loadable from TOML

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Token in `format_week_title` replaced by the ISO-8601 week number.
pub const WEEK_NUMBER_TOKEN: &str = "$n";

/// Which windows an event straddling a window boundary is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowAssignment {
    /// Place the event in every window it intersects.
    #[default]
    EveryIntersecting,
    /// Place the event once: current, else next, else previous.
    FirstMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekViewSettings {
    /// 0 = Sunday, 1 = Monday, ...
    pub starting_day_of_week: u8,
    /// Sub-hour slots per hour row (4 = 15-minute resolution)
    pub hour_parts: u32,
    pub format_week_title: String,
    pub format_day_header: String,
    pub format_hour_column: String,
    pub all_day_label: String,
    pub window_assignment: WindowAssignment,
    /// IANA zone name used by the CLI; the library takes the zone as a type.
    pub time_zone: Option<String>,
}

impl Default for WeekViewSettings {
    fn default() -> Self {
        Self {
            starting_day_of_week: 0, // Sunday
            hour_parts: 1,
            format_week_title: "%B %Y, Week $n".to_string(),
            format_day_header: "%a %-d".to_string(),
            format_hour_column: "%-I%P".to_string(),
            all_day_label: "all day".to_string(),
            window_assignment: WindowAssignment::default(),
            time_zone: None,
        }
    }
}

impl WeekViewSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.starting_day_of_week > 6 {
            return Err(ValidationError::StartingDayOutOfRange(
                self.starting_day_of_week,
            ));
        }

        if self.hour_parts == 0 {
            return Err(ValidationError::ZeroHourParts);
        }

        check_format("format_week_title", &self.format_week_title)?;
        check_format("format_day_header", &self.format_day_header)?;
        check_format("format_hour_column", &self.format_hour_column)?;

        if let Some(name) = &self.time_zone {
            self.parse_time_zone(name)?;
        }

        Ok(())
    }

    /// Resolve the configured zone name, if any.
    pub fn named_time_zone(&self) -> Result<Option<chrono_tz::Tz>, ValidationError> {
        self.time_zone
            .as_deref()
            .map(|name| self.parse_time_zone(name))
            .transpose()
    }

    fn parse_time_zone(&self, name: &str) -> Result<chrono_tz::Tz, ValidationError> {
        name.parse::<chrono_tz::Tz>()
            .map_err(|_| ValidationError::UnknownTimeZone(name.to_string()))
    }
}

// chrono panics when displaying a malformed format, so reject it up front.
fn check_format(field: &'static str, format: &str) -> Result<(), ValidationError> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ValidationError::InvalidFormat {
            field,
            format: format.to_string(),
        });
    }
    Ok(())
}
