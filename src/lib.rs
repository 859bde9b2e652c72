// Calendar Week View Library
// Layout engine for the three-window week view

pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{LayoutError, ValidationError};
pub use models::event::Event;
pub use models::settings::{WeekViewSettings, WindowAssignment};
pub use services::layout::WeekViewEngine;
