// Calendar Week View
// Command-line entry point: lays out an event file and prints the week as JSON

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use calendar_weekview::models::layout::WindowRole;
use calendar_weekview::models::snapshot::LayoutSnapshot;
use calendar_weekview::services::date_source::CalendarService;
use calendar_weekview::services::settings::{default_config_path, SettingsService};
use calendar_weekview::utils::date::resolve_local;
use calendar_weekview::{Event, WeekViewEngine, WeekViewSettings};
use chrono::{Local, NaiveDate, TimeZone, Utc};
use clap::Parser;

/// Lay out a JSON event file and print the current week as JSON.
#[derive(Parser, Debug)]
#[command(name = "weekview", version, about)]
struct Args {
    /// JSON array of events
    events_path: PathBuf,

    /// Settings file (TOML); defaults to the per-user config
    #[arg(long = "config")]
    config_path: Option<PathBuf>,

    /// Cursor date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Weeks to page from the cursor, negative for earlier weeks
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    page: i32,
}

fn load_events(path: &Path) -> Result<Vec<Event>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read events file: {:?}", path))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse events file: {:?}", path))
}

fn render<Tz>(tz: Tz, settings: WeekViewSettings, events: Vec<Event>, args: &Args) -> Result<String>
where
    Tz: TimeZone + 'static,
    Tz::Offset: Copy + Display,
{
    let cursor = match args.date {
        Some(date) => {
            let noon = date.and_hms_opt(12, 0, 0).context("Invalid cursor time")?;
            resolve_local(&tz, noon)?
        }
        None => Utc::now().with_timezone(&tz),
    };

    let hour_parts = settings.hour_parts;
    let mut engine = WeekViewEngine::new(settings, CalendarService::new(cursor))?;
    let summary = engine.set_events(events)?;
    log::info!(
        "Laid out {} timed and {} all-day records",
        summary.timed_records,
        summary.all_day_records
    );

    for _ in 0..args.page.unsigned_abs() {
        engine.move_by(args.page.signum())?;
    }

    let snapshot = LayoutSnapshot::from_view(
        engine.view(WindowRole::Current),
        hour_parts,
        Some(engine.title()),
    );
    serde_json::to_string_pretty(&snapshot).context("Failed to serialize layout")
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Calendar Week View");

    let args = Args::parse();

    let settings = match args.config_path.clone().or_else(default_config_path) {
        Some(path) if args.config_path.is_some() => SettingsService::new(path).load()?,
        Some(path) => SettingsService::new(path).load_or_default(),
        None => WeekViewSettings::default(),
    };
    let events = load_events(&args.events_path)?;

    let output = match settings.named_time_zone()? {
        Some(tz) => render(tz, settings, events, &args)?,
        None => render(Local, settings, events, &args)?,
    };
    println!("{}", output);

    Ok(())
}
