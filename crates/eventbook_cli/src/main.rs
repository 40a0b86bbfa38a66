//! `eventbook` command-line shell.
//!
//! # Responsibility
//! - Parse arguments/environment into core requests.
//! - Own the database connection and logging lifecycle for one invocation.
//! - Print records as JSON and failures with their stable error code.

mod render;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use eventbook_core::db::open_db;
use eventbook_core::timezone::{zone_catalog, DEFAULT_ZONE};
use eventbook_core::{
    default_log_level, init_logging, trim_profile_name, CreateEventRequest, EventService,
    EventServiceError, ProfileError, SqliteEventRepository, SqliteProfileRepository,
    UpdateEventRequest, WallClock, ZoneId,
};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "eventbook")]
#[command(about = "Book profiles into time zone aware events with an audit trail")]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "EVENTBOOK_DB", default_value = "eventbook.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rotating diagnostic logs; logging is off when unset
    #[arg(long, env = "EVENTBOOK_LOG_DIR")]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error (defaults per build mode)
    #[arg(long, env = "EVENTBOOK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Zone used to display instants
    #[arg(long, env = "EVENTBOOK_TIMEZONE", default_value = DEFAULT_ZONE)]
    display_zone: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage profiles
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Manage events
    #[command(subcommand)]
    Event(EventCommand),
    /// Print the curated zone list
    Zones,
}

#[derive(Subcommand)]
enum ProfileCommand {
    Create { name: String },
    List,
}

#[derive(Subcommand)]
enum EventCommand {
    Create {
        /// Participant name; repeat for several
        #[arg(short, long = "profile", required = true)]
        profiles: Vec<String>,
        #[arg(long, default_value = DEFAULT_ZONE)]
        timezone: String,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Events that include a profile, newest first
    List { profile_id: Uuid },
    Update {
        id: Uuid,
        /// Replaces the participant list; repeat for several
        #[arg(short, long = "profile")]
        profiles: Vec<String>,
        #[arg(long)]
        timezone: Option<String>,
        #[command(flatten)]
        range: RangeArgs,
    },
    Delete { id: Uuid },
    /// Print the audit trail of one event
    Logs { id: Uuid },
}

#[derive(Args)]
struct RangeArgs {
    /// YYYY-MM-DD
    #[arg(long, requires = "start_time")]
    start_date: Option<String>,
    /// HH:MM
    #[arg(long, requires = "start_date")]
    start_time: Option<String>,
    #[arg(long, requires = "end_time")]
    end_date: Option<String>,
    #[arg(long, requires = "end_date")]
    end_time: Option<String>,
}

impl RangeArgs {
    fn start(&self) -> Option<WallClock> {
        wall_clock(self.start_date.as_ref(), self.start_time.as_ref())
    }

    fn end(&self) -> Option<WallClock> {
        wall_clock(self.end_date.as_ref(), self.end_time.as_ref())
    }
}

fn wall_clock(date: Option<&String>, time: Option<&String>) -> Option<WallClock> {
    match (date, time) {
        (Some(date), Some(time)) => Some(WallClock::new(date.as_str(), time.as_str())),
        _ => None,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    let display_zone =
        ZoneId::parse(&cli.display_zone).map_err(|err| anyhow!("[invalid_zone] {err}"))?;

    if let Commands::Zones = cli.command {
        return render::print_json(zone_catalog());
    }

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database {}", cli.db.display()))?;
    let service = EventService::new(
        SqliteProfileRepository::new(&conn),
        SqliteEventRepository::new(&conn),
    );

    match cli.command {
        Commands::Zones => Ok(()),
        Commands::Profile(ProfileCommand::Create { name }) => {
            let name = trim_profile_name(&name).map_err(profile_failure)?;
            let profile = service.directory().create(name).map_err(profile_failure)?;
            render::print_json(&profile)
        }
        Commands::Profile(ProfileCommand::List) => {
            let profiles = service.directory().list().map_err(profile_failure)?;
            render::print_json(&profiles)
        }
        Commands::Event(EventCommand::Create {
            profiles,
            timezone,
            range,
        }) => {
            let (Some(start), Some(end)) = (range.start(), range.end()) else {
                return Err(anyhow!(
                    "[invalid_time] --start-date/--start-time and --end-date/--end-time are required"
                ));
            };
            let request = CreateEventRequest {
                profile_names: profiles,
                timezone,
                start,
                end,
            };
            let record = service.create(&request).map_err(event_failure)?;
            render::print_json(&render::EventView::new(&record, display_zone))
        }
        Commands::Event(EventCommand::List { profile_id }) => {
            let records = service
                .list_for_profile(profile_id)
                .map_err(event_failure)?;
            let views: Vec<_> = records
                .iter()
                .map(|record| render::EventView::new(record, display_zone))
                .collect();
            render::print_json(&views)
        }
        Commands::Event(EventCommand::Update {
            id,
            profiles,
            timezone,
            range,
        }) => {
            let request = UpdateEventRequest {
                profile_names: (!profiles.is_empty()).then_some(profiles),
                timezone,
                start: range.start(),
                end: range.end(),
            };
            let record = service.update(id, &request).map_err(event_failure)?;
            render::print_json(&render::EventView::new(&record, display_zone))
        }
        Commands::Event(EventCommand::Delete { id }) => {
            service.delete(id).map_err(event_failure)?;
            println!("Event deleted");
            Ok(())
        }
        Commands::Event(EventCommand::Logs { id }) => {
            let record = service.get(id).map_err(event_failure)?;
            for line in render::log_lines(&record, display_zone) {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn event_failure(err: EventServiceError) -> anyhow::Error {
    anyhow!("[{}] {err}", err.error_code())
}

fn profile_failure(err: ProfileError) -> anyhow::Error {
    anyhow!("[{}] {err}", err.error_code())
}
