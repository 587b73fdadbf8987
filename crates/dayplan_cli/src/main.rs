//! Command-line entry point for the daily planner.
//!
//! # Responsibility
//! - Expose day store, session edits and assistant calls as subcommands.
//! - Keep all record logic in `dayplan_core`.

use clap::{Parser, Subcommand};
use dayplan_core::db::open_db;
use dayplan_core::{
    default_log_level, init_logging, logging_status, DayRecord, DayStore, GeminiClient,
    GeminiConfig, PlanAssistant, PlannerSession, SqliteKvRepository,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "dayplan", version, about = "Local daily planner")]
struct Cli {
    /// SQLite file holding day records.
    #[arg(long, env = "DAYPLAN_DB", default_value = "dayplan.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "DAYPLAN_LOG_DIR")]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "DAYPLAN_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core linkage info.
    Ping,
    /// Print the record for a date as JSON.
    Show { date: String },
    /// List dates that have stored records.
    Dates,
    /// Add a habit to a day.
    HabitAdd { date: String, name: String },
    /// Toggle a habit's completion.
    ToggleHabit { date: String, id: String },
    /// Tap water glass `glass` (tapping the current count steps back one).
    Water { date: String, glass: u8 },
    /// Set the satisfaction rate (0-10).
    Rate {
        date: String,
        #[arg(allow_negative_numbers = true)]
        rate: i64,
    },
    /// Draft the day from free text using the assistant.
    Draft { date: String, text: String },
    /// Ask the assistant for a short review of the day.
    Summarize { date: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        init_logging(&level, log_dir)?;
    }

    if let Command::Ping = cli.command {
        println!("dayplan_core ping={}", dayplan_core::ping());
        println!("dayplan_core version={}", dayplan_core::core_version());
        match logging_status() {
            Some((level, dir)) => println!("logging level={level} dir={}", dir.display()),
            None => println!("logging off"),
        }
        return Ok(());
    }

    let conn = open_db(&cli.db)?;
    let store = DayStore::new(SqliteKvRepository::new(&conn));

    match cli.command {
        Command::Ping => {}
        Command::Show { date } => {
            let session = PlannerSession::open(store, &date)?;
            print_record(session.record())?;
        }
        Command::Dates => {
            let mut dates = store.list_stored_dates();
            dates.sort();
            for date in dates {
                println!("{date}");
            }
        }
        Command::HabitAdd { date, name } => {
            let mut session = PlannerSession::open(store, &date)?;
            let id = session.add_habit(&name)?;
            println!("{id}");
        }
        Command::ToggleHabit { date, id } => {
            let mut session = PlannerSession::open(store, &date)?;
            session.toggle_habit(&id)?;
        }
        Command::Water { date, glass } => {
            let mut session = PlannerSession::open(store, &date)?;
            println!("water={}", session.tap_water(glass));
        }
        Command::Rate { date, rate } => {
            let mut session = PlannerSession::open(store, &date)?;
            println!("rate={}", session.set_rate(rate));
        }
        Command::Draft { date, text } => {
            let mut session = PlannerSession::open(store, &date)?;
            let assistant = PlanAssistant::new(GeminiClient::new(GeminiConfig::from_env()));
            let updates = assistant.draft_from_text(&date, session.record(), &text)?;
            session.apply_updates(updates);
            info!("event=cli_draft module=cli status=ok date={date}");
            print_record(session.record())?;
        }
        Command::Summarize { date } => {
            let session = PlannerSession::open(store, &date)?;
            let assistant = PlanAssistant::new(GeminiClient::new(GeminiConfig::from_env()));
            println!("{}", assistant.summarize(session.record()));
        }
    }
    Ok(())
}

fn print_record(record: &DayRecord) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}
