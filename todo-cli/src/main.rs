//! todo — interactive console task manager with recurring tasks.

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Parser;
use todo_core::{Priority, RecurrenceRule, Task, TaskStore};
use tracing_subscriber::EnvFilter;

mod config;
mod format;
mod menu;

#[derive(Parser, Debug)]
#[command(name = "todo", version, about = "Console todo app with recurring tasks")]
struct Cli {
    /// IANA timezone for entering and displaying dates (saved to the profile)
    #[arg(long)]
    timezone: Option<String>,

    /// Start the session with a few sample tasks
    #[arg(long)]
    demo: bool,
}

fn main() -> Result<()> {
    // Tracing is opt-in via RUST_LOG; user-facing output stays on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")),
        )
        .init();

    let cli = Cli::parse();

    let mut profile = config::read_profile()?;
    if let Some(tz) = cli.timezone {
        profile.timezone = tz;
        config::write_profile(&profile)?;
    }
    tracing::debug!(timezone = %profile.timezone, "profile loaded");

    let mut store = TaskStore::new();
    if cli.demo {
        seed_demo(&mut store);
    }

    let mut app = menu::App::new(store, profile.timezone)?;
    app.run()
}

fn seed_demo(store: &mut TaskStore) {
    let now = Utc::now();
    store.add(
        Task::new("Daily standup", now)
            .with_description("Team sync")
            .with_priority(Priority::High)
            .with_tags(vec!["work".to_string()])
            .with_due_date(now + Duration::hours(18))
            .with_recurrence(RecurrenceRule::Daily),
    );
    store.add(
        Task::new("Buy groceries", now)
            .with_tags(vec!["errands".to_string()])
            .with_due_date(now + Duration::days(2)),
    );
    store.add(
        Task::new("Pay rent", now)
            .with_priority(Priority::High)
            .with_due_date(now + Duration::days(10))
            .with_recurrence(RecurrenceRule::Monthly),
    );
}
