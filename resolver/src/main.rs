// Resolver binary entry point

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use common::cache::GroupScheduleCache;
use common::config::Settings;
use common::directory::{GroupDirectory, HttpGroupDirectory, InMemoryGroupDirectory};
use common::models::{SessionSlot, SubjectAssignment};
use common::schedule::{self, AssignmentResolver, ScheduleAssembler, SchedulingWindow};
use common::telemetry;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cli::{CliArgs, Command};

// Assignments resolve one at a time, so a single-threaded runtime suffices
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    let settings =
        Settings::load_from_path(&args.config).context("failed to load configuration")?;
    settings
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;

    telemetry::init_logging(
        &settings.observability.log_level,
        settings.observability.json_logs,
    )?;

    info!(
        directory_url = %settings.directory.base_url,
        snapshot = ?args.snapshot,
        "Configuration loaded"
    );

    match args.command {
        Command::Generate {
            subject,
            professor,
            minutes,
        } => print_json(&schedule::generate(&subject, &professor, minutes)),

        Command::Sort { sessions } => {
            let sessions: Vec<SessionSlot> = read_json(&sessions)?;
            warn_outside_window(&settings.window, &sessions);
            print_json(&schedule::sort(sessions))
        }

        Command::Resolve { assignments } => {
            let assignments: Vec<SubjectAssignment> = read_json(&assignments)?;
            let cache = build_cache(args.snapshot.as_deref(), &settings)?;
            let resolver = AssignmentResolver::new(cache);

            let Some(sessions) = resolver.resolve(&assignments).await else {
                anyhow::bail!("no schedule could be resolved");
            };
            warn_outside_window(&settings.window, &sessions);
            print_json(&sessions)
        }

        Command::Group { name, assignments } => {
            let assignments: Vec<SubjectAssignment> = read_json(&assignments)?;
            let cache = build_cache(args.snapshot.as_deref(), &settings)?;
            let assembler = ScheduleAssembler::new(cache);

            let assembled = assembler.schedule_for_group(&name, &assignments).await;
            warn_outside_window(&settings.window, &assembled.sessions);
            print_json(&assembled)
        }
    }
}

/// Build the cache over either the snapshot file or the HTTP directory
fn build_cache(snapshot: Option<&Path>, settings: &Settings) -> Result<Arc<GroupScheduleCache>> {
    let directory: Arc<dyn GroupDirectory> = match snapshot {
        Some(path) => Arc::new(
            InMemoryGroupDirectory::from_file(path).context("failed to load directory snapshot")?,
        ),
        None => Arc::new(
            HttpGroupDirectory::new(
                &settings.directory.base_url,
                settings.directory.timeout_seconds,
            )
            .context("failed to create directory client")?,
        ),
    };

    Ok(Arc::new(GroupScheduleCache::new(directory)))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Directory data is shown as-is; sessions breaking the window are only reported
fn warn_outside_window(window: &SchedulingWindow, sessions: &[SessionSlot]) {
    for session in sessions {
        if let Err(e) = window.admits(session) {
            warn!(
                subject = %session.subject,
                day = %session.day,
                error = %e,
                "Session violates the scheduling window"
            );
        }
    }
}
