use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rebuild weekly timetables from precomputed group schedules.
///
/// Results are printed as JSON on stdout; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "timetable-resolver", version, about)]
pub struct CliArgs {
    /// Directory holding default.toml / local.toml
    #[arg(long, default_value = "config")]
    pub config: PathBuf,

    /// Serve group data from a JSON snapshot instead of the directory service
    #[arg(long, env = "TIMETABLE_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve a list of assignments into one weekly schedule
    Resolve {
        /// JSON array of assignments
        #[arg(long)]
        assignments: PathBuf,
    },

    /// Show a group's schedule, resolving or generating it when missing
    Group {
        /// Group name as known to the directory
        #[arg(long)]
        name: String,

        /// JSON array of the group's assignments
        #[arg(long)]
        assignments: PathBuf,
    },

    /// Generate a synthetic schedule for one subject
    Generate {
        #[arg(long)]
        subject: String,

        #[arg(long)]
        professor: String,

        /// Weekly minutes of the subject
        #[arg(long, default_value = "270")]
        minutes: u32,
    },

    /// Print a list of sessions in canonical day/time order
    Sort {
        /// JSON array of sessions
        #[arg(long)]
        sessions: PathBuf,
    },
}
