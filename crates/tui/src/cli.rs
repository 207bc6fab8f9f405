use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Parser;

use crate::parser::{parse_day, DateParseError};

pub const DEFAULT_CONTEXT: &str = "default";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "gtd",
    version,
    about = "Plan your day: a keyboard-first task list with carry-over between days.",
    after_help = "Examples:\n  gtd                         Open today's tasks\n  gtd 25/12/2025              Open a specific day\n  gtd tomorrow --context work\n  gtd --print --json          Print today's tasks as JSON"
)]
pub struct Cli {
    /// Day to open: dd/mm/yyyy, yyyy-mm-dd, today, tomorrow, +3d, fri (defaults to today)
    #[arg(value_name = "DATE", value_parser = parse_date_arg)]
    pub date: Option<NaiveDate>,

    /// Print the day's tasks and exit instead of launching the TUI
    #[arg(long)]
    pub print: bool,

    /// Print the day as JSON (requires --print)
    #[arg(long, requires = "print")]
    pub json: bool,

    /// Context that scopes every task operation
    #[arg(long, value_name = "NAME", default_value = DEFAULT_CONTEXT, value_parser = parse_context)]
    pub context: String,

    /// Override the data directory (defaults to platform-specific app dir)
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Override the tracing filter written to gtd.log (e.g. "info", "debug")
    #[arg(long = "log", value_name = "DIRECTIVE")]
    pub log_filter: Option<String>,
}

impl Cli {
    /// The requested day, or today when none was given.
    pub fn day(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, DateParseError> {
    parse_day(raw, Local::now().date_naive())
}

fn parse_context(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(String::from("context name must not be empty"))
    } else {
        Ok(trimmed.to_string())
    }
}
