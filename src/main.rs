use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use gtd::commands::ReportFormat;
use gtd::db::Database;

fn main() -> Result<()> {
    let cli = gtd::cli::Cli::parse();
    let config = gtd::config::from_cli(&cli)?;
    gtd::logging::init_tracing(cli.log_filter.as_deref(), config.log_path())?;

    let date = cli.day();
    debug!(%date, context = %cli.context, data_dir = %config.data_dir().display(), "starting");

    let database = Database::initialize(&config).with_context(|| {
        format!("failed to open database at {}", config.db_path().display())
    })?;

    if cli.print {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        let printed = gtd::commands::print_day(
            &database,
            date,
            &cli.context,
            ReportFormat::from_json_flag(cli.json),
            &mut handle,
        );
        database.close()?;
        return printed;
    }

    let database = gtd::tui::run(config, database, date, &cli.context)?;
    database.close()?;
    println!("See you later!");

    Ok(())
}
