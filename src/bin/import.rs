use std::{error::Error, path::PathBuf};

use clap::Parser;
use rusqlite::Connection;

use momo_ledger::{ImportConfig, initialize_db, run_import, setup_logging};

/// Import mobile money SMS messages from an SMS backup XML export.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, default_value = "momo_pay.db")]
    db_path: PathBuf,

    /// File path to the SMS backup XML export.
    #[arg(long)]
    batch_path: PathBuf,

    /// File path to write the report of uncategorized messages to.
    #[arg(long, default_value = "uncategorized_logs.json")]
    report_path: PathBuf,

    /// File path to write debug logs to.
    #[arg(long, default_value = "debug.log")]
    log_path: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(&args.log_path)?;

    let connection = Connection::open(&args.db_path)?;
    initialize_db(&connection)?;

    let summary = run_import(
        &ImportConfig {
            batch_path: args.batch_path,
            report_path: args.report_path,
        },
        &connection,
    )?;

    for (category, count) in &summary.category_counts {
        println!("{:<45}{count}", category.display_name());
    }
    println!(
        "{} stored, {} one-time passwords skipped, {} messages read",
        summary.persisted, summary.one_time_passwords_skipped, summary.messages_read
    );

    Ok(())
}
