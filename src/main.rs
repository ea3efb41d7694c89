#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # pauta
//!
//! Command-line front end: `pauta run` grades the configured roster range and
//! writes the results back to the sheet; `pauta check` grades the same range
//! but prints a summary table instead of writing.

use anyhow::Result;
use bpaf::*;
use dotenvy::dotenv;
use pauta::{
    config::{DEFAULT_RANGE, DEFAULT_SPREADSHEET_ID, RosterConfig, SheetsEnv},
    grade::MAXIMUM_ABSENCES,
    roster::{grade_range, summary_table, write_results},
    sheets::{GoogleSheets, SheetsError},
};
use tracing::{Level, info, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Grade the roster and write the verdicts back.
    Run(RosterConfig),
    /// Grade the roster and print a summary without writing.
    Check(RosterConfig),
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses the roster flags shared by every command
    fn roster() -> impl Parser<RosterConfig> {
        let spreadsheet = long("spreadsheet")
            .help("Spreadsheet id to operate on")
            .argument::<String>("ID")
            .fallback(DEFAULT_SPREADSHEET_ID.to_owned());
        let range = long("range")
            .help("A1 range holding the roster rows")
            .argument::<String>("RANGE")
            .fallback(DEFAULT_RANGE.to_owned());
        let max_absences = long("max-absences")
            .help("Absence ceiling before automatic failure")
            .argument::<u32>("N")
            .fallback(MAXIMUM_ABSENCES);

        construct!(spreadsheet, range, max_absences).map(|(spreadsheet_id, range, max_absences)| {
            RosterConfig::builder()
                .spreadsheet_id(spreadsheet_id)
                .range(range)
                .max_absences(max_absences)
                .build()
        })
    }

    let run = construct!(Cmd::Run(roster()))
        .to_options()
        .command("run")
        .help("Grade the roster and write situations and thresholds to the sheet");

    let check = construct!(Cmd::Check(roster()))
        .to_options()
        .command("check")
        .help("Grade the roster and print a summary table without writing");

    let cmd = construct!([run, check]);

    cmd.to_options()
        .descr("Grades a class roster stored in Google Sheets")
        .run()
}

/// Builds the live Sheets client for the configured spreadsheet, failing with
/// a distinct auth error when no token is configured.
fn sheets_store(config: &RosterConfig) -> Result<GoogleSheets> {
    let env = SheetsEnv::from_env().ok_or(SheetsError::Auth)?;
    Ok(GoogleSheets::new(
        env.api_base().to_owned(),
        config.spreadsheet_id.clone(),
        env.token().to_owned(),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(Level::INFO);
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    let cmd = options();

    match cmd {
        Cmd::Run(config) => {
            let store = sheets_store(&config)?;
            let graded = grade_range(&store, &config).await?;
            write_results(&store, &graded).await?;
            info!(rows = graded.len(), "write-back complete");
        }
        Cmd::Check(config) => {
            let store = sheets_store(&config)?;
            let graded = grade_range(&store, &config).await?;
            println!("{}", summary_table(&graded));
        }
    };

    Ok(())
}
