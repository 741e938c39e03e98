use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;

mod config;
mod console;
mod datetime;
mod error;
mod logging;
mod period;
mod summary_command;
mod summary_report;
mod time_command;
mod time_entry;
mod time_report;
mod toggl;

use config::ApiConfig;
use console::{ConsoleMarkdownList, ConsolePresenter};
use period::ReportArgs;
use summary_command::SummaryCommand;
use time_command::TimeCommand;
use toggl::TogglClient;

/// Togglのレポートから作業時間を集計するためのCLIアプリケーション。
///
/// # Examples
/// ```
/// $ cargo run -- time
/// $ cargo run -- summary --day 2021-07-11 --week
/// ```
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Args {
    #[clap(short = 'D', long = "debug", global = true, help = "Output extra debugging")]
    debug: bool,

    #[clap(flatten)]
    api: ApiConfig,

    #[clap(subcommand)]
    subcommand: SubCommands,
}

/// サブコマンドを表す列挙型。
#[derive(Debug, Subcommand)]
enum SubCommands {
    /// Totals of booked, unbooked and break time
    Time(ReportArgs),
    /// Totals plus the percentage of time per client and project
    Summary(ReportArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_files = config::load_env_files().context("Failed to load environment files")?;
    let args = Args::parse();

    logging::init(args.debug)?;
    debug!("Loaded environment files: {:?}", env_files);
    debug!("{:?}", args);

    let client = TogglClient::new(&args.api);
    let mut stdout = io::stdout();
    let mut presenter = ConsoleMarkdownList::new(&mut stdout);

    match args.subcommand {
        SubCommands::Time(report_args) => {
            let period = report_args.period();
            let summary = TimeCommand::new(&client).run(&period).await?;
            presenter.show_time_summary(&period, &summary)?;
        }
        SubCommands::Summary(report_args) => {
            let period = report_args.period();
            let report = SummaryCommand::new(&client).run(&period).await?;
            presenter.show_time_summary(&period, &report.totals)?;
            presenter.show_group_summaries(&report.groups)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use clap::Parser;
    use rstest::rstest;

    use super::{Args, SubCommands};

    const API_ARGS: [&str; 7] = [
        "toggl-time-reporter",
        "--api-key",
        "token",
        "--email",
        "user@example.com",
        "--workspace-id",
        "123456",
    ];

    fn parse(extra: &[&str]) -> Args {
        Args::try_parse_from(API_ARGS.iter().chain(extra).copied()).unwrap()
    }

    #[rstest]
    #[case::time_day(&["time", "-d", "2021-07-11"], false, "2021-07-11", "2021-07-11")]
    #[case::time_week(&["time", "--day", "2021-07-11", "--week"], false, "2021-07-11", "2021-07-18")]
    #[case::summary_debug(&["summary", "-d", "2021-07-11", "-w", "-D"], true, "2021-07-11", "2021-07-18")]
    fn test_parse_args(
        #[case] extra: &[&str],
        #[case] debug: bool,
        #[case] since: &str,
        #[case] until: &str,
    ) {
        let args = parse(extra);

        assert_eq!(args.debug, debug);
        assert_eq!(args.api.api_token, "token");
        assert_eq!(args.api.workspace_id, "123456");
        let period = match &args.subcommand {
            SubCommands::Time(report_args) | SubCommands::Summary(report_args) => {
                report_args.period()
            }
        };
        assert_eq!(period.since, NaiveDate::parse_from_str(since, "%Y-%m-%d").unwrap());
        assert_eq!(period.until, NaiveDate::parse_from_str(until, "%Y-%m-%d").unwrap());
    }

    #[rstest]
    #[case::invalid_day(&["time", "-d", "2021-13-01"])]
    #[case::no_subcommand(&[])]
    #[case::unknown_subcommand(&["monthly"])]
    fn test_parse_args_error(#[case] extra: &[&str]) {
        let result = Args::try_parse_from(API_ARGS.iter().chain(extra).copied());

        assert!(result.is_err());
    }
}
