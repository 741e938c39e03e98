use std::fmt;

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

use crate::datetime;

/// レポート対象の期間を指定する引数。
#[derive(Debug, clap::Args)]
pub struct ReportArgs {
    #[clap(
        short = 'd',
        long = "day",
        help = "Day to report on in the format YYYY-MM-DD. Defaults to today",
        parse(try_from_str = parse_date),
    )]
    day: Option<NaiveDate>,

    #[clap(
        short = 'w',
        long = "week",
        help = "Interpret the day as the start of a week"
    )]
    week: bool,
}

/// レポート対象の期間 (両端の日付を含む)。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportPeriod {
    pub since: NaiveDate,
    pub until: NaiveDate,
}

impl ReportArgs {
    /// 引数から期間を決める。
    ///
    /// 日付が指定されていない場合は、Localタイムゾーンでの今日を利用する。
    /// `week`が指定された場合は、その日から7日後までを期間とする。
    pub fn period(&self) -> ReportPeriod {
        let since = self.day.unwrap_or_else(datetime::today);
        let until = if self.week {
            since + Duration::days(7)
        } else {
            since
        };

        ReportPeriod { since, until }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.since, self.until)
    }
}

/// 日付をパースする。
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Failed to parse date: {}", s))
}
