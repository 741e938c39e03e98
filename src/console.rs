use std::io::Write;

use anyhow::{Context, Result};

use crate::period::ReportPeriod;
use crate::summary_report::GroupSummary;
use crate::time_report::TimeSummary;

/// Consoleに集計結果を表示するためのtrait。
pub trait ConsolePresenter {
    /// 期間の集計時間を表示する。
    ///
    /// # Arguments
    ///
    /// * `period` - 集計対象の期間
    /// * `summary` - 集計結果
    fn show_time_summary(&mut self, period: &ReportPeriod, summary: &TimeSummary) -> Result<()>;

    /// グループごとの集計結果を表示する。
    ///
    /// # Arguments
    ///
    /// * `groups` - 表示するグループ
    fn show_group_summaries(&mut self, groups: &[GroupSummary]) -> Result<()>;
}

/// 集計結果をMarkdownのlist形式で表示する。
pub struct ConsoleMarkdownList<'a, W: Write> {
    writer: &'a mut W,
}

impl<'a, W: Write> ConsoleMarkdownList<'a, W> {
    /// 新しい`ConsoleMarkdownList`を返す。
    pub fn new(writer: &'a mut W) -> Self {
        Self { writer }
    }

    fn write_groups(&mut self, groups: &[GroupSummary], depth: usize) -> Result<()> {
        for group in groups {
            writeln!(
                self.writer,
                "{}- {}: {} ({:.2}%)",
                "  ".repeat(depth),
                group.name,
                format_millis(group.booked_time),
                group.percentage_of_total
            )
            .with_context(|| format!("Failed to write group summary: {:?}", group.name))?;

            if let Some(children) = &group.children {
                self.write_groups(children, depth + 1)?;
            }
        }

        Ok(())
    }
}

impl<'a, W: Write> ConsolePresenter for ConsoleMarkdownList<'a, W> {
    fn show_time_summary(&mut self, period: &ReportPeriod, summary: &TimeSummary) -> Result<()> {
        let lines = [
            format!("## Totals for {}", period),
            format!("- Booked time: {}", format_millis(summary.booked_time)),
            format!("- Unbooked time: {}", format_millis(summary.unbooked_time)),
            format!("- Break time: {}", format_millis(summary.break_time)),
            format!("- Total time: {}", format_millis(summary.time_count)),
        ];
        for line in lines {
            writeln!(self.writer, "{}", line).context("Failed to write time summary")?;
        }

        Ok(())
    }

    fn show_group_summaries(&mut self, groups: &[GroupSummary]) -> Result<()> {
        self.write_groups(groups, 0)
    }
}

/// ミリ秒を`HH:MM:SS`形式にする。
///
/// 日数には繰り上げないので、24時間を超える場合も時間で表す。
pub fn format_millis(millis: i64) -> String {
    let sign = if millis < 0 { "-" } else { "" };
    let total_seconds = millis.unsigned_abs() / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds / 60) % 60;
    let seconds = total_seconds % 60;

    format!("{}{:02}:{:02}:{:02}", sign, hours, minutes, seconds)
}
