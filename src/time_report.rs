use log::debug;

use crate::console::format_millis;
use crate::error::ReportError;
use crate::time_entry::{DetailedReportItem, TimeEntry};

/// ギャップがunbookedとしてログに出る最小の長さ (5分)。
const UNBOOKED_LOG_THRESHOLD_MILLIS: i64 = 5 * 60 * 1000;

/// 集計された時間 (全てミリ秒)。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeSummary {
    /// タスクに記録された時間
    pub booked_time: i64,
    /// 休憩開始のエントリーから次のエントリーまでの時間
    pub break_time: i64,
    /// 休憩として扱われない、同じ日のエントリー間の時間
    pub unbooked_time: i64,
    /// `booked_time + unbooked_time`
    pub time_count: i64,
}

/// 詳細レポートの全件から時間を集計する。
///
/// 1件でも日時を解釈できないエントリーがあればエラーとし、途中までの集計結果は返さない。
///
/// # Arguments
///
/// * `items` - 集計対象期間の詳細レポート
pub fn calculate_time_totals(items: &[DetailedReportItem]) -> Result<TimeSummary, ReportError> {
    let entries = items
        .iter()
        .map(TimeEntry::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(summarize_entries(entries))
}

/// タイムエントリーをbooked/break/unbookedに分類して集計する。
///
/// エントリーは開始日時でソートしてから処理する。
/// `marker`タグの付いたエントリーは休憩開始とみなし、次のエントリーまでの時間をbreakとする。
/// ただし直前のエントリーが休憩開始だった場合は連続せず、通常のエントリーとして扱う。
/// 日をまたぐギャップで休憩中でないものはどこにも計上しない。
pub fn summarize_entries(mut entries: Vec<TimeEntry>) -> TimeSummary {
    entries.sort_by_key(|entry| entry.start);

    let mut summary = TimeSummary::default();
    // 直前のエントリーと、それが休憩開始として扱われたか
    let mut previous: Option<(&TimeEntry, bool)> = None;

    for entry in &entries {
        debug!(
            "Counts so far: total {}, breaks {}, booked {}, unbooked {}",
            format_millis(summary.booked_time + summary.unbooked_time),
            format_millis(summary.break_time),
            format_millis(summary.booked_time),
            format_millis(summary.unbooked_time),
        );
        debug!(
            "Time entry for {}: {} ({} - {})",
            entry.description,
            format_millis(entry.duration),
            entry.start.to_rfc3339(),
            entry.end.to_rfc3339(),
        );

        // 前のエントリーの開始日と、このエントリーの終了日で同じ日かを判定する
        let previous_started_break = previous.map_or(false, |(prev, started_break)| {
            started_break && prev.start.date_naive() == entry.end.date_naive()
        });
        let starts_break = entry.has_break_marker() && !previous_started_break;

        if !starts_break {
            summary.booked_time += entry.duration;
        }

        let gap = previous.map_or(0, |(prev, _)| time_between(prev, entry));
        if previous_started_break {
            summary.break_time += gap;
            debug!("Break time: {}", format_millis(gap));
        } else if previous.map_or(true, |(prev, _)| {
            prev.start.date_naive() == entry.start.date_naive()
        }) {
            summary.unbooked_time += gap;
            if gap > UNBOOKED_LOG_THRESHOLD_MILLIS {
                debug!("Unbooked time since last entry: {}", format_millis(gap));
            }
        } else {
            debug!("Skipped gap across days: {}", format_millis(gap));
        }

        previous = Some((entry, starts_break));
    }

    summary.time_count = summary.booked_time + summary.unbooked_time;
    summary
}

/// 前のエントリーの終了から次のエントリーの開始までの時間 (ミリ秒)。
///
/// エントリーが重なっている場合は負の値になる。
fn time_between(previous: &TimeEntry, current: &TimeEntry) -> i64 {
    (current.start - previous.end).num_milliseconds()
}
