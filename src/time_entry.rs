use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::error::ReportError;

/// 休憩開始を表すタグ。
pub const BREAK_MARKER_TAG: &str = "marker";

/// Toggl Reports APIの詳細レポートの1件。
///
/// 集計に必要なフィールドのみをデシリアライズする。
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DetailedReportItem {
    #[serde(default)]
    pub description: String,
    /// ISO 8601 (オフセット付き) の開始日時
    pub start: String,
    /// ISO 8601 (オフセット付き) の終了日時
    pub end: String,
    /// 経過時間 (ミリ秒)
    pub dur: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// 日時を解釈済みのタイムエントリー。
#[derive(Clone, Debug, PartialEq)]
pub struct TimeEntry {
    pub description: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    /// 経過時間 (ミリ秒)。`end - start`とずれることがあるが、こちらを正とする。
    pub duration: i64,
    pub tags: Vec<String>,
}

impl TimeEntry {
    /// 休憩開始のタグが付いているかを返す。
    pub fn has_break_marker(&self) -> bool {
        self.tags.iter().any(|tag| tag == BREAK_MARKER_TAG)
    }
}

impl TryFrom<&DetailedReportItem> for TimeEntry {
    type Error = ReportError;

    fn try_from(item: &DetailedReportItem) -> Result<Self, Self::Error> {
        Ok(Self {
            description: item.description.clone(),
            start: parse_instant("start", &item.start)?,
            end: parse_instant("end", &item.end)?,
            duration: item.dur,
            tags: item.tags.clone(),
        })
    }
}

fn parse_instant(field: &'static str, value: &str) -> Result<DateTime<FixedOffset>, ReportError> {
    DateTime::parse_from_rfc3339(value).map_err(|source| ReportError::MalformedInstant {
        field,
        value: value.to_string(),
        source,
    })
}
