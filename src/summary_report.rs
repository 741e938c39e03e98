use log::warn;
use serde::Deserialize;

use crate::time_report::TimeSummary;

/// 識別できるフィールドがない項目の名前。
pub const UNKNOWN_GROUP_NAME: &str = "Unknown Client/Project";
/// 未記録時間として追加する項目の名前。
pub const UNBOOKED_GROUP_NAME: &str = "Unbooked Time";

/// サマリーレポートの項目の見出し。
///
/// `grouping=clients`, `subgrouping=projects`で取得した場合、
/// 上位の項目は`client`、下位の項目は`project`を持つ。
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SummaryReportTitle {
    pub client: Option<String>,
    pub project: Option<String>,
    pub user: Option<String>,
}

/// サマリーレポートの1項目。
#[derive(Clone, Debug, Default, Deserialize)]
pub struct SummaryReportItem {
    pub title: SummaryReportTitle,
    /// 記録された時間 (ミリ秒)
    pub time: i64,
    pub items: Option<Vec<SummaryReportItem>>,
}

/// グルーピングの種類。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupingKind {
    Client,
    Project,
    User,
    Unknown,
}

/// 集計済みのグループ。
#[derive(Clone, Debug, PartialEq)]
pub struct GroupSummary {
    pub name: String,
    pub kind: GroupingKind,
    /// 記録された時間 (ミリ秒)
    pub booked_time: i64,
    /// 合計に対する割合 (0-100)
    pub percentage_of_total: f64,
    /// 下位のグループ。下位の項目を持たない場合は`None`。
    pub children: Option<Vec<GroupSummary>>,
}

impl SummaryReportTitle {
    /// グルーピングの種類と名前を返す。
    ///
    /// client, project, userの順に、空でない最初のフィールドを採用する。
    pub fn grouping(&self) -> (GroupingKind, &str) {
        let candidates = [
            (GroupingKind::Client, &self.client),
            (GroupingKind::Project, &self.project),
            (GroupingKind::User, &self.user),
        ];
        candidates
            .into_iter()
            .find_map(|(kind, value)| {
                value
                    .as_deref()
                    .filter(|name| !name.is_empty())
                    .map(|name| (kind, name))
            })
            .unwrap_or((GroupingKind::Unknown, UNKNOWN_GROUP_NAME))
    }

    /// 識別できるフィールドの数。
    fn identifier_count(&self) -> usize {
        [&self.client, &self.project, &self.user]
            .into_iter()
            .filter(|value| value.as_deref().map_or(false, |name| !name.is_empty()))
            .count()
    }
}

/// 合計に対する割合を計算する。合計が0以下の場合は0とする。
pub fn calculate_percentage(partial: i64, total: i64) -> f64 {
    if total > 0 {
        100.0 * partial as f64 / total as f64
    } else {
        0.0
    }
}

/// 割合の計算に使う合計時間を返す。
///
/// `total`が与えられた場合はその`time_count`を、そうでなければ項目の時間の合計を使う。
pub fn calculate_total_time(items: &[SummaryReportItem], total: Option<&TimeSummary>) -> i64 {
    match total {
        Some(summary) => summary.time_count,
        None => items.iter().map(|item| item.time).sum(),
    }
}

/// サマリーレポートをグループごとの割合に集計する。
///
/// 下位の項目は再帰的に集計するが、その際は`total`を渡さず兄弟の合計を分母とする。
/// `total`が与えられた階層にのみ`Unbooked Time`の項目を追加する。
/// 結果は各階層で記録時間の降順に並ぶ。
///
/// # Arguments
///
/// * `items` - サマリーレポートの項目
/// * `total` - 詳細レポートから集計した時間
pub fn calculate_summary_totals(
    items: &[SummaryReportItem],
    total: Option<&TimeSummary>,
) -> Vec<GroupSummary> {
    let total_time = calculate_total_time(items, total);

    let mut summaries: Vec<GroupSummary> = items
        .iter()
        .map(|item| {
            if item.title.identifier_count() != 1 {
                warn!("Unexpected summary title shape: {:?}", item.title);
            }
            let (kind, name) = item.title.grouping();

            GroupSummary {
                name: name.to_string(),
                kind,
                booked_time: item.time,
                percentage_of_total: calculate_percentage(item.time, total_time),
                children: item
                    .items
                    .as_deref()
                    .map(|sub_items| calculate_summary_totals(sub_items, None)),
            }
        })
        .collect();

    if let Some(summary) = total {
        summaries.push(GroupSummary {
            name: UNBOOKED_GROUP_NAME.to_string(),
            kind: GroupingKind::Unknown,
            booked_time: summary.unbooked_time,
            percentage_of_total: calculate_percentage(summary.unbooked_time, total_time),
            children: None,
        });
    }

    summaries.sort_by(|a, b| b.booked_time.cmp(&a.booked_time));
    summaries
}
