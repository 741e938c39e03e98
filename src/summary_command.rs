use anyhow::{Context, Result};
use log::info;

use crate::period::ReportPeriod;
use crate::summary_report::{calculate_summary_totals, GroupSummary};
use crate::time_report::{calculate_time_totals, TimeSummary};
use crate::toggl::TogglRepository;

/// `summary`サブコマンドの結果。
#[derive(Debug)]
pub struct SummaryReport {
    pub totals: TimeSummary,
    pub groups: Vec<GroupSummary>,
}

pub struct SummaryCommand<'a, T: TogglRepository> {
    toggl_client: &'a T,
}

impl<'a, T: TogglRepository> SummaryCommand<'a, T> {
    /// 新しい`SummaryCommand`を返す。
    ///
    /// # Arguments
    /// * `toggl_client` - Toggl APIと通信するためのリポジトリ
    pub fn new(toggl_client: &'a T) -> Self {
        Self { toggl_client }
    }

    /// `summary`サブコマンドの処理を行う。
    ///
    /// 詳細レポートから集計した合計時間を分母として、client、projectごとの割合を計算する。
    /// 合計には未記録の時間も含まれるため、`Unbooked Time`の項目が追加される。
    ///
    /// # Arguments
    ///
    /// * `period` - 集計対象の期間
    pub async fn run(&self, period: &ReportPeriod) -> Result<SummaryReport> {
        info!("Since: {}, Until: {}", period.since, period.until);

        let detailed_items = self
            .toggl_client
            .read_detailed_report(period)
            .await
            .context("Failed to retrieve detailed report")?;
        let totals =
            calculate_time_totals(&detailed_items).context("Failed to calculate time totals")?;

        let summary_items = self
            .toggl_client
            .read_summary_report(period)
            .await
            .context("Failed to retrieve summary report")?;
        info!("Reports retrieved successfully.");

        let groups = calculate_summary_totals(&summary_items, Some(&totals));

        Ok(SummaryReport { totals, groups })
    }
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;
    use chrono::NaiveDate;

    use super::SummaryCommand;
    use crate::period::ReportPeriod;
    use crate::summary_report::{GroupingKind, SummaryReportItem, SummaryReportTitle};
    use crate::time_entry::DetailedReportItem;
    use crate::toggl::MockTogglRepository;

    fn period() -> ReportPeriod {
        ReportPeriod {
            since: NaiveDate::from_ymd_opt(2020, 9, 3).unwrap(),
            until: NaiveDate::from_ymd_opt(2020, 9, 10).unwrap(),
        }
    }

    fn detailed_item(start: &str, end: &str, dur: i64) -> DetailedReportItem {
        DetailedReportItem {
            description: String::new(),
            start: start.to_string(),
            end: end.to_string(),
            dur,
            tags: vec![],
        }
    }

    fn summary_item(client: &str, time: i64, projects: &[(&str, i64)]) -> SummaryReportItem {
        SummaryReportItem {
            title: SummaryReportTitle {
                client: Some(client.to_string()),
                ..Default::default()
            },
            time,
            items: Some(
                projects
                    .iter()
                    .map(|(project, time)| SummaryReportItem {
                        title: SummaryReportTitle {
                            project: Some(project.to_string()),
                            ..Default::default()
                        },
                        time: *time,
                        items: None,
                    })
                    .collect(),
            ),
        }
    }

    #[tokio::test]
    async fn test_summary_command() {
        let mut toggl = MockTogglRepository::new();
        toggl
            .expect_read_detailed_report()
            .times(1)
            .returning(|_| {
                Ok(vec![
                    detailed_item("2020-09-03T09:00:00+01:00", "2020-09-03T11:00:00+01:00", 7_200_000),
                    detailed_item("2020-09-03T12:00:00+01:00", "2020-09-03T13:00:00+01:00", 3_600_000),
                ])
            });
        toggl
            .expect_read_summary_report()
            .times(1)
            .returning(|_| {
                Ok(vec![
                    summary_item("Client-1", 3_600_000, &[("Project-1", 3_600_000)]),
                    summary_item(
                        "Client-2",
                        7_200_000,
                        &[("Project-2", 1_800_000), ("Project-3", 5_400_000)],
                    ),
                ])
            });

        let command = SummaryCommand::new(&toggl);
        let report = command.run(&period()).await.unwrap();

        assert_eq!(report.totals.booked_time, 10_800_000);
        assert_eq!(report.totals.unbooked_time, 3_600_000);
        assert_eq!(report.totals.time_count, 14_400_000);

        let rows: Vec<(&str, GroupingKind, i64, String)> = report
            .groups
            .iter()
            .map(|group| {
                (
                    group.name.as_str(),
                    group.kind,
                    group.booked_time,
                    format!("{:.2}", group.percentage_of_total),
                )
            })
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Client-2", GroupingKind::Client, 7_200_000, "50.00".to_string()),
                ("Client-1", GroupingKind::Client, 3_600_000, "25.00".to_string()),
                ("Unbooked Time", GroupingKind::Unknown, 3_600_000, "25.00".to_string()),
            ]
        );

        let projects = report.groups[0].children.as_ref().unwrap();
        assert_eq!(projects[0].name, "Project-3");
        assert_eq!(format!("{:.2}", projects[0].percentage_of_total), "75.00");
        assert_eq!(projects[1].name, "Project-2");
        assert_eq!(format!("{:.2}", projects[1].percentage_of_total), "25.00");
    }

    #[tokio::test]
    async fn test_summary_command_summary_error() {
        let mut toggl = MockTogglRepository::new();
        toggl
            .expect_read_detailed_report()
            .times(1)
            .returning(|_| Ok(vec![]));
        toggl
            .expect_read_summary_report()
            .times(1)
            .returning(|_| Err(anyhow!("connection refused")));

        let command = SummaryCommand::new(&toggl);
        let result = command.run(&period()).await;

        assert!(result.is_err());
    }

    /// 詳細レポートの集計に失敗した場合はサマリーレポートを取得しない。
    #[tokio::test]
    async fn test_summary_command_malformed_instant() {
        let mut toggl = MockTogglRepository::new();
        toggl
            .expect_read_detailed_report()
            .times(1)
            .returning(|_| Ok(vec![detailed_item("invalid", "invalid", 0)]));
        toggl.expect_read_summary_report().times(0);

        let command = SummaryCommand::new(&toggl);
        let result = command.run(&period()).await;

        assert!(result.is_err());
    }
}
