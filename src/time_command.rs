use anyhow::{Context, Result};
use log::info;

use crate::period::ReportPeriod;
use crate::time_report::{calculate_time_totals, TimeSummary};
use crate::toggl::TogglRepository;

pub struct TimeCommand<'a, T: TogglRepository> {
    toggl_client: &'a T,
}

impl<'a, T: TogglRepository> TimeCommand<'a, T> {
    /// 新しい`TimeCommand`を返す。
    ///
    /// # Arguments
    /// * `toggl_client` - Toggl APIと通信するためのリポジトリ
    pub fn new(toggl_client: &'a T) -> Self {
        Self { toggl_client }
    }

    /// `time`サブコマンドの処理を行う。
    ///
    /// 期間内の詳細レポートを全て取得し、booked/break/unbookedの時間を集計する。
    ///
    /// # Arguments
    ///
    /// * `period` - 集計対象の期間
    pub async fn run(&self, period: &ReportPeriod) -> Result<TimeSummary> {
        info!("Since: {}, Until: {}", period.since, period.until);

        let items = self
            .toggl_client
            .read_detailed_report(period)
            .await
            .context("Failed to retrieve detailed report")?;
        info!("Detailed report retrieved successfully.");

        let summary = calculate_time_totals(&items).context("Failed to calculate time totals")?;

        Ok(summary)
    }
}
