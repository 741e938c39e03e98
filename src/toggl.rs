use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::{
    header::{ACCEPT, ACCEPT_LANGUAGE},
    Client, RequestBuilder,
};
use serde::Deserialize;

use crate::config::ApiConfig;
use crate::console::format_millis;
use crate::period::ReportPeriod;
use crate::summary_report::SummaryReportItem;
use crate::time_entry::DetailedReportItem;

/// Toggl Reports API v2のURL。
const REPORTS_API_URL: &str = "https://api.track.toggl.com/reports/api/v2";

/// 詳細レポートのレスポンスをデシリアライズするための構造体。
#[derive(Debug, Deserialize)]
struct DetailedReportResponse {
    /// 期間全体の記録時間 (ミリ秒)
    total_grand: Option<i64>,
    total_count: i64,
    per_page: i64,
    data: Vec<DetailedReportItem>,
}

/// サマリーレポートのレスポンスをデシリアライズするための構造体。
#[derive(Debug, Deserialize)]
struct SummaryReportResponse {
    data: Vec<SummaryReportItem>,
}

/// Toggl Reports APIからレポートを取得するためのtrait。
#[cfg_attr(test, mockall::automock)]
pub trait TogglRepository {
    /// 期間内の詳細レポートを全ページ分取得する。
    async fn read_detailed_report(&self, period: &ReportPeriod) -> Result<Vec<DetailedReportItem>>;

    /// 期間内のサマリーレポートをclient、projectの順にグルーピングして取得する。
    async fn read_summary_report(&self, period: &ReportPeriod) -> Result<Vec<SummaryReportItem>>;
}

/// Toggl Reports APIと通信するためのクライアント。
///
/// # Examples
///
/// ```
/// let client = TogglClient::new(&config);
/// let items = client.read_detailed_report(&period).await.unwrap();
/// ```
pub struct TogglClient {
    client: Client,
    api_url: String,
    api_token: String,
    user_agent: String,
    workspace_id: String,
}

impl TogglClient {
    /// 新しい`TogglClient`を返す。
    pub fn new(config: &ApiConfig) -> Self {
        Self::with_api_url(config, REPORTS_API_URL)
    }

    /// 接続先のURLを指定して`TogglClient`を返す。
    pub fn with_api_url(config: &ApiConfig, api_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            user_agent: config.email.clone(),
            workspace_id: config.workspace_id.clone(),
        }
    }

    /// 認証とワークスペース、期間を設定したGETリクエストを作る。
    fn get(&self, endpoint: &str, period: &ReportPeriod) -> RequestBuilder {
        self.client
            .get(format!("{}/{}", self.api_url, endpoint))
            .basic_auth(&self.api_token, Some("api_token"))
            .header(ACCEPT, "application/json")
            .header(ACCEPT_LANGUAGE, "en-gb")
            .query(&[
                ("user_agent", self.user_agent.as_str()),
                ("workspace_id", self.workspace_id.as_str()),
            ])
            .query(&[
                ("since", period.since.to_string()),
                ("until", period.until.to_string()),
            ])
    }

    /// 詳細レポートの1ページを取得する。
    async fn read_detailed_page(
        &self,
        period: &ReportPeriod,
        page: u32,
    ) -> Result<DetailedReportResponse> {
        let response = self
            .get("details", period)
            .query(&[("page", page)])
            .send()
            .await
            .with_context(|| format!("Failed to send request to Toggl API at {}", self.api_url))?
            .error_for_status()
            .context("Request returned an error status")?
            .json::<DetailedReportResponse>()
            .await
            .context("Failed to deserialize response")?;

        Ok(response)
    }
}

impl TogglRepository for TogglClient {
    /// 1ページ目から順に取得し、空または`per_page`に満たないページで終了する。
    async fn read_detailed_report(&self, period: &ReportPeriod) -> Result<Vec<DetailedReportItem>> {
        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let response = self
                .read_detailed_page(period, page)
                .await
                .with_context(|| format!("Failed to read detailed report page {}", page))?;
            debug!(
                "Report page loaded {} total booked time: {}",
                page,
                format_millis(response.total_grand.unwrap_or_default())
            );
            debug!(
                "Pagination details: total_count: {}, per_page: {}",
                response.total_count, response.per_page
            );

            let page_len = response.data.len() as i64;
            items.extend(response.data);
            if page_len == 0 || page_len != response.per_page {
                break;
            }
            page += 1;
        }
        info!("length of detailed report items: {}", items.len());

        Ok(items)
    }

    async fn read_summary_report(&self, period: &ReportPeriod) -> Result<Vec<SummaryReportItem>> {
        let response = self
            .get("summary", period)
            .query(&[
                ("page", "1"),
                ("grouping", "clients"),
                ("subgrouping", "projects"),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to send request to Toggl API at {}", self.api_url))?
            .error_for_status()
            .context("Request returned an error status")?
            .json::<SummaryReportResponse>()
            .await
            .context("Failed to deserialize response")?;
        info!("length of summary report items: {}", response.data.len());

        Ok(response.data)
    }
}
