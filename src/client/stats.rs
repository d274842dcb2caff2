use chrono::Duration;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Deserialize;

use super::ClientError;
use super::EspClient;
use super::KeyScope;

/// The date range a statistics query covers, both endpoints inclusive.
/// Serialized as `from`/`to` query parameters in `YYYY-MM-DD` form (the only
/// date format the stats endpoints accept).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl StatWindow {
    /// The window ending today and reaching `days` back
    pub fn last_days(days: i64) -> Self {
        let to = Utc::now().date_naive();
        Self {
            from: to - Duration::days(days),
            to,
        }
    }

    fn query(&self) -> [(&'static str, String); 2] {
        // NaiveDate's Display is already %Y-%m-%d
        [("from", self.from.to_string()), ("to", self.to.to_string())]
    }
}

/// Event counts, per-day or aggregated over a window. Days with no traffic
/// are returned with counts omitted rather than zeroed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCounts {
    #[serde(default)]
    pub processed: i64,
    #[serde(default)]
    pub delivered: i64,
    #[serde(default)]
    pub dropped: i64,
    #[serde(default)]
    pub hard_bounced: i64,
    #[serde(default)]
    pub soft_bounced: i64,
    #[serde(default)]
    pub opened: i64,
    #[serde(default)]
    pub clicked: i64,
    #[serde(default)]
    pub unsubscribed: i64,
    #[serde(default)]
    pub spam: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStat {
    /// `YYYY-MM-DD`; kept as text, we only ever print it
    pub date: String,
    #[serde(default)]
    pub stats: Option<StatCounts>,
}

impl EspClient {
    /// Per-day counts for one sub-account
    #[tracing::instrument(skip(self))]
    pub async fn sub_account_stats(
        &self,
        sub_account_id: i64,
        window: StatWindow,
    ) -> Result<Vec<DayStat>, ClientError> {
        let request = self
            .request(
                reqwest::Method::GET,
                &format!("/account/subaccount/stat/{sub_account_id}"),
                KeyScope::Account,
            )
            .query(&window.query());
        self.execute(request).await
    }

    /// One set of counts summed over the whole window
    #[tracing::instrument(skip(self))]
    pub async fn sub_account_aggregate_stats(
        &self,
        sub_account_id: i64,
        window: StatWindow,
    ) -> Result<StatCounts, ClientError> {
        let request = self
            .request(
                reqwest::Method::GET,
                &format!("/account/subaccount/stat/{sub_account_id}/aggregate"),
                KeyScope::Account,
            )
            .query(&window.query());
        self.execute(request).await
    }

    /// Per-day counts across every sub-account
    #[tracing::instrument(skip(self))]
    pub async fn account_stats(
        &self,
        window: StatWindow,
    ) -> Result<Vec<DayStat>, ClientError> {
        let request = self
            .request(reqwest::Method::GET, "/account/stats", KeyScope::Account)
            .query(&window.query());
        self.execute(request).await
    }
}
