use serde::Deserialize;
use serde::Serialize;

use super::ClientError;
use super::EspClient;
use super::KeyScope;

/// One boolean per event class the remote service can call back for. The
/// flags mirror the event taxonomy used by the statistics endpoints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhookRequest {
    pub url: String,
    pub enabled: bool,
    pub processed: bool,
    pub delivered: bool,
    pub dropped: bool,
    pub soft_bounced: bool,
    pub hard_bounced: bool,
    pub opened: bool,
    pub clicked: bool,
    pub unsubscribed: bool,
    pub spam: bool,
}

impl CreateWebhookRequest {
    /// Subscribe `url` to every event class
    pub fn all_events(url: String) -> Self {
        Self {
            url,
            enabled: true,
            processed: true,
            delivered: true,
            dropped: true,
            soft_bounced: true,
            hard_bounced: true,
            opened: true,
            clicked: true,
            unsubscribed: true,
            spam: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub id: i64,
    pub url: String,
    #[serde(default)]
    pub enabled: bool,
}

impl EspClient {
    #[tracing::instrument(skip(self, body), fields(url = %body.url))]
    pub async fn create_webhook(
        &self,
        body: &CreateWebhookRequest,
    ) -> Result<Webhook, ClientError> {
        let request = self
            .request(
                reqwest::Method::POST,
                "/account/webhooks",
                KeyScope::Account,
            )
            .json(body);
        self.execute(request).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_webhooks(&self) -> Result<Vec<Webhook>, ClientError> {
        let request = self.request(reqwest::Method::GET, "/account/webhooks", KeyScope::Account);
        self.execute(request).await
    }
}
