use serde::Deserialize;

use super::email::Address;
use super::ClientError;
use super::EspClient;
use super::KeyScope;

/// Read-only snapshot of a submitted message, keyed by the id returned in the
/// send acknowledgement. Everything here is filled in remotely; most fields
/// only appear once the first delivery attempt has been routed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub message_id: String,

    #[serde(default)]
    pub account_id: Option<i64>,
    #[serde(default)]
    pub sub_account_id: Option<i64>,

    /// Which sending IP the message was routed over
    #[serde(default)]
    pub ip_id: Option<i64>,
    #[serde(default)]
    pub public_ip: Option<String>,
    #[serde(default)]
    pub local_ip: Option<String>,
    #[serde(default)]
    pub ip_pool: Option<String>,

    /// "transactional" / "marketing"
    #[serde(default)]
    pub email_type: Option<String>,

    /// Unix seconds
    #[serde(default)]
    pub submitted_at: Option<i64>,

    #[serde(default)]
    pub from: Option<Address>,
    #[serde(default)]
    pub to: Option<Address>,
    #[serde(default)]
    pub subject: Option<String>,

    /// Delivery attempts so far
    #[serde(default)]
    pub attempt: Option<i64>,
}

impl EspClient {
    #[tracing::instrument(skip(self))]
    pub async fn get_message(
        &self,
        message_id: &str,
    ) -> Result<Message, ClientError> {
        let request = self.request(
            reqwest::Method::GET,
            &format!("/account/message/{message_id}"),
            KeyScope::Account,
        );
        self.execute(request).await
    }
}
