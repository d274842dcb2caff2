use serde::Deserialize;

use super::ClientError;
use super::EspClient;
use super::KeyScope;

/// A public sending address allocated to the account
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendingIp {
    pub id: i64,
    pub public_ip: String,

    /// PTR hostname, when reverse DNS has been configured
    #[serde(default)]
    pub reverse_dns_hostname: Option<String>,

    /// Unix seconds
    #[serde(default)]
    pub created: Option<i64>,
}

impl EspClient {
    #[tracing::instrument(skip(self))]
    pub async fn list_ips(&self) -> Result<Vec<SendingIp>, ClientError> {
        let request = self.request(reqwest::Method::GET, "/account/ips", KeyScope::Account);
        self.execute(request).await
    }
}
