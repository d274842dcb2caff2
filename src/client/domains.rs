use serde::Deserialize;
use serde::Serialize;

use super::ClientError;
use super::EspClient;
use super::KeyScope;

#[derive(Debug, Serialize)]
pub struct CreateDomainRequest {
    pub name: String,
}

/// A sending domain owned by the sub-account. `verified` flips remotely once
/// the DKIM record has propagated through DNS; the workflow never polls for
/// it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendingDomain {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub dkim: Option<DkimRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DkimRecord {
    /// The TXT record value to publish under the DKIM selector
    pub text_value: String,
}

impl EspClient {
    #[tracing::instrument(skip(self, body), fields(domain = %body.name))]
    pub async fn add_domain(
        &self,
        body: &CreateDomainRequest,
    ) -> Result<SendingDomain, ClientError> {
        let request = self
            .request(
                reqwest::Method::POST,
                "/subaccount/domain",
                KeyScope::SubAccount,
            )
            .json(body);
        self.execute(request).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_domains(&self) -> Result<Vec<SendingDomain>, ClientError> {
        let request = self.request(
            reqwest::Method::GET,
            "/subaccount/domains",
            KeyScope::SubAccount,
        );
        self.execute(request).await
    }
}
