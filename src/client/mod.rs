//! Typed client for the provider's HTTP API, one submodule per resource
//! group. All calls go through `EspClient`, which signs each request with one
//! of two keys depending on the resource being addressed.

mod domains;
mod email;
mod ip_pools;
mod ips;
mod messages;
mod stats;
mod subaccounts;
mod webhooks;

use std::fmt::Debug;
use std::time::Duration;

use reqwest::Client;
use reqwest::Method;
use reqwest::RequestBuilder;
use reqwest::StatusCode;
use secrecy::ExposeSecret;
use secrecy::Secret;
use serde::de::DeserializeOwned;

pub use domains::CreateDomainRequest;
pub use domains::DkimRecord;
pub use domains::SendingDomain;
pub use email::Address;
pub use email::EmailAck;
pub use email::EmailMessage;
pub use email::Recipient;
pub use ip_pools::CreateIpPoolRequest;
pub use ip_pools::IpPool;
pub use ip_pools::PoolIp;
pub use ip_pools::RoutingStrategy;
pub use ips::SendingIp;
pub use messages::Message;
pub use stats::DayStat;
pub use stats::StatCounts;
pub use stats::StatWindow;
pub use subaccounts::AccountType;
pub use subaccounts::CreateSubAccountRequest;
pub use subaccounts::SubAccount;
pub use webhooks::CreateWebhookRequest;
pub use webhooks::Webhook;

/// Which of the two credentials a request is signed with. Selection is purely
/// a function of the resource being addressed, so every operation picks its
/// scope at the callsite rather than relying on ambient configuration; this
/// keeps the workflow composable and testable against a mock transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope {
    /// Parent account: sub-accounts, webhooks, ips, pools, message lookup,
    /// account-level stats
    Account,
    /// Tenant: domains, sending, sub-account stats
    SubAccount,
}

impl KeyScope {
    /// Header the key travels in
    fn header_name(self) -> &'static str {
        match self {
            KeyScope::Account => "X-Account-ApiKey",
            KeyScope::SubAccount => "X-SubAccount-ApiKey",
        }
    }
}

/// The two error kinds every call can produce: the service rejected the
/// request (we keep the status code and whatever body it returned), or the
/// request never completed (dns, connect, timeout, malformed response body).
#[derive(thiserror::Error)]
pub enum ClientError {
    #[error("API request rejected with HTTP {status}")]
    Api { status: StatusCode, body: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl Debug for ClientError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        error_chain_fmt(self, f)?;
        Ok(())
    }
}

/// Walk and print the full error chain, not just the outermost message
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{e}\n")?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{cause}")?;
        current = cause.source();
    }
    Ok(())
}

pub struct EspClient {
    http_client: Client,
    base_url: String,
    account_api_key: Secret<String>,
    sub_account_api_key: Secret<String>,
}

impl EspClient {
    /// `timeout` bounds the whole request (connect + response); the remote
    /// service gives no SLA, and a hung call would otherwise stall every
    /// later step.
    pub fn new(
        base_url: String,
        account_api_key: Secret<String>,
        sub_account_api_key: Secret<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            http_client: Client::builder().timeout(timeout).build().unwrap(),
            base_url,
            account_api_key,
            sub_account_api_key,
        }
    }

    /// Swap in a key obtained at runtime (a created or adopted sub-account).
    /// All subsequent sub-account-scoped calls are signed with it.
    pub fn set_sub_account_key(
        &mut self,
        key: Secret<String>,
    ) {
        self.sub_account_api_key = key;
    }

    /// All requests start here, so that key selection cannot be forgotten at
    /// an individual callsite
    fn request(
        &self,
        method: Method,
        path: &str,
        scope: KeyScope,
    ) -> RequestBuilder {
        let key = match scope {
            KeyScope::Account => &self.account_api_key,
            KeyScope::SubAccount => &self.sub_account_api_key,
        };
        // a key with bytes invalid in a header surfaces as a builder error on
        // `send`, i.e. on the Transport path
        self.http_client
            .request(method, format!("{}{}", self.base_url, path))
            .header(scope.header_name(), key.expose_secret())
    }

    /// Send, split non-2xx into `Api` (with the body preserved for
    /// diagnostics), deserialize the rest
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            // the body is kept as raw text; error payloads are not guaranteed
            // to be json
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api { status, body });
        }
        Ok(response.json::<T>().await?)
    }
}
