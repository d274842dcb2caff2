use serde::Deserialize;
use serde::Serialize;

use super::ClientError;
use super::EspClient;
use super::KeyScope;

/// How the service picks an outbound IP from the pool per message. The wire
/// format is a bare integer, so the enum converts through `i64` instead of
/// serializing its variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum RoutingStrategy {
    /// Rotate through the pool's IPs in order
    RoundRobin,
    /// Pin recipient mailbox providers to specific IPs
    EmailProvider,
}

impl From<RoutingStrategy> for i64 {
    fn from(strategy: RoutingStrategy) -> Self {
        match strategy {
            RoutingStrategy::RoundRobin => 0,
            RoutingStrategy::EmailProvider => 1,
        }
    }
}

impl TryFrom<i64> for RoutingStrategy {
    type Error = String;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::RoundRobin),
            1 => Ok(Self::EmailProvider),
            e => Err(format!("Invalid routing strategy: {e}")),
        }
    }
}

impl std::fmt::Display for RoutingStrategy {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RoutingStrategy::RoundRobin => "Round Robin",
                RoutingStrategy::EmailProvider => "Email Provider",
            }
        )?;
        Ok(())
    }
}

/// Membership is declared by address, not by ip id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolIp {
    pub public_ip: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIpPoolRequest {
    pub name: String,
    pub routing_strategy: RoutingStrategy,
    pub ips: Vec<PoolIp>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpPool {
    pub id: i64,
    pub name: String,
    pub routing_strategy: RoutingStrategy,
    #[serde(default)]
    pub ips: Vec<PoolIp>,
}

impl EspClient {
    #[tracing::instrument(skip(self, body), fields(name = %body.name))]
    pub async fn create_ip_pool(
        &self,
        body: &CreateIpPoolRequest,
    ) -> Result<IpPool, ClientError> {
        let request = self
            .request(reqwest::Method::POST, "/account/ippools", KeyScope::Account)
            .json(body);
        self.execute(request).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_ip_pools(&self) -> Result<Vec<IpPool>, ClientError> {
        let request = self.request(reqwest::Method::GET, "/account/ippools", KeyScope::Account);
        self.execute(request).await
    }
}
