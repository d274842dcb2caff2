use serde::Deserialize;
use serde::Serialize;

use super::ClientError;
use super::EspClient;
use super::KeyScope;

#[derive(Debug, Serialize)]
pub struct CreateSubAccountRequest {
    pub name: String,
}

/// A tenant-scoped credential/namespace under the parent account. The key
/// returned on creation is what all of the tenant's domain/sending/stat calls
/// are signed with.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccount {
    pub id: i64,
    pub name: String,
    pub api_key: String,

    /// 0 = regular, 1 = plus; see `account_type`
    #[serde(rename = "type", default)]
    pub type_: i64,

    #[serde(default)]
    pub blocked: bool,

    /// Unix seconds
    #[serde(default)]
    pub created: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountType {
    Regular,
    Plus,
}

impl std::fmt::Display for AccountType {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                AccountType::Regular => "Regular",
                AccountType::Plus => "Plus",
            }
        )?;
        Ok(())
    }
}

impl SubAccount {
    /// Anything the service doesn't recognise as plus is treated as regular
    pub fn account_type(&self) -> AccountType {
        match self.type_ {
            1 => AccountType::Plus,
            _ => AccountType::Regular,
        }
    }
}

impl EspClient {
    #[tracing::instrument(skip(self))]
    pub async fn list_sub_accounts(&self) -> Result<Vec<SubAccount>, ClientError> {
        let request = self.request(
            reqwest::Method::GET,
            "/account/subaccounts",
            KeyScope::Account,
        );
        self.execute(request).await
    }

    #[tracing::instrument(skip(self, body), fields(name = %body.name))]
    pub async fn create_sub_account(
        &self,
        body: &CreateSubAccountRequest,
    ) -> Result<SubAccount, ClientError> {
        let request = self
            .request(
                reqwest::Method::POST,
                "/account/subaccounts",
                KeyScope::Account,
            )
            .json(body);
        self.execute(request).await
    }
}
