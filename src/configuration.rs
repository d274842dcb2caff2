use std::env;
use std::env::current_dir;
use std::fmt::Display;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::client::EspClient;

/// Global configuration, loaded from the `configuration` directory. See
/// `get_configuration`.
#[derive(Deserialize, Clone)]
pub struct Settings {
    pub esp: EspSettings,
}

/// Remote API configuration: where the provider lives, and the two keys we
/// sign requests with.
#[derive(Deserialize, Clone)]
pub struct EspSettings {
    /// e.g. `https://api.sendpost.io/api/v1`. Overridden with a mock server
    /// uri in tests.
    pub base_url: String,

    /// Parent-account key, for account-scoped resources (sub-accounts,
    /// webhooks, ips, pools, message lookup, account stats)
    pub account_api_key: Secret<String>,

    /// Tenant key, for sub-account-scoped resources (domains, sending,
    /// sub-account stats). Replaced at runtime once a sub-account is created
    /// or adopted.
    pub sub_account_api_key: Secret<String>,

    /// Total per-request timeout. Env vars are always parsed as String, so
    /// `serde-aux` is needed here.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EspSettings {
    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_milliseconds) }

    /// Build the one `EspClient` used for the whole run; establishing a HTTP
    /// connection is expensive, so the inner `reqwest::Client` is shared
    /// across all calls.
    pub fn client(self) -> EspClient {
        let timeout = self.timeout();
        EspClient::new(
            self.base_url,
            self.account_api_key,
            self.sub_account_api_key,
            timeout,
        )
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Display for Environment {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Environment::Local => "local",
                Environment::Production => "production",
            }
        )?;
        Ok(())
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            e => Err(format!("Invalid: {e}")),
        }
    }
}

/// Load yaml configuration files at `<project_root>/configuration`.
///
/// All fields must be present in these files, otherwise initialisation fails
/// immediately and the workflow does not start. The checked-in yaml carries
/// placeholder API keys; real keys are supplied as env vars:
///
/// ```sh
///     APP_ESP__ACCOUNT_API_KEY=... APP_ESP__SUB_ACCOUNT_API_KEY=... espflow
/// ```
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let cfg_dir = current_dir()
        .expect("could not get current dir")
        .join("configuration");

    let env: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or("local".to_string())
        .try_into()
        .expect("could not initiate Environment struct");

    let settings = Config::builder()
        .add_source(config::File::from(cfg_dir.join("base.yaml")))
        .add_source(config::File::from(cfg_dir.join(format!("{env}.yaml"))))
        .add_source(
            // env vars can be (re)loaded at runtime, avoiding recompilation. note:
            // `APP_ESP__BASE_URL=...` -> `Settings.esp.base_url`
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
