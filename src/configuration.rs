use std::env;
use std::env::current_dir;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use config::Config;
use config::ConfigError;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::MailAddress;
use crate::email_client::ApiMailer;
use crate::email_client::MailTransport;
use crate::email_client::SmtpMailer;
use crate::relay::ContactRelay;

/// Global configuration, loaded from `configuration/*.yaml` and `APP_*` env
/// vars. See `get_configuration`.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub mail: MailSettings,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    /// Should be localhost on dev machine, 0.0.0.0 on prod
    pub host: String,

    /// 0 binds a random free port (used by the test suite)
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,

    /// Origins allowed to call the API from a browser; the portfolio frontend
    /// is usually served from a different origin than this API. Empty allows
    /// any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Where contact messages go, and how they get there
#[derive(Debug, Deserialize, Clone)]
pub struct MailSettings {
    /// Fixed `From` address. Providers generally refuse to send on behalf of
    /// arbitrary addresses, so the visitor's address only goes in `Reply-To`.
    pub sender: String,
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
    /// The site owner
    pub recipient: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
    pub transport: TransportSettings,
}

fn default_sender_name() -> String { "Portfolio Contact".to_string() }

/// Selected with `kind`, e.g. `APP_MAIL__TRANSPORT__KIND=api`
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TransportSettings {
    Smtp(SmtpSettings),
    Api(ApiSettings),
}

#[derive(Debug, Deserialize, Clone)]
pub struct SmtpSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub tls: SmtpTls,
    /// Leave empty for servers that accept unauthenticated submission
    #[serde(default)]
    pub username: String,
    #[serde(default = "empty_secret")]
    pub password: Secret<String>,
}

fn empty_secret() -> Secret<String> { Secret::new(String::new()) }

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SmtpTls {
    /// Plaintext; only for local mail catchers
    None,
    /// Upgrade a plaintext connection, usually port 587
    Starttls,
    /// TLS from the first byte, usually port 465
    Tls,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub authorization_token: Secret<String>,
}

impl MailSettings {
    pub fn sender(&self) -> Result<MailAddress, String> { MailAddress::parse(self.sender.clone()) }

    pub fn recipient(&self) -> Result<MailAddress, String> {
        MailAddress::parse(self.recipient.clone())
    }

    pub fn timeout(&self) -> Duration { Duration::from_millis(self.timeout_milliseconds) }

    /// Build the configured transport. Nothing is sent, and no connection is
    /// opened.
    pub fn transport(&self) -> Result<Arc<dyn MailTransport>, anyhow::Error> {
        let transport: Arc<dyn MailTransport> = match &self.transport {
            TransportSettings::Smtp(smtp) => Arc::new(SmtpMailer::new(smtp, self.timeout())?),
            TransportSettings::Api(api) => Arc::new(ApiMailer::new(
                api.base_url.clone(),
                api.authorization_token.clone(),
                self.timeout(),
            )?),
        };
        Ok(transport)
    }

    pub fn relay(&self) -> Result<ContactRelay, anyhow::Error> {
        let sender = self.sender().map_err(anyhow::Error::msg)?;
        let recipient = self.recipient().map_err(anyhow::Error::msg)?;
        Ok(ContactRelay::new(
            self.transport()?,
            sender,
            self.sender_name.clone(),
            recipient,
        ))
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
        )
    }
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            e => Err(format!("Invalid environment: {e}")),
        }
    }
}

/// Load yaml configuration files at `<project_root>/configuration`:
/// `base.yaml`, then `{APP_ENVIRONMENT}.yaml` (default `local`), then env vars.
///
/// Env vars are always strings, hence `serde-aux` on numeric fields:
///
/// `APP_APPLICATION__PORT=5001` -> `Settings.application.port`
/// `APP_MAIL__TRANSPORT__PASSWORD=...` -> SMTP password
///
/// Credentials belong in env vars, never in the committed yaml files.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let cfg_dir = current_dir()
        .map_err(|e| ConfigError::Message(format!("could not get current dir: {e}")))?
        .join("configuration");

    let env: Environment = env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".to_string())
        .try_into()
        .map_err(ConfigError::Message)?;

    let settings = Config::builder()
        .add_source(config::File::from(cfg_dir.join("base.yaml")))
        .add_source(config::File::from(cfg_dir.join(format!("{env}.yaml"))))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
