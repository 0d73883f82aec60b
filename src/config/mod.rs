//! Configuration module

use std::fmt;

use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub instant_on: InstantOnConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Clone, Deserialize)]
pub struct InstantOnConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub site_id: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_sso_url")]
    pub sso_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

// Keep credentials out of logs
impl fmt::Debug for InstantOnConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstantOnConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("site_id", &self.site_id)
            .field("api_base_url", &self.api_base_url)
            .field("sso_url", &self.sso_url)
            .field("api_version", &self.api_version)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl InstantOnConfig {
    pub fn new(username: &str, password: &str, site_id: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            site_id: site_id.to_string(),
            api_base_url: default_api_base_url(),
            sso_url: default_sso_url(),
            api_version: default_api_version(),
            request_timeout_secs: default_request_timeout(),
        }
    }

    /// Reject missing or blank credentials and site id
    pub fn validate(&self) -> Result<(), AppError> {
        let required = [
            ("instant_on.username", &self.username),
            ("instant_on.password", &self.password),
            ("instant_on.site_id", &self.site_id),
        ];

        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::ConfigError(format!("{} is required", key)));
            }
        }

        url::Url::parse(&self.api_base_url).map_err(|e| {
            AppError::ConfigError(format!("instant_on.api_base_url is invalid: {}", e))
        })?;
        url::Url::parse(&self.sso_url).map_err(|e| {
            AppError::ConfigError(format!("instant_on.sso_url is invalid: {}", e))
        })?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScannerConfig {
    #[serde(default = "default_min_update_interval")]
    pub min_update_interval_secs: u64,
    #[serde(default = "default_scan_interval")]
    pub scan_interval_secs: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            min_update_interval_secs: default_min_update_interval(),
            scan_interval_secs: default_scan_interval(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://nb.portal.arubainstanton.com/api".to_string()
}

fn default_sso_url() -> String {
    "https://sso.arubainstanton.com".to_string()
}

fn default_api_version() -> String {
    "7".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_min_update_interval() -> u64 {
    30
}

fn default_scan_interval() -> u64 {
    12
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8099
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("INSTANT_ON_PRESENCE").separator("__"))
            .build()?;

        Self::from_settings(settings)
    }

    fn from_settings(settings: config::Config) -> anyhow::Result<Self> {
        let config: Config = settings.try_deserialize()?;
        config.instant_on.validate()?;

        if config.scanner.scan_interval_secs == 0 {
            return Err(AppError::ConfigError(
                "scanner.scan_interval_secs must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(config)
    }
}
