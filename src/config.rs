use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Log file used when `ADDRESSBOOK_LOG_FILE` is not set.
pub const DEFAULT_LOG_FILE: &str = "logs/addressbook.log";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the address book server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP listener binds to.
    pub server_host: IpAddr,
    /// Optional fixed port; when absent the server probes a small range.
    pub server_port: Option<u16>,
    /// Optional public base URL used for `href` and `Location` values.
    pub base_url: Option<String>,
    /// Optional JSON document used to pre-populate the book.
    pub seed_file: Option<PathBuf>,
    /// File receiving a copy of the log output.
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: IpAddr::from([0, 0, 0, 0]),
            server_port: None,
            base_url: None,
            seed_file: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            server_host: load_env_optional("SERVER_HOST")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_HOST".into()))
                })
                .transpose()?
                .unwrap_or(defaults.server_host),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
            base_url: load_env_optional("ADDRESSBOOK_BASE_URL")
                .map(|value| validate_base_url(&value))
                .transpose()?,
            seed_file: load_env_optional("ADDRESSBOOK_SEED_FILE").map(PathBuf::from),
            log_file: load_env_optional("ADDRESSBOOK_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
        })
    }

    /// Public base URL for a listener bound on `port`.
    pub fn public_base_url(&self, port: u16) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{port}"),
        }
    }
}

/// Accept only absolute `http`/`https` locators.
pub fn validate_base_url(value: &str) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    let has_scheme = trimmed.starts_with("http://") || trimmed.starts_with("https://");
    let host = trimmed.split_once("://").map(|(_, rest)| rest).unwrap_or("");
    if !has_scheme || host.is_empty() {
        return Err(ConfigError::InvalidValue("ADDRESSBOOK_BASE_URL".into()));
    }
    Ok(trimmed.to_string())
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load configuration from the environment and install it in the global cache.
///
/// `overrides` is applied on top of the environment before the value is frozen.
pub fn init_config(overrides: impl FnOnce(&mut Config)) -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let mut config = Config::from_env()?;
    overrides(&mut config);
    Ok(CONFIG.get_or_init(|| config))
}
