use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info};
use validator::{Validate, ValidationError};

/// Default values for configuration
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_ENV: &str = "development";
const CONFIG_DIR: &str = "config";
const ENV_PREFIX: &str = "PAPERSTOCK";
const DEVELOPMENT_API_BASE_URL: &str = "http://localhost:9090/api";
const PRODUCTION_API_BASE_URL: &str = "https://api.example.com/api";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;
const DEFAULT_LOGIN_REDIRECT_DELAY_MS: u64 = 1500;
const SESSION_DIR_NAME: &str = ".paperstock";
const SESSION_FILE_NAME: &str = "session.json";

/// Console configuration structure with validation
#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Deployment profile: "development" or "production"
    #[serde(default = "default_environment")]
    #[validate(custom = "validate_environment")]
    pub environment: String,

    /// Backend base URL; derived from `environment` when unset
    #[serde(default)]
    #[validate(custom = "validate_base_url")]
    pub api_base_url: Option<String>,

    /// Per-request timeout in seconds (1-300)
    #[serde(default = "default_request_timeout_secs")]
    #[validate(range(min = 1, max = 300))]
    pub request_timeout_secs: u64,

    /// Quiet period before a search-as-you-type query is sent
    #[serde(default = "default_search_debounce_ms")]
    #[validate(range(max = 5000))]
    pub search_debounce_ms: u64,

    /// Pause between a successful login and the dashboard redirect
    #[serde(default = "default_login_redirect_delay_ms")]
    #[validate(range(max = 10000))]
    pub login_redirect_delay_ms: u64,

    /// Where the session token and user info are persisted
    #[serde(default)]
    pub session_file: Option<PathBuf>,

    /// Logging level
    #[serde(default = "default_log_level")]
    #[validate(custom = "validate_log_level")]
    pub log_level: String,

    /// Log in JSON format (structured logging)
    #[serde(default)]
    pub log_json: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            api_base_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            search_debounce_ms: default_search_debounce_ms(),
            login_redirect_delay_ms: default_login_redirect_delay_ms(),
            session_file: None,
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

impl ConsoleConfig {
    /// Configuration pointing at an explicit backend, used by embedders and tests.
    pub fn for_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: Some(base_url.into()),
            ..Self::default()
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    /// Effective backend base URL without a trailing slash.
    pub fn api_base_url(&self) -> String {
        let url = match self.api_base_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.trim(),
            _ if self.is_production() => PRODUCTION_API_BASE_URL,
            _ => DEVELOPMENT_API_BASE_URL,
        };
        url.trim_end_matches('/').to_string()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn login_redirect_delay(&self) -> Duration {
        Duration::from_millis(self.login_redirect_delay_ms)
    }

    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Resolves the session file: explicit setting, then `$PAPERSTOCK_HOME`, then `$HOME/.paperstock`.
    pub fn session_file_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.session_file {
            return Some(path.clone());
        }

        if let Ok(dir) = env::var("PAPERSTOCK_HOME") {
            let mut path = PathBuf::from(dir);
            path.push(SESSION_FILE_NAME);
            return Some(path);
        }

        env::var("HOME").ok().map(|home| {
            let mut path = PathBuf::from(home);
            path.push(SESSION_DIR_NAME);
            path.push(SESSION_FILE_NAME);
            path
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("Configuration loading failed: {0}")]
    Load(#[from] ConfigError),

    #[error("Configuration validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Default value functions
fn default_environment() -> String {
    DEFAULT_ENV.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_search_debounce_ms() -> u64 {
    DEFAULT_SEARCH_DEBOUNCE_MS
}

fn default_login_redirect_delay_ms() -> u64 {
    DEFAULT_LOGIN_REDIRECT_DELAY_MS
}

fn validate_environment(environment: &str) -> Result<(), ValidationError> {
    match environment.to_ascii_lowercase().as_str() {
        "development" | "production" | "test" => Ok(()),
        _ => Err(ValidationError::new("invalid_environment")),
    }
}

fn validate_base_url(url: &str) -> Result<(), ValidationError> {
    match url::Url::parse(url.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(ValidationError::new("invalid_base_url")),
    }
}

fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level.to_ascii_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new("invalid_log_level")),
    }
}

/// Initializes tracing using the provided log level as the default filter.
///
/// Output goes to stderr so command results on stdout stay machine readable.
pub fn init_tracing(level: &str, json: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_directive = format!("paperstock={}", level);
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    if json {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .with_writer(std::io::stderr)
            .json()
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(EnvFilter::new(filter_directive))
            .with_writer(std::io::stderr)
            .try_init();
    }
}

/// Loads console configuration from `./config` and the environment.
pub fn load_config() -> Result<ConsoleConfig, ConfigLoadError> {
    load_config_from(Path::new(CONFIG_DIR))
}

/// Loads console configuration
///
/// Layers configuration sources in this order:
/// 1. Built-in defaults
/// 2. `{dir}/default.toml`
/// 3. `{dir}/{env}.toml`, env taken from RUN_ENV or APP_ENV
/// 4. Environment variables (PAPERSTOCK__*)
pub fn load_config_from(dir: &Path) -> Result<ConsoleConfig, ConfigLoadError> {
    let run_env = env::var("RUN_ENV")
        .or_else(|_| env::var("APP_ENV"))
        .unwrap_or_else(|_| DEFAULT_ENV.to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !dir.exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            dir.display()
        );
    }

    let config = Config::builder()
        .set_default("environment", run_env.clone())?
        .add_source(File::from(dir.join("default")).required(false))
        .add_source(File::from(dir.join(&run_env)).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let console_config: ConsoleConfig = config.try_deserialize()?;

    console_config.validate().map_err(|e| {
        error!("Configuration validation failed: {:?}", e);
        ConfigLoadError::Validation(e)
    })?;

    info!("Configuration loaded successfully");
    Ok(console_config)
}
