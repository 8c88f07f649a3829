use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default API base URL
const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";

/// Default per-request timeout
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable name for API URL override
const ENV_API_URL: &str = "CHECKLIST_API_URL";

/// Environment variable name for request timeout override (seconds)
const ENV_API_TIMEOUT: &str = "CHECKLIST_API_TIMEOUT_SECS";

/// Configuration file structure
#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    api: Option<ApiSection>,
}

#[derive(Debug, Deserialize, Default)]
struct ApiSection {
    /// API base URL including the version prefix (e.g., "https://checks.example.com/api/v1")
    base_url: Option<String>,
    /// Per-request timeout in seconds
    timeout_secs: Option<u64>,
}

/// Runtime endpoint configuration
#[derive(Debug, Clone)]
pub struct ApiEndpointConfig {
    /// Base URL for API calls (e.g., "http://localhost:3000/api/v1")
    pub base_url: String,
    /// Upper bound for a single request, connect through body
    pub timeout: Duration,
    /// Source of the base URL (for logging)
    pub source: ConfigSource,
}

impl ApiEndpointConfig {
    /// Configuration pinned to an explicit base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_url(&base_url.into()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            source: ConfigSource::Explicit,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ApiEndpointConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            source: ConfigSource::Default,
        }
    }
}

/// Where the configuration came from
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Using default hardcoded values
    Default,
    /// Loaded from environment variable
    Environment,
    /// Loaded from config file
    ConfigFile,
    /// Supplied directly by the caller (e.g. a command-line flag)
    Explicit,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::ConfigFile => write!(f, "config file"),
            ConfigSource::Explicit => write!(f, "command line"),
        }
    }
}

fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// Get the path to the configuration file
fn get_config_file_path() -> Option<PathBuf> {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .map(|p| p.join("checklist").join("config.toml"))
}

fn parse_config(content: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(content)
}

/// Load configuration from the config file
fn load_config_file() -> Option<ConfigFile> {
    let path = get_config_file_path()?;

    if !path.exists() {
        return None;
    }

    match fs::read_to_string(&path) {
        Ok(content) => match parse_config(&content) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                Some(config)
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {:?}: {}", path, e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Failed to read config file {:?}: {}", path, e);
            None
        }
    }
}

fn resolve(
    env_url: Option<String>,
    env_timeout: Option<String>,
    file: Option<ConfigFile>,
) -> ApiEndpointConfig {
    let section = file.and_then(|f| f.api).unwrap_or_default();

    let timeout_secs = env_timeout
        .and_then(|raw| match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Some(secs),
            _ => {
                tracing::warn!("Ignoring invalid {}={:?}", ENV_API_TIMEOUT, raw);
                None
            }
        })
        .or(section.timeout_secs.filter(|secs| *secs > 0))
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let timeout = Duration::from_secs(timeout_secs);

    // Priority 1: Environment variable
    if let Some(url) = env_url.map(|u| normalize_url(&u)).filter(|u| !u.is_empty()) {
        tracing::info!("Using API URL from environment variable: {}", url);
        return ApiEndpointConfig {
            base_url: url,
            timeout,
            source: ConfigSource::Environment,
        };
    }

    // Priority 2: Config file
    if let Some(url) = section
        .base_url
        .map(|u| normalize_url(&u))
        .filter(|u| !u.is_empty())
    {
        tracing::info!("Using API URL from config file: {}", url);
        return ApiEndpointConfig {
            base_url: url,
            timeout,
            source: ConfigSource::ConfigFile,
        };
    }

    // Priority 3: Default values
    tracing::debug!("Using default API URL: {}", DEFAULT_API_URL);
    ApiEndpointConfig {
        timeout,
        ..ApiEndpointConfig::default()
    }
}

/// Load endpoint configuration with priority:
/// 1. Environment variable (CHECKLIST_API_URL, CHECKLIST_API_TIMEOUT_SECS)
/// 2. Config file (~/.config/checklist/config.toml)
/// 3. Default values
pub fn load_api_config() -> ApiEndpointConfig {
    resolve(
        std::env::var(ENV_API_URL).ok(),
        std::env::var(ENV_API_TIMEOUT).ok(),
        load_config_file(),
    )
}

/// Get the path to the config file for documentation purposes
pub fn get_config_file_path_string() -> String {
    get_config_file_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "~/.config/checklist/config.toml".to_string())
}

/// Generate example config file content
pub fn generate_example_config() -> String {
    r#"# Checklist Configuration
# Place this file at: ~/.config/checklist/config.toml

[api]
# API base URL, including the version prefix
# Default: http://localhost:3000/api/v1
# base_url = "https://checks.example.com/api/v1"

# Per-request timeout in seconds (default: 30)
# timeout_secs = 30
"#
    .to_string()
}
