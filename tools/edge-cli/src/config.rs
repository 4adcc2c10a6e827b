//! CLI configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use edge_api::{DEFAULT_FUNCTIONS_URL, DEFAULT_SERVICES_URL, DEFAULT_TIMEOUT_SECS};

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["edge.toml", ".edge.toml", "edge.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// API endpoints and transport settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Credentials.
    #[serde(default)]
    pub auth: AuthConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::parse(path, &content)
    }

    /// Parse config text, choosing the format from the file extension.
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        if path.ends_with(".json") {
            serde_json::from_str(content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }
}

/// API endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the edge functions API.
    #[serde(default = "default_functions_url")]
    pub functions_url: String,

    /// Base URL of the edge services API.
    #[serde(default = "default_services_url")]
    pub services_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_functions_url() -> String {
    DEFAULT_FUNCTIONS_URL.to_string()
}

fn default_services_url() -> String {
    DEFAULT_SERVICES_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            functions_url: default_functions_url(),
            services_url: default_services_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Personal API token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Generate a default edge.toml config file.
pub fn generate_default_config() -> String {
    format!(
        r#"# Edge CLI configuration

[api]
functions_url = "{functions_url}"
services_url = "{services_url}"
timeout_secs = {timeout}

[auth]
# token = "<personal token>"
"#,
        functions_url = DEFAULT_FUNCTIONS_URL,
        services_url = DEFAULT_SERVICES_URL,
        timeout = DEFAULT_TIMEOUT_SECS,
    )
}
