//! Endpoint configuration from TOML (`[endpoint]` section)

use serde::{Deserialize, Serialize};

/// Raw endpoint configuration from TOML
///
/// Secrets are never stored in the file: `auth_token_env` and `api_key_env`
/// name the environment variables the transport reads them from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEndpointConfig {
    /// Chat endpoint URL (receives the POST)
    pub url: String,
    /// Environment variable holding the bearer token
    pub auth_token_env: Option<String>,
    /// Environment variable holding the `apikey` header value
    pub api_key_env: Option<String>,
    /// TCP connect timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for FileEndpointConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321/functions/v1/campaign-chat".to_string(),
            auth_token_env: Some("CAMPAIGN_CHAT_TOKEN".to_string()),
            api_key_env: Some("CAMPAIGN_CHAT_API_KEY".to_string()),
            connect_timeout_secs: 10,
        }
    }
}

impl FileEndpointConfig {
    /// Bearer token, if the configured variable is set and non-empty.
    pub fn auth_token(&self) -> Option<String> {
        read_env(self.auth_token_env.as_deref())
    }

    /// `apikey` header value, if the configured variable is set and non-empty.
    pub fn api_key(&self) -> Option<String> {
        read_env(self.api_key_env.as_deref())
    }
}

fn read_env(name: Option<&str>) -> Option<String> {
    let name = name.filter(|n| !n.trim().is_empty())?;
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
