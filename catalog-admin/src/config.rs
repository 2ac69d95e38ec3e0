//! Console configuration
//!
//! | Flag | Environment variable | Default |
//! |------|----------------------|---------|
//! | `--base-url` | `CATALOG_API_URL` | `http://localhost:4000/api` |
//! | `--timeout` | `CATALOG_API_TIMEOUT` | `30` (seconds) |
//! | `--token` | `CATALOG_API_TOKEN` | none |
//!
//! A `.env` file in the working directory is loaded before parsing.

use catalog_client::ClientConfig;
use catalog_client::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Where and how to reach the catalog API
#[derive(Debug, Clone, PartialEq, Eq, clap::Args)]
pub struct AdminConfig {
    /// Catalog API base URL
    #[arg(long, env = "CATALOG_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "CATALOG_API_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Bearer token sent with every request
    #[arg(long, env = "CATALOG_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

impl AdminConfig {
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.base_url.clone()).with_timeout(self.timeout);
        match &self.token {
            Some(token) => config.with_token(token.clone()),
            None => config,
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            token: None,
        }
    }
}
