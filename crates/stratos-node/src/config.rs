//! Node configuration from the environment.

use std::net::SocketAddr;

use stratos_generate::provider::ProviderConfig;
use tracing::warn;

/// Environment-driven node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Socket address the API server binds to.
    pub addr: SocketAddr,

    /// Model provider endpoint; `None` selects the scripted provider.
    pub provider: Option<ProviderConfig>,
}

impl NodeConfig {
    /// Load configuration from the environment, reading `.env` if present.
    ///
    /// `STRATOS_ADDR` sets the bind address. `STRATOS_PROVIDER_URL` turns on
    /// the HTTP provider; `STRATOS_PROVIDER_KEY`, `STRATOS_MODEL`, and
    /// `STRATOS_TIMEOUT_MS` refine it. Without a provider URL the node runs
    /// with scripted responses.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let addr = match std::env::var("STRATOS_ADDR") {
            Ok(raw) => match raw.parse() {
                Ok(addr) => addr,
                Err(_) => {
                    warn!("⚠️ Ignoring invalid STRATOS_ADDR '{}'", raw);
                    default_addr()
                }
            },
            Err(_) => default_addr(),
        };

        let provider = std::env::var("STRATOS_PROVIDER_URL").ok().map(|endpoint| {
            let mut config = ProviderConfig {
                endpoint,
                ..ProviderConfig::default()
            };
            if let Ok(key) = std::env::var("STRATOS_PROVIDER_KEY") {
                config.api_key = Some(key);
            }
            if let Ok(model) = std::env::var("STRATOS_MODEL") {
                config.model = model;
            }
            if let Ok(raw) = std::env::var("STRATOS_TIMEOUT_MS") {
                match raw.parse() {
                    Ok(ms) => config.timeout_ms = ms,
                    Err(_) => warn!("⚠️ Ignoring invalid STRATOS_TIMEOUT_MS '{}'", raw),
                }
            }
            config
        });

        NodeConfig { addr, provider }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        NodeConfig {
            addr: default_addr(),
            provider: None,
        }
    }
}

fn default_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3000))
}
