//! Shared application state.

use std::sync::Arc;

use stratos_deliver::{DeliveryPipeline, LoggingTransport, MarkdownRenderer};
use stratos_generate::generator::StrategyGenerator;
use stratos_generate::provider::{HttpProvider, ModelProvider, ScriptedProvider};
use stratos_state::aggregate::Aggregator;
use stratos_state::brief::InMemoryBriefStore;
use stratos_state::strategy::InMemoryStrategyStore;
use tokio::time::Duration;
use tracing::info;

use crate::config::NodeConfig;
use crate::engine::Engine;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Brief storage.
    pub briefs: Arc<InMemoryBriefStore>,

    /// Strategy storage.
    pub strategies: Arc<InMemoryStrategyStore>,

    /// Brief aggregator (context preview).
    pub aggregator: Arc<Aggregator>,

    /// Generation pipeline orchestrator.
    pub engine: Arc<Engine>,

    /// Delivery pipeline.
    pub delivery: Arc<DeliveryPipeline>,
}

impl AppState {
    /// Create state with the scripted provider (development default).
    pub fn new() -> Self {
        Self::with_provider(Arc::new(ScriptedProvider::canned()))
    }

    /// Create state from environment configuration.
    pub fn from_config(config: &NodeConfig) -> Self {
        match &config.provider {
            Some(provider_config) => {
                info!("🔌 Model provider: {} at {}", provider_config.model, provider_config.endpoint);
                let timeout = Duration::from_millis(provider_config.timeout_ms);
                Self::build(Arc::new(HttpProvider::new(provider_config.clone())), timeout)
            }
            None => {
                info!("🎭 No provider configured, using scripted responses");
                Self::new()
            }
        }
    }

    /// Create state over a specific provider.
    pub fn with_provider(provider: Arc<dyn ModelProvider>) -> Self {
        Self::build(provider, Duration::from_secs(60))
    }

    fn build(provider: Arc<dyn ModelProvider>, timeout: Duration) -> Self {
        let briefs = Arc::new(InMemoryBriefStore::new());
        let strategies = Arc::new(InMemoryStrategyStore::new());
        let aggregator = Arc::new(Aggregator::new(briefs.clone()));
        let generator = Arc::new(StrategyGenerator::new(provider).with_timeout(timeout));
        let engine = Arc::new(Engine::new(
            aggregator.clone(),
            generator,
            strategies.clone(),
        ));
        let delivery = Arc::new(DeliveryPipeline::new(
            Arc::new(MarkdownRenderer),
            Arc::new(LoggingTransport),
        ));

        AppState {
            briefs,
            strategies,
            aggregator,
            engine,
            delivery,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
