//! Single-attempt generation: provider call, deadline, strict parse

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::{debug, error, info};

use stratos_core::error::{Result, StratosError};
use stratos_core::strategy::ParsedStrategy;
use stratos_core::types::AttemptState;

use crate::parser::parse_strategy;
use crate::provider::ModelProvider;

/// Everything a successful attempt hands onward for commit
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// The validated strategy tree
    pub parsed: ParsedStrategy,

    /// The verbatim model output the tree came from
    pub raw_text: String,

    /// Which provider produced it
    pub provider: String,

    /// Wall-clock duration of the attempt
    pub latency_ms: u64,

    /// When the attempt finished
    pub finished_at: DateTime<Utc>,
}

/// Drives one generation attempt at a time against a model provider.
///
/// Exactly one provider call per attempt: a failed attempt surfaces its
/// typed error and the retry decision stays with the caller. The generator
/// keeps no state between attempts, so a discarded attempt leaves nothing
/// behind.
pub struct StrategyGenerator {
    provider: Arc<dyn ModelProvider>,
    timeout: Duration,
}

impl StrategyGenerator {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        StrategyGenerator {
            provider,
            timeout: Duration::from_millis(60_000),
        }
    }

    /// Replaces the per-attempt deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs one attempt through the request/parse state machine
    pub async fn generate(&self, prompt: &str) -> Result<GenerationReport> {
        let provider = self.provider.name().to_string();
        let started = Instant::now();

        let mut state = AttemptState::NotStarted;
        debug!(provider = %provider, state = ?state, prompt_len = prompt.len(), "attempt created");

        state = AttemptState::Requested;
        debug!(state = ?state, "calling provider");
        let raw = match timeout(self.timeout, self.provider.complete(prompt)).await {
            Err(_) => {
                state = AttemptState::RequestFailed;
                error!(
                    provider = %provider,
                    state = ?state,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "provider call timed out"
                );
                return Err(StratosError::ProviderUnavailable {
                    provider,
                    message: format!("no response within {}ms", self.timeout.as_millis()),
                });
            }
            Ok(Err(e)) => {
                state = AttemptState::RequestFailed;
                error!(provider = %provider, state = ?state, error = %e, "provider call failed");
                return Err(e);
            }
            Ok(Ok(raw)) => {
                state = AttemptState::ResponseReceived;
                debug!(state = ?state, raw_len = raw.len(), "response received");
                raw
            }
        };

        match parse_strategy(&raw) {
            Ok(parsed) => {
                state = AttemptState::ParseSucceeded;
                let latency_ms = started.elapsed().as_millis() as u64;
                info!(
                    provider = %provider,
                    state = ?state,
                    blocks = parsed.block_count(),
                    sections = parsed.section_count(),
                    latency_ms,
                    "generation attempt succeeded"
                );
                Ok(GenerationReport {
                    parsed,
                    raw_text: raw,
                    provider,
                    latency_ms,
                    finished_at: Utc::now(),
                })
            }
            Err(e) => {
                state = AttemptState::ParseFailed;
                error!(provider = %provider, state = ?state, "model response rejected by parser");
                Err(e)
            }
        }
    }
}
