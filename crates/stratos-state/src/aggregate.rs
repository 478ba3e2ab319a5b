//! Brief aggregation: the completeness gate ahead of the model call

use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use stratos_core::context::StrategyContext;
use stratos_core::error::{Result, StratosError};

use crate::brief::BriefStore;

/// Reduces a stored brief into a [`StrategyContext`], or reports which
/// components still block generation.
pub struct Aggregator {
    store: Arc<dyn BriefStore>,
}

impl Aggregator {
    pub fn new(store: Arc<dyn BriefStore>) -> Self {
        Aggregator { store }
    }

    /// Pure read over the brief store; never mutates anything.
    ///
    /// Returns `NotFound` for an unknown brief and `IncompleteBrief` with
    /// the exact missing kinds otherwise; on success the merge is
    /// deterministic, so repeated calls without intervening writes yield
    /// equal contexts.
    pub async fn aggregate(&self, brief_id: Uuid) -> Result<StrategyContext> {
        let brief = self
            .store
            .get(brief_id)
            .await?
            .ok_or_else(|| StratosError::not_found("Brief", brief_id))?;

        let context = StrategyContext::from_brief(&brief)?;
        debug!(brief_id = %brief_id, "aggregated brief into generation context");
        Ok(context)
    }
}
