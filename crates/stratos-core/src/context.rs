//! Normalized generation context built from a complete brief

use serde::{Deserialize, Serialize};

use crate::brief::{
    Brief, BusinessInformation, Competitors, MarketingGoal, MarketingResources,
    StrategyAdjustments, TargetAudience,
};
use crate::error::{Result, StratosError};

/// The merged view of a complete brief handed to the prompt builder.
///
/// Ephemeral by design: built fresh for each generation request and never
/// persisted. Two merges of the same brief state compare equal, so prompt
/// construction downstream stays deterministic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyContext {
    /// Business facts
    pub business: BusinessInformation,

    /// Goal definition
    pub goal: MarketingGoal,

    /// Audience definition
    pub audience: TargetAudience,

    /// Resource inventory
    pub resources: MarketingResources,

    /// Competitive landscape
    pub competitors: Competitors,

    /// Strategy steering
    pub adjustments: StrategyAdjustments,
}

impl StrategyContext {
    /// Merges a brief's components, failing if any required one is absent.
    ///
    /// The error lists exactly the missing kinds so callers can report
    /// which steps remain. No field is dropped in the merge; flattened
    /// extras ride along untouched.
    pub fn from_brief(brief: &Brief) -> Result<Self> {
        let missing = brief.missing_components();
        if !missing.is_empty() {
            return Err(StratosError::IncompleteBrief {
                brief_id: brief.id,
                missing,
            });
        }

        // Presence of every slot was just checked; the fallbacks are unreachable.
        Ok(StrategyContext {
            business: brief.business_information.clone().ok_or_else(Self::merge_bug)?,
            goal: brief.marketing_goal.clone().ok_or_else(Self::merge_bug)?,
            audience: brief.target_audience.clone().ok_or_else(Self::merge_bug)?,
            resources: brief.marketing_resources.clone().ok_or_else(Self::merge_bug)?,
            competitors: brief.competitors.clone().ok_or_else(Self::merge_bug)?,
            adjustments: brief.strategy_adjustments.clone().ok_or_else(Self::merge_bug)?,
        })
    }

    fn merge_bug() -> StratosError {
        StratosError::Internal("component vanished between completeness check and merge".to_string())
    }
}
