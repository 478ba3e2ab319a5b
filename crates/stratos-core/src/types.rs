//! Shared status and classification types

use serde::{Deserialize, Serialize};

/// Lifecycle status of a generated strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyStatus {
    /// Generated and committed, not yet viewed by an expert
    Pending,

    /// Viewed by an expert, unmodified
    Opened,

    /// Modified by an expert since generation
    Edited,

    /// Approved by an expert; eligible for delivery
    Completed,
}

impl StrategyStatus {
    /// Whether this status is terminal (no transition leaves it)
    pub fn is_terminal(&self) -> bool {
        matches!(self, StrategyStatus::Completed)
    }

    /// Whether expert mutations (section edits, block reorders) are legal
    pub fn is_editable(&self) -> bool {
        matches!(self, StrategyStatus::Opened | StrategyStatus::Edited)
    }
}

/// Per-attempt state of one generation round trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptState {
    /// No provider call issued yet
    NotStarted,

    /// Provider call in flight
    Requested,

    /// Provider returned text; parsing not yet attempted
    ResponseReceived,

    /// Provider call failed or timed out
    RequestFailed,

    /// Response parsed into a valid strategy tree
    ParseSucceeded,

    /// Response received but rejected by the parser
    ParseFailed,
}

impl AttemptState {
    /// Whether the attempt has reached an end state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AttemptState::RequestFailed | AttemptState::ParseSucceeded | AttemptState::ParseFailed
        )
    }

    /// Whether the attempt ended without a usable strategy
    pub fn is_failure(&self) -> bool {
        matches!(self, AttemptState::RequestFailed | AttemptState::ParseFailed)
    }
}

/// The six kinds of brief component a user submits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    BusinessInformation,
    MarketingGoal,
    TargetAudience,
    MarketingResources,
    Competitors,
    StrategyAdjustments,
}

impl ComponentKind {
    /// Every component kind required before a brief counts as complete
    pub const REQUIRED: [ComponentKind; 6] = [
        ComponentKind::BusinessInformation,
        ComponentKind::MarketingGoal,
        ComponentKind::TargetAudience,
        ComponentKind::MarketingResources,
        ComponentKind::Competitors,
        ComponentKind::StrategyAdjustments,
    ];

    /// Stable snake_case name, matching the serialized form
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::BusinessInformation => "business_information",
            ComponentKind::MarketingGoal => "marketing_goal",
            ComponentKind::TargetAudience => "target_audience",
            ComponentKind::MarketingResources => "marketing_resources",
            ComponentKind::Competitors => "competitors",
            ComponentKind::StrategyAdjustments => "strategy_adjustments",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
