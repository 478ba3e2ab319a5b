//! # Stratos Core
//!
//! Core domain types for the Stratos marketing strategy platform: the
//! brief a user assembles step by step, the context aggregated from it,
//! and the AI-generated strategy tree an expert reviews and approves.
//!
//! The main types:
//! - [`Brief`]: the aggregate of user-submitted marketing components
//! - [`StrategyContext`]: the normalized merge handed to prompt building
//! - [`ParsedStrategy`]: the strict tree extracted from model output
//! - [`AIStrategy`]: the persisted, editable block/section hierarchy
//! - [`StratosError`]: the typed failure taxonomy for every pipeline step

pub mod brief;
pub mod context;
pub mod error;
pub mod strategy;
pub mod types;

pub use brief::{
    Brief, BriefBuilder, BriefComponent, BusinessInformation, Competitor, Competitors,
    MarketingGoal, MarketingResources, StrategyAdjustments, TargetAudience,
};
pub use context::StrategyContext;
pub use error::{Result, StratosError};
pub use strategy::{
    AIStrategy, Block, ParsedBlock, ParsedSection, ParsedStrategy, RawOutputArchive, Section,
};
pub use types::{AttemptState, ComponentKind, StrategyStatus};

/// Commonly used types, re-exported for convenience
pub mod prelude {
    pub use crate::brief::{Brief, BriefBuilder, BriefComponent};
    pub use crate::context::StrategyContext;
    pub use crate::error::{Result, StratosError};
    pub use crate::strategy::{AIStrategy, Block, ParsedStrategy, Section};
    pub use crate::types::{AttemptState, ComponentKind, StrategyStatus};
}
