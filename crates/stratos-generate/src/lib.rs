//! # Stratos Generate
//!
//! The AI generation half of the pipeline: deterministic prompt
//! construction from an aggregated brief, the model-provider seam, and the
//! strict parser that turns free-form model output into a validated
//! block/section tree.
//!
//! The prompt builder and parser share one set of delimiter constants
//! ([`format`]), so the instructed format and the accepted format cannot
//! drift apart.

pub mod format;
pub mod generator;
pub mod parser;
pub mod prompt;
pub mod provider;

pub use generator::{GenerationReport, StrategyGenerator};
pub use parser::parse_strategy;
pub use prompt::{build_prompt, STRATEGY_SYSTEM_PROMPT};
pub use provider::{HttpProvider, ModelProvider, ProviderConfig, ScriptedProvider};
