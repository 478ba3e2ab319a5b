//! # Stratos State
//!
//! Storage and lifecycle enforcement for the Stratos platform:
//! - [`BriefStore`]: the component sets users assemble step by step
//! - [`Aggregator`]: the completeness gate producing generation contexts
//! - [`StrategyStore`]: commit, review, and approval of generated strategies
//! - [`StrategyEvents`]: broadcast bus for strategy lifecycle events
//!
//! The in-memory implementations are the single-node backends; the traits
//! are the seams a relational backend would plug into.

pub mod aggregate;
pub mod brief;
pub mod events;
pub mod strategy;

pub use aggregate::Aggregator;
pub use brief::{BriefStore, InMemoryBriefStore};
pub use events::{EventFilter, StrategyEvent, StrategyEventKind, StrategyEvents};
pub use strategy::{GenerationTicket, InMemoryStrategyStore, StrategyStore};
