//! # Stratos SDK
//!
//! Client SDK for interacting with Stratos nodes.

pub mod client;
pub mod stream;

pub use client::{
    BlockView, BriefView, DeliveryReceiptView, SectionView, StratosClient, StrategyView,
};
pub use stream::{EventKind, StrategyEvent, StrategyEventStream};

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::client::{BriefView, StratosClient, StrategyView};
    pub use crate::stream::{EventKind, StrategyEvent, StrategyEventStream};
    pub use stratos_core::prelude::*;
}
