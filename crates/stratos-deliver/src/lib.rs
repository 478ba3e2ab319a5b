//! # Stratos Deliver
//!
//! Document assembly and delivery pipeline for approved strategies.

pub mod document;
pub mod pipeline;

pub use document::{DeliveryReceipt, DocumentBlock, RenderedDocument, StrategyDocument};
pub use pipeline::{
    DeliveryPipeline, DeliveryTransport, DocumentRenderer, LoggingTransport, MarkdownRenderer,
};
