//! Render and send approved strategies through pluggable collaborators

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use uuid::Uuid;

use stratos_core::error::{Result, StratosError};
use stratos_core::strategy::AIStrategy;

use crate::document::{DeliveryReceipt, RenderedDocument, StrategyDocument};

/// Turns a strategy document into deliverable bytes
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Renders the document, or fails with [`StratosError::RenderFailed`]
    async fn render(&self, document: &StrategyDocument) -> Result<RenderedDocument>;

    /// Short name of the output format
    fn format(&self) -> &str;
}

/// Carries a rendered document to a recipient
#[async_trait]
pub trait DeliveryTransport: Send + Sync {
    /// Sends the document and returns the transport's message identifier,
    /// or fails with [`StratosError::SendFailed`]
    async fn send(&self, document: &RenderedDocument, recipient: &str) -> Result<String>;

    /// Short name of the transport
    fn name(&self) -> &str;
}

/// Markdown renderer used until the PDF service is wired in
pub struct MarkdownRenderer;

#[async_trait]
impl DocumentRenderer for MarkdownRenderer {
    async fn render(&self, document: &StrategyDocument) -> Result<RenderedDocument> {
        if document.blocks.is_empty() {
            return Err(StratosError::RenderFailed {
                message: "document has no blocks".to_string(),
            });
        }

        Ok(RenderedDocument {
            content_type: "text/markdown".to_string(),
            filename: format!("strategy-{}.md", document.strategy_id),
            bytes: document.to_markdown().into_bytes(),
        })
    }

    fn format(&self) -> &str {
        "markdown"
    }
}

/// Transport that records the handoff in the log instead of sending email
pub struct LoggingTransport;

#[async_trait]
impl DeliveryTransport for LoggingTransport {
    async fn send(&self, document: &RenderedDocument, recipient: &str) -> Result<String> {
        let message_id = Uuid::new_v4().to_string();
        info!(
            "📬 Delivered {} ({} bytes) to {} [message {}]",
            document.filename,
            document.bytes.len(),
            recipient,
            message_id
        );
        Ok(message_id)
    }

    fn name(&self) -> &str {
        "logging"
    }
}

/// Delivery pipeline: assemble, render, send
pub struct DeliveryPipeline {
    renderer: Arc<dyn DocumentRenderer>,
    transport: Arc<dyn DeliveryTransport>,
}

impl DeliveryPipeline {
    /// Creates a pipeline over the given renderer and transport
    pub fn new(renderer: Arc<dyn DocumentRenderer>, transport: Arc<dyn DeliveryTransport>) -> Self {
        DeliveryPipeline {
            renderer,
            transport,
        }
    }

    /// Delivers an approved strategy to a recipient.
    ///
    /// The strategy itself is never mutated, so a failed delivery can be
    /// retried without touching review state.
    pub async fn deliver(&self, strategy: &AIStrategy, recipient: &str) -> Result<DeliveryReceipt> {
        if !strategy.status.is_terminal() {
            return Err(StratosError::NotReady {
                strategy_id: strategy.id,
                status: strategy.status,
            });
        }
        if recipient.trim().is_empty() {
            return Err(StratosError::ContentInvalid {
                message: "recipient must not be empty".to_string(),
            });
        }

        let document = StrategyDocument::from_strategy(strategy);
        let rendered = self.renderer.render(&document).await?;
        let message_id = self.transport.send(&rendered, recipient).await?;

        let receipt = DeliveryReceipt {
            id: Uuid::new_v4(),
            strategy_id: strategy.id,
            recipient: recipient.to_string(),
            transport: self.transport.name().to_string(),
            message_id,
            delivered_at: chrono::Utc::now(),
        };
        info!(
            "✅ Strategy {} delivered via {} as {}",
            strategy.id, receipt.transport, receipt.message_id
        );
        Ok(receipt)
    }
}
