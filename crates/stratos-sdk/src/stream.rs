//! Strategy event stream for real-time updates.

use std::pin::Pin;
use std::task::{Context, Poll};

use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use serde::Deserialize;
use stratos_core::error::{Result, StratosError};
use stratos_core::types::StrategyStatus;
use tokio_stream::wrappers::ReceiverStream;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use uuid::Uuid;

/// One strategy lifecycle event observed for a brief.
#[derive(Debug, Clone, Deserialize)]
pub struct StrategyEvent {
    /// The brief the event belongs to.
    pub brief_id: Uuid,

    /// The strategy involved, when one exists yet.
    #[serde(default)]
    pub strategy_id: Option<Uuid>,

    /// What happened.
    pub kind: EventKind,

    /// When the node recorded it.
    pub timestamp: DateTime<Utc>,
}

/// Event types from the stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// A generation attempt acquired the brief's flag.
    GenerationStarted,
    /// The attempt failed before commit.
    GenerationFailed { message: String, retryable: bool },
    /// A fresh strategy tree was committed.
    Committed { block_count: usize },
    /// Review status moved along the lifecycle.
    StatusChanged {
        from: StrategyStatus,
        to: StrategyStatus,
    },
    /// An expert rewrote one section.
    SectionEdited { section_id: Uuid },
    /// The block order was permuted.
    BlocksReordered,
    /// The rendered strategy left through a transport.
    Delivered { receipt_id: Uuid },
}

/// Stream of strategy events for one brief.
pub struct StrategyEventStream {
    brief_id: Uuid,
    receiver: ReceiverStream<StrategyEvent>,
    _handle: tokio::task::JoinHandle<()>,
}

impl StrategyEventStream {
    /// Connect to a node's event stream for a brief.
    pub async fn connect(ws_url: &str, brief_id: Uuid) -> Result<Self> {
        let (ws_stream, _) = connect_async(ws_url)
            .await
            .map_err(|e| StratosError::ConnectionError(e.to_string()))?;

        let (tx, rx) = tokio::sync::mpsc::channel(100);

        let handle = tokio::spawn(async move {
            let (_, mut read) = ws_stream.split();

            while let Some(msg) = read.next().await {
                match msg {
                    Ok(Message::Text(text)) => {
                        // Non-event frames (the connection greeting) are skipped
                        if let Ok(event) = serde_json::from_str::<StrategyEvent>(&text) {
                            if tx.send(event).await.is_err() {
                                break;
                            }
                        }
                    }
                    Ok(Message::Close(_)) | Err(_) => break,
                    _ => {}
                }
            }
        });

        Ok(Self {
            brief_id,
            receiver: ReceiverStream::new(rx),
            _handle: handle,
        })
    }

    /// The brief this stream watches.
    pub fn brief_id(&self) -> Uuid {
        self.brief_id
    }

    /// Get the next event.
    pub async fn next(&mut self) -> Option<StrategyEvent> {
        self.receiver.next().await
    }
}

impl Stream for StrategyEventStream {
    type Item = StrategyEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}
