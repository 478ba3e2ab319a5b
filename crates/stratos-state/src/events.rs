//! Strategy lifecycle event broadcasting

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use stratos_core::types::StrategyStatus;

/// What happened to a strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategyEventKind {
    /// A generation attempt acquired the in-flight flag
    GenerationStarted,

    /// A generation attempt ended without a committed strategy
    GenerationFailed { message: String, retryable: bool },

    /// A freshly parsed strategy replaced the brief's previous one
    Committed { block_count: usize },

    /// The review status moved along a legal edge
    StatusChanged {
        from: StrategyStatus,
        to: StrategyStatus,
    },

    /// An expert rewrote one section
    SectionEdited { section_id: Uuid },

    /// An expert reordered the strategy's blocks
    BlocksReordered,

    /// The approved strategy was rendered and handed to the transport
    Delivered { receipt_id: Uuid },
}

/// A strategy lifecycle event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyEvent {
    /// The brief the event belongs to
    pub brief_id: Uuid,

    /// The strategy involved, absent for pre-commit failures
    pub strategy_id: Option<Uuid>,

    /// What happened
    pub kind: StrategyEventKind,

    /// When it happened
    pub timestamp: DateTime<Utc>,
}

impl StrategyEvent {
    pub fn new(brief_id: Uuid, strategy_id: Option<Uuid>, kind: StrategyEventKind) -> Self {
        StrategyEvent {
            brief_id,
            strategy_id,
            kind,
            timestamp: Utc::now(),
        }
    }
}

/// Filter for event subscriptions
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Match only events for this brief
    pub brief_id: Option<Uuid>,

    /// Match only events for this strategy
    pub strategy_id: Option<Uuid>,
}

impl EventFilter {
    /// Filter to a single brief
    pub fn brief(brief_id: Uuid) -> Self {
        EventFilter {
            brief_id: Some(brief_id),
            strategy_id: None,
        }
    }

    /// Filter to a single strategy
    pub fn strategy(strategy_id: Uuid) -> Self {
        EventFilter {
            brief_id: None,
            strategy_id: Some(strategy_id),
        }
    }

    /// Whether an event passes this filter; an empty filter passes everything
    pub fn matches(&self, event: &StrategyEvent) -> bool {
        if let Some(brief_id) = self.brief_id {
            if event.brief_id != brief_id {
                return false;
            }
        }
        if let Some(strategy_id) = self.strategy_id {
            if event.strategy_id != Some(strategy_id) {
                return false;
            }
        }
        true
    }
}

/// Broadcast bus for strategy lifecycle events.
///
/// Publishing never blocks and never fails; events sent while nobody is
/// subscribed are dropped.
#[derive(Clone)]
pub struct StrategyEvents {
    sender: broadcast::Sender<StrategyEvent>,
}

impl StrategyEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1000);
        StrategyEvents { sender }
    }

    /// Opens a new subscription receiving every event from this point on
    pub fn subscribe(&self) -> broadcast::Receiver<StrategyEvent> {
        self.sender.subscribe()
    }

    /// Publishes an event to all current subscribers
    pub fn publish(&self, event: StrategyEvent) {
        debug!(brief_id = %event.brief_id, "publishing strategy event");
        let _ = self.sender.send(event);
    }
}

impl Default for StrategyEvents {
    fn default() -> Self {
        Self::new()
    }
}
