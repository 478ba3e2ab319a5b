//! Error types for the Stratos platform

use thiserror::Error;
use uuid::Uuid;

use crate::types::{ComponentKind, StrategyStatus};

/// The top-level error type for all Stratos operations
#[derive(Error, Debug, Clone)]
pub enum StratosError {
    /// The brief is missing required components and cannot be aggregated
    #[error("Brief {brief_id} is incomplete: missing {missing:?}")]
    IncompleteBrief {
        /// The brief that failed the completeness check
        brief_id: Uuid,
        /// Exactly the component kinds that are still absent
        missing: Vec<ComponentKind>,
    },

    /// The generative-model collaborator could not be reached or rejected the call
    #[error("Model provider '{provider}' unavailable: {message}")]
    ProviderUnavailable {
        /// Identifier of the provider that failed
        provider: String,
        /// Provider status or transport message
        message: String,
    },

    /// The model response did not conform to the canonical block/section format
    #[error("Model response could not be parsed: {reason}")]
    UnparseableResponse {
        /// What the parser objected to
        reason: String,
        /// The verbatim model output, preserved for diagnostics
        raw_text: String,
    },

    /// A generation is already in flight for this brief
    #[error("A strategy generation is already in progress for brief {brief_id}")]
    DuplicateGeneration {
        /// The brief whose in-flight flag is held
        brief_id: Uuid,
    },

    /// The brief already has an approved strategy and regeneration was not requested
    #[error("Brief {brief_id} already has an approved strategy")]
    ApprovedStrategyExists {
        /// The brief owning the approved strategy
        brief_id: Uuid,
    },

    /// The operation is not legal from the strategy's current status
    #[error("Cannot {operation} strategy {strategy_id} while {from:?}")]
    InvalidStateTransition {
        /// The strategy the operation targeted
        strategy_id: Uuid,
        /// The status the strategy was in
        from: StrategyStatus,
        /// The operation that was attempted
        operation: String,
    },

    /// The requested block order is not a permutation of the strategy's blocks
    #[error("Invalid block permutation for strategy {strategy_id}: {message}")]
    InvalidPermutation {
        /// The strategy whose order was left untouched
        strategy_id: Uuid,
        /// Which permutation rule was violated
        message: String,
    },

    /// A referenced resource does not exist
    #[error("{resource_type} {id} not found")]
    NotFound {
        /// The kind of resource that was looked up
        resource_type: String,
        /// The identifier that missed
        id: String,
    },

    /// The strategy has not been approved and cannot be delivered
    #[error("Strategy {strategy_id} is not ready for delivery (status: {status:?})")]
    NotReady {
        /// The strategy that was asked to deliver
        strategy_id: Uuid,
        /// Its current status
        status: StrategyStatus,
    },

    /// The document-render collaborator failed
    #[error("Document rendering failed: {message}")]
    RenderFailed {
        /// Renderer diagnostic
        message: String,
    },

    /// The delivery-transport collaborator failed
    #[error("Document delivery failed: {message}")]
    SendFailed {
        /// Transport diagnostic
        message: String,
    },

    /// Submitted content failed validation
    #[error("Invalid content: {message}")]
    ContentInvalid {
        /// What was wrong with the content
        message: String,
    },

    /// Serialization or deserialization failed
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An internal invariant was violated
    #[error("Internal error: {0}")]
    Internal(String),

    /// Connection to a remote node failed
    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl StratosError {
    /// Whether this error is a transient collaborator failure worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StratosError::ProviderUnavailable { .. }
                | StratosError::RenderFailed { .. }
                | StratosError::SendFailed { .. }
                | StratosError::ConnectionError(_)
        )
    }

    /// The brief associated with this error, if any
    pub fn brief_id(&self) -> Option<Uuid> {
        match self {
            StratosError::IncompleteBrief { brief_id, .. } => Some(*brief_id),
            StratosError::DuplicateGeneration { brief_id } => Some(*brief_id),
            StratosError::ApprovedStrategyExists { brief_id } => Some(*brief_id),
            _ => None,
        }
    }

    /// Shorthand for a [`StratosError::NotFound`] with a typed resource name
    pub fn not_found(resource_type: impl Into<String>, id: impl ToString) -> Self {
        StratosError::NotFound {
            resource_type: resource_type.into(),
            id: id.to_string(),
        }
    }
}

/// Convenience alias for Results with StratosError
pub type Result<T> = std::result::Result<T, StratosError>;

impl From<serde_json::Error> for StratosError {
    fn from(e: serde_json::Error) -> Self {
        StratosError::SerializationError(e.to_string())
    }
}
