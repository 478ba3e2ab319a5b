//! HTTP API surface.

pub mod brief;
pub mod deliver;
pub mod health;
pub mod strategy;
pub mod ws;

use axum::http::StatusCode;
use stratos_core::error::StratosError;
use tracing::{error, warn};

/// Maps a core error onto a client-safe HTTP response.
///
/// Provider diagnostics and raw model text must never leave the service
/// boundary; they are logged here and replaced with a generic retry message.
pub fn error_response(err: &StratosError) -> (StatusCode, String) {
    match err {
        StratosError::IncompleteBrief { missing, .. } => {
            let names: Vec<&str> = missing.iter().map(|kind| kind.as_str()).collect();
            (
                StatusCode::CONFLICT,
                format!("brief incomplete: missing {}", names.join(", ")),
            )
        }
        StratosError::ProviderUnavailable { provider, message } => {
            warn!("Provider '{}' unavailable: {}", provider, message);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "strategy generation failed, try again".to_string(),
            )
        }
        StratosError::UnparseableResponse { reason, .. } => {
            error!("Model response rejected: {}", reason);
            (
                StatusCode::BAD_GATEWAY,
                "strategy generation failed, try again".to_string(),
            )
        }
        StratosError::DuplicateGeneration { .. } => (
            StatusCode::CONFLICT,
            "generation already in progress for this brief".to_string(),
        ),
        StratosError::ApprovedStrategyExists { .. } => (
            StatusCode::CONFLICT,
            "an approved strategy already exists; set regenerate to replace it".to_string(),
        ),
        StratosError::InvalidStateTransition { .. } => (StatusCode::CONFLICT, err.to_string()),
        StratosError::NotReady { .. } => (
            StatusCode::CONFLICT,
            "strategy not yet approved".to_string(),
        ),
        StratosError::InvalidPermutation { .. } | StratosError::ContentInvalid { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        StratosError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        StratosError::RenderFailed { message } => {
            error!("Document render failed: {}", message);
            (
                StatusCode::BAD_GATEWAY,
                "delivery failed, try again".to_string(),
            )
        }
        StratosError::SendFailed { message } => {
            error!("Delivery transport failed: {}", message);
            (
                StatusCode::BAD_GATEWAY,
                "delivery failed, try again".to_string(),
            )
        }
        StratosError::SerializationError(_)
        | StratosError::Internal(_)
        | StratosError::ConnectionError(_) => {
            error!("Internal error: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            )
        }
    }
}
