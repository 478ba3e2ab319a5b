//! Delivery API endpoint.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use stratos_core::error::StratosError;
use stratos_deliver::DeliveryReceipt;
use stratos_state::events::{StrategyEvent, StrategyEventKind};
use stratos_state::strategy::StrategyStore;
use uuid::Uuid;

use crate::api::error_response;
use crate::state::AppState;

/// Request to deliver an approved strategy.
#[derive(Debug, Deserialize)]
pub struct DeliverRequest {
    /// Destination address for the rendered document.
    pub recipient: String,
}

/// Render and send an approved strategy, returning the receipt.
pub async fn deliver_strategy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<DeliverRequest>,
) -> Result<Json<DeliveryReceipt>, (axum::http::StatusCode, String)> {
    let strategy = state
        .strategies
        .get(id)
        .await
        .map_err(|e| error_response(&e))?
        .ok_or_else(|| error_response(&StratosError::not_found("Strategy", id)))?;

    let receipt = state
        .delivery
        .deliver(&strategy, &req.recipient)
        .await
        .map_err(|e| error_response(&e))?;

    state.strategies.events().publish(StrategyEvent::new(
        strategy.brief_id,
        Some(strategy.id),
        StrategyEventKind::Delivered {
            receipt_id: receipt.id,
        },
    ));

    Ok(Json(receipt))
}
