//! Strategy API endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stratos_core::error::StratosError;
use stratos_core::strategy::AIStrategy;
use stratos_core::types::StrategyStatus;
use stratos_state::brief::BriefStore;
use stratos_state::strategy::StrategyStore;
use uuid::Uuid;

use crate::api::error_response;
use crate::state::AppState;

/// Request to generate a strategy for a brief.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    /// Replace an approved strategy instead of rejecting.
    #[serde(default)]
    pub regenerate: bool,
}

/// Request to rewrite one section.
#[derive(Debug, Deserialize)]
pub struct EditSectionRequest {
    pub content: String,
}

/// Request to reorder a strategy's blocks.
#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    /// Every block id of the strategy, in the desired order.
    pub order: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct SectionView {
    pub id: Uuid,
    pub order: u32,
    pub content: String,
    pub editable: bool,
}

#[derive(Debug, Serialize)]
pub struct BlockView {
    pub id: Uuid,
    pub order: u32,
    pub title: String,
    pub sections: Vec<SectionView>,
}

/// Strategy with its full block/section tree.
#[derive(Debug, Serialize)]
pub struct StrategyResponse {
    pub id: Uuid,
    pub brief_id: Uuid,
    pub status: StrategyStatus,
    pub generated_at: DateTime<Utc>,
    /// SHA-256 digest of the archived raw model output.
    pub raw_digest: String,
    /// Archived raw model output; present on the strategy resource only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    pub blocks: Vec<BlockView>,
}

impl StrategyResponse {
    fn from_strategy(strategy: &AIStrategy, include_raw: bool) -> Self {
        StrategyResponse {
            id: strategy.id,
            brief_id: strategy.brief_id,
            status: strategy.status,
            generated_at: strategy.generated_at,
            raw_digest: strategy.raw_output.sha256.clone(),
            raw_text: include_raw.then(|| strategy.raw_output.text.clone()),
            blocks: strategy
                .blocks
                .iter()
                .map(|block| BlockView {
                    id: block.id,
                    order: block.order,
                    title: block.title.clone(),
                    sections: block
                        .sections
                        .iter()
                        .map(|section| SectionView {
                            id: section.id,
                            order: section.order,
                            content: section.content.clone(),
                            editable: section.editable,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Run the full generation pipeline for a brief and return the committed
/// strategy.
pub async fn generate_strategy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<GenerateRequest>>,
) -> Result<(StatusCode, Json<StrategyResponse>), (StatusCode, String)> {
    let regenerate = body.map(|Json(req)| req.regenerate).unwrap_or(false);

    if state
        .briefs
        .get(id)
        .await
        .map_err(|e| error_response(&e))?
        .is_none()
    {
        return Err(error_response(&StratosError::not_found("Brief", id)));
    }

    let strategy = state
        .engine
        .run_generation(id, regenerate)
        .await
        .map_err(|e| error_response(&e))?;

    Ok((
        StatusCode::CREATED,
        Json(StrategyResponse::from_strategy(&strategy, false)),
    ))
}

/// Get the strategy currently attached to a brief.
pub async fn get_strategy_for_brief(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StrategyResponse>, (StatusCode, String)> {
    let strategy = state
        .strategies
        .get_for_brief(id)
        .await
        .map_err(|e| error_response(&e))?
        .ok_or_else(|| error_response(&StratosError::not_found("Strategy for brief", id)))?;

    Ok(Json(StrategyResponse::from_strategy(&strategy, false)))
}

/// Get a strategy by ID, including the archived raw output.
pub async fn get_strategy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StrategyResponse>, (StatusCode, String)> {
    let strategy = state
        .strategies
        .get(id)
        .await
        .map_err(|e| error_response(&e))?
        .ok_or_else(|| error_response(&StratosError::not_found("Strategy", id)))?;

    Ok(Json(StrategyResponse::from_strategy(&strategy, true)))
}

/// Record that an expert opened the strategy for review.
pub async fn open_strategy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StrategyResponse>, (StatusCode, String)> {
    let strategy = state
        .strategies
        .mark_opened(id)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(StrategyResponse::from_strategy(&strategy, false)))
}

/// Rewrite one section's content.
pub async fn edit_section(
    State(state): State<AppState>,
    Path((id, section_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<EditSectionRequest>,
) -> Result<Json<StrategyResponse>, (StatusCode, String)> {
    let strategy = state
        .strategies
        .edit_section(id, section_id, req.content)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(StrategyResponse::from_strategy(&strategy, false)))
}

/// Approve the strategy, locking it against further edits.
pub async fn approve_strategy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StrategyResponse>, (StatusCode, String)> {
    let strategy = state
        .strategies
        .approve(id)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(StrategyResponse::from_strategy(&strategy, false)))
}

/// Apply a full permutation of the strategy's block order.
pub async fn reorder_blocks(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<StrategyResponse>, (StatusCode, String)> {
    let strategy = state
        .strategies
        .reorder_blocks(id, req.order)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(StrategyResponse::from_strategy(&strategy, false)))
}
