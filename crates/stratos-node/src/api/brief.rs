//! Brief API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stratos_core::brief::{Brief, BriefComponent};
use stratos_core::context::StrategyContext;
use stratos_core::error::StratosError;
use stratos_core::types::ComponentKind;
use stratos_state::brief::BriefStore;
use stratos_state::strategy::StrategyStore;
use uuid::Uuid;

use crate::api::error_response;
use crate::state::AppState;

/// Request to create a new brief.
#[derive(Debug, Deserialize)]
pub struct CreateBriefRequest {
    /// Owner of the brief.
    pub user_id: Uuid,
}

/// Query for listing a user's briefs.
#[derive(Debug, Deserialize)]
pub struct ListBriefsQuery {
    pub user_id: Uuid,
}

/// Brief summary with completeness information.
#[derive(Debug, Serialize)]
pub struct BriefResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Intake steps already submitted, in canonical order.
    pub submitted: Vec<String>,
    /// Intake steps still required before generation.
    pub missing: Vec<String>,
    pub complete: bool,
}

impl BriefResponse {
    fn from_brief(brief: &Brief) -> Self {
        let submitted = ComponentKind::REQUIRED
            .iter()
            .filter(|kind| brief.has_component(**kind))
            .map(|kind| kind.as_str().to_string())
            .collect();
        let missing = brief
            .missing_components()
            .iter()
            .map(|kind| kind.as_str().to_string())
            .collect();

        BriefResponse {
            id: brief.id,
            user_id: brief.user_id,
            created_at: brief.created_at,
            updated_at: brief.updated_at,
            submitted,
            missing,
            complete: brief.is_complete(),
        }
    }
}

/// Create a new, empty brief.
pub async fn create_brief(
    State(state): State<AppState>,
    Json(req): Json<CreateBriefRequest>,
) -> Result<(StatusCode, Json<BriefResponse>), (StatusCode, String)> {
    let brief = state
        .briefs
        .create(req.user_id)
        .await
        .map_err(|e| error_response(&e))?;

    Ok((StatusCode::CREATED, Json(BriefResponse::from_brief(&brief))))
}

/// Get a brief's summary by ID.
pub async fn get_brief(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BriefResponse>, (StatusCode, String)> {
    let brief = state
        .briefs
        .get(id)
        .await
        .map_err(|e| error_response(&e))?
        .ok_or_else(|| error_response(&StratosError::not_found("Brief", id)))?;

    Ok(Json(BriefResponse::from_brief(&brief)))
}

/// List all briefs owned by a user, newest first.
pub async fn list_briefs(
    State(state): State<AppState>,
    Query(query): Query<ListBriefsQuery>,
) -> Result<Json<Vec<BriefResponse>>, (StatusCode, String)> {
    let briefs = state
        .briefs
        .list_for_user(query.user_id)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(briefs.iter().map(BriefResponse::from_brief).collect()))
}

/// Submit one intake step. Resubmitting a step overwrites that step only.
pub async fn submit_component(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(component): Json<BriefComponent>,
) -> Result<Json<BriefResponse>, (StatusCode, String)> {
    let brief = state
        .briefs
        .upsert_component(id, component)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(BriefResponse::from_brief(&brief)))
}

/// Preview the aggregated strategy context for a complete brief.
pub async fn get_context(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StrategyContext>, (StatusCode, String)> {
    let context = state
        .aggregator
        .aggregate(id)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(Json(context))
}

/// Delete a brief that has no strategy attached.
pub async fn delete_brief(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if state
        .briefs
        .get(id)
        .await
        .map_err(|e| error_response(&e))?
        .is_none()
    {
        return Err(error_response(&StratosError::not_found("Brief", id)));
    }

    if state.strategies.generation_in_flight(id) {
        return Err((
            StatusCode::CONFLICT,
            "generation in progress for this brief".to_string(),
        ));
    }
    if state
        .strategies
        .get_for_brief(id)
        .await
        .map_err(|e| error_response(&e))?
        .is_some()
    {
        return Err((
            StatusCode::CONFLICT,
            "a strategy exists for this brief".to_string(),
        ));
    }

    state
        .briefs
        .delete(id)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(StatusCode::NO_CONTENT)
}
