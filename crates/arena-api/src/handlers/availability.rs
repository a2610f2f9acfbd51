//! Availability handlers.
//!
//! These endpoints are advisory reads for calendar UIs; the reservation
//! write path re-validates atomically.

use axum::Json;
use axum::extract::{Path, Query, State};

use arena_core::types::{FieldId, TimeRange};
use arena_service::DayAvailability;

use crate::dto::request::{AvailabilityCheckQuery, AvailabilityDayQuery};
use crate::dto::response::{ApiResponse, AvailabilityCheckResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/fields/{id}/availability/check
pub async fn check_slot(
    State(state): State<AppState>,
    Path(id): Path<FieldId>,
    Query(query): Query<AvailabilityCheckQuery>,
) -> ApiResult<Json<ApiResponse<AvailabilityCheckResponse>>> {
    let range = TimeRange::new(query.start_time, query.end_time)?;
    let field = state.field_repo.get(id).await?;
    let available = state
        .availability
        .is_available(&field, query.date, range, None)
        .await?;
    Ok(Json(ApiResponse::ok(AvailabilityCheckResponse {
        available,
    })))
}

/// GET /api/fields/{id}/availability
pub async fn day_availability(
    State(state): State<AppState>,
    Path(id): Path<FieldId>,
    Query(query): Query<AvailabilityDayQuery>,
) -> ApiResult<Json<ApiResponse<DayAvailability>>> {
    let field = state.field_repo.get(id).await?;
    let day = state
        .availability
        .comprehensive_availability(&field, query.date)
        .await?;
    Ok(Json(ApiResponse::ok(day)))
}
