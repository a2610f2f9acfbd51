//! Booking handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use arena_core::error::AppError;
use arena_core::types::{BookingId, TimeRange, UserId};
use arena_entity::booking::{Booking, BookingHistoryEntry, BookingRequest, Discount};
use arena_entity::payment::{CreatePayment, PaymentRecordStatus};
use arena_service::{BookingOutcome, CancellationOutcome};

use crate::dto::request::{
    ApplyDiscountRequest, AssignStaffRequest, CancelBookingRequest, RecordPaymentRequest,
    RescheduleRequest,
};
use crate::dto::response::ApiResponse;
use crate::error::ApiResult;
use crate::extractors::{Actor, PaginationParams};
use crate::state::AppState;

/// Query parameters for the booking listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListBookingsQuery {
    /// User whose bookings to list; defaults to the acting user.
    pub user_id: Option<Uuid>,
    /// Pagination.
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<BookingRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<BookingOutcome>>)> {
    let outcome = state.booking_service.create(&actor, request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(outcome))))
}

/// GET /api/bookings
pub async fn list_bookings(
    State(state): State<AppState>,
    actor: Actor,
    Query(query): Query<ListBookingsQuery>,
) -> ApiResult<Json<serde_json::Value>> {
    let user_id = match query.user_id {
        Some(id) => UserId::from(id),
        None => actor
            .actor_id
            .ok_or_else(|| AppError::authorization("A booking listing needs an acting user"))?,
    };
    let page = state
        .booking_service
        .list_for_user(&actor, user_id, query.pagination.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": page })))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = state.booking_service.get(&actor, id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// GET /api/bookings/{id}/history
pub async fn booking_history(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
) -> ApiResult<Json<ApiResponse<Vec<BookingHistoryEntry>>>> {
    let entries = state.booking_service.history(&actor, id).await?;
    Ok(Json(ApiResponse::ok(entries)))
}

/// POST /api/bookings/{id}/confirm
pub async fn confirm_booking(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = state.booking_service.confirm(&actor, id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
    Json(request): Json<CancelBookingRequest>,
) -> ApiResult<Json<ApiResponse<CancellationOutcome>>> {
    let outcome = state
        .booking_service
        .cancel(&actor, id, request.reason)
        .await?;
    Ok(Json(ApiResponse::ok(outcome)))
}

/// PUT /api/bookings/{id}/schedule
pub async fn reschedule_booking(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
    Json(request): Json<RescheduleRequest>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let range = TimeRange::new(request.start_time, request.end_time)?;
    let booking = state
        .booking_service
        .reschedule(&actor, id, request.booking_date, range)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/no-show
pub async fn mark_no_show(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = state.booking_service.mark_no_show(&actor, id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/payments
pub async fn record_payment(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
    Json(request): Json<RecordPaymentRequest>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    request
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let payment = CreatePayment {
        amount: request.amount,
        method: request.method,
        status: request.status.unwrap_or(PaymentRecordStatus::Completed),
        reference: request.reference,
    };
    let booking = state
        .booking_service
        .record_payment(&actor, id, payment)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/discounts
pub async fn apply_discount(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
    Json(request): Json<ApplyDiscountRequest>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    request
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    let discount = Discount {
        code: request.code,
        amount: request.amount,
        note: request.note,
        applied_at: Utc::now(),
    };
    let booking = state
        .booking_service
        .apply_discount(&actor, id, discount)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/staff
pub async fn assign_staff(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
    Json(request): Json<AssignStaffRequest>,
) -> ApiResult<Json<ApiResponse<Booking>>> {
    let booking = state
        .booking_service
        .assign_staff(&actor, id, request.role)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}
