//! Cancellation endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::db::repos::{Cancellation, CancellationRepo};
use crate::http::error::{ApiError, ErrorBody};
use crate::http::extractors::{ValidId, ValidJson, ValidQuery};
use crate::http::server::AppState;
use crate::models::{CancellationInput, Paginated, Pagination, PaginationParams};

/// Cancel a reservation
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CancellationRequest {
    #[serde(rename = "ReservationID")]
    pub reservation_id: i32,
    pub reason: Option<String>,
}

/// Cancellation list filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "PascalCase")]
#[into_params(parameter_in = Query)]
pub struct CancellationListQuery {
    #[serde(rename = "ReservationID")]
    pub reservation_id: Option<i32>,
}

/// Cancellation response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CancellationResponse {
    #[serde(rename = "CancellationID")]
    pub cancellation_id: i32,
    #[serde(rename = "ReservationID")]
    pub reservation_id: i32,
    pub reason: String,
    pub refund_amount: f64,
    pub cancelled_at: String,
}

impl From<Cancellation> for CancellationResponse {
    fn from(c: Cancellation) -> Self {
        Self {
            cancellation_id: c.cancellation_id,
            reservation_id: c.reservation_id,
            reason: c.reason,
            refund_amount: c.refund_amount,
            cancelled_at: c.cancelled_at.to_rfc3339(),
        }
    }
}

/// GET /api/cancellations
#[utoipa::path(
    get,
    path = "/api/cancellations",
    tag = "cancellations",
    params(PaginationParams, CancellationListQuery),
    responses((status = 200, body = Paginated<CancellationResponse>))
)]
pub async fn list_cancellations(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<PaginationParams>,
    ValidQuery(query): ValidQuery<CancellationListQuery>,
) -> Result<Json<Paginated<CancellationResponse>>, ApiError> {
    let result = CancellationRepo::new(&state.db)
        .list(query.reservation_id, Pagination::from(params))
        .await?;
    Ok(Json(result.map(CancellationResponse::from)))
}

/// GET /api/cancellations/{id}
#[utoipa::path(
    get,
    path = "/api/cancellations/{id}",
    tag = "cancellations",
    params(("id" = i32, Path, description = "Cancellation ID")),
    responses(
        (status = 200, body = CancellationResponse),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_cancellation(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<CancellationResponse>, ApiError> {
    let cancellation = CancellationRepo::new(&state.db).get(id).await?;
    Ok(Json(CancellationResponse::from(cancellation)))
}

/// POST /api/cancellations - cancel a reservation and record the refund
#[utoipa::path(
    post,
    path = "/api/cancellations",
    tag = "cancellations",
    request_body = CancellationRequest,
    responses(
        (status = 201, body = CancellationResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 409, description = "Reservation cannot be cancelled", body = ErrorBody)
    )
)]
pub async fn cancel_reservation(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<CancellationRequest>,
) -> Result<(StatusCode, Json<CancellationResponse>), ApiError> {
    let input = CancellationInput::new(req.reservation_id, req.reason.as_deref())?;
    let cancellation = CancellationRepo::new(&state.db)
        .cancel(&input, Utc::now().date_naive())
        .await?;
    Ok((StatusCode::CREATED, Json(CancellationResponse::from(cancellation))))
}

/// Cancellation routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/cancellations",
            get(list_cancellations).post(cancel_reservation),
        )
        .route("/api/cancellations/{id}", get(get_cancellation))
}
