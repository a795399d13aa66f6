//! Reservation endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::db::repos::{Reservation, ReservationFilter, ReservationQuote, ReservationRepo};
use crate::http::error::{ApiError, ErrorBody};
use crate::http::extractors::{ValidId, ValidJson, ValidQuery};
use crate::http::server::AppState;
use crate::models::{
    Paginated, Pagination, PaginationParams, ReservationInput, ReservationStatus, StayDates,
};

/// Book a room
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ReservationRequest {
    #[serde(rename = "UserID")]
    pub user_id: i32,
    #[serde(rename = "RoomID")]
    pub room_id: i32,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub number_of_guests: i32,
}

impl ReservationRequest {
    fn validate(&self, today: NaiveDate) -> Result<ReservationInput, ApiError> {
        Ok(ReservationInput::new(
            self.user_id,
            self.room_id,
            self.check_in_date,
            self.check_out_date,
            self.number_of_guests,
            today,
        )?)
    }
}

/// Price a stay
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct QuoteRequest {
    #[serde(rename = "RoomID")]
    pub room_id: i32,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
}

/// Reservation list filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "PascalCase")]
#[into_params(parameter_in = Query)]
pub struct ReservationListQuery {
    #[serde(rename = "UserID")]
    pub user_id: Option<i32>,
    pub status: Option<ReservationStatus>,
}

/// Reservation response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ReservationResponse {
    #[serde(rename = "ReservationID")]
    pub reservation_id: i32,
    #[serde(rename = "UserID")]
    pub user_id: i32,
    #[serde(rename = "RoomID")]
    pub room_id: i32,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub number_of_guests: i32,
    pub total_cost: f64,
    pub status: ReservationStatus,
    pub created_at: String,
}

impl From<Reservation> for ReservationResponse {
    fn from(r: Reservation) -> Self {
        Self {
            reservation_id: r.reservation_id,
            user_id: r.user_id,
            room_id: r.room_id,
            check_in_date: r.check_in_date,
            check_out_date: r.check_out_date,
            number_of_guests: r.number_of_guests,
            total_cost: r.total_cost,
            status: r.status,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// Quote response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct QuoteResponse {
    #[serde(rename = "RoomID")]
    pub room_id: i32,
    pub nights: i64,
    pub price_per_night: f64,
    pub total_cost: f64,
}

impl From<ReservationQuote> for QuoteResponse {
    fn from(q: ReservationQuote) -> Self {
        Self {
            room_id: q.room_id,
            nights: q.nights,
            price_per_night: q.price_per_night,
            total_cost: q.total_cost,
        }
    }
}

/// GET /api/reservations
#[utoipa::path(
    get,
    path = "/api/reservations",
    tag = "reservations",
    params(PaginationParams, ReservationListQuery),
    responses(
        (status = 200, body = Paginated<ReservationResponse>),
        (status = 400, body = ErrorBody)
    )
)]
pub async fn list_reservations(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<PaginationParams>,
    ValidQuery(query): ValidQuery<ReservationListQuery>,
) -> Result<Json<Paginated<ReservationResponse>>, ApiError> {
    let filter = ReservationFilter {
        user_id: query.user_id,
        status: query.status,
    };
    let result = ReservationRepo::new(&state.db)
        .list(filter, Pagination::from(params))
        .await?;
    Ok(Json(result.map(ReservationResponse::from)))
}

/// GET /api/reservations/{id}
#[utoipa::path(
    get,
    path = "/api/reservations/{id}",
    tag = "reservations",
    params(("id" = i32, Path, description = "Reservation ID")),
    responses(
        (status = 200, body = ReservationResponse),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_reservation(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<ReservationResponse>, ApiError> {
    let reservation = ReservationRepo::new(&state.db).get(id).await?;
    Ok(Json(ReservationResponse::from(reservation)))
}

/// POST /api/reservations
#[utoipa::path(
    post,
    path = "/api/reservations",
    tag = "reservations",
    request_body = ReservationRequest,
    responses(
        (status = 201, body = ReservationResponse),
        (status = 400, body = ErrorBody),
        (status = 404, description = "Unknown room or user", body = ErrorBody),
        (status = 409, description = "Room unavailable for these dates or guests", body = ErrorBody)
    )
)]
pub async fn create_reservation(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<ReservationRequest>,
) -> Result<(StatusCode, Json<ReservationResponse>), ApiError> {
    let input = req.validate(Utc::now().date_naive())?;
    let reservation = ReservationRepo::new(&state.db).create(&input).await?;
    Ok((StatusCode::CREATED, Json(ReservationResponse::from(reservation))))
}

/// POST /api/reservations/quote - price a stay without booking
#[utoipa::path(
    post,
    path = "/api/reservations/quote",
    tag = "reservations",
    request_body = QuoteRequest,
    responses(
        (status = 200, body = QuoteResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn quote_reservation(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<QuoteRequest>,
) -> Result<Json<QuoteResponse>, ApiError> {
    let stay = StayDates::new(req.check_in_date, req.check_out_date)?;
    let quote = ReservationRepo::new(&state.db)
        .quote(req.room_id, stay)
        .await?;
    Ok(Json(QuoteResponse::from(quote)))
}

/// Reservation routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/reservations",
            get(list_reservations).post(create_reservation),
        )
        .route("/api/reservations/quote", post(quote_reservation))
        .route("/api/reservations/{id}", get(get_reservation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_dates_parse_from_iso() {
        let req: ReservationRequest = serde_json::from_str(
            r#"{"UserID":1,"RoomID":2,"CheckInDate":"2030-05-01","CheckOutDate":"2030-05-04","NumberOfGuests":2}"#,
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2030, 4, 1).unwrap();
        let input = req.validate(today).unwrap();
        assert_eq!(input.stay.nights(), 3);
    }

    #[test]
    fn past_check_in_is_rejected() {
        let req = ReservationRequest {
            user_id: 1,
            room_id: 2,
            check_in_date: NaiveDate::from_ymd_opt(2030, 3, 1).unwrap(),
            check_out_date: NaiveDate::from_ymd_opt(2030, 3, 2).unwrap(),
            number_of_guests: 1,
        };
        let today = NaiveDate::from_ymd_opt(2030, 4, 1).unwrap();
        assert!(matches!(req.validate(today), Err(ApiError::Validation(_))));
    }
}
