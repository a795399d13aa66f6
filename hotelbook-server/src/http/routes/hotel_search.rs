//! Hotel search endpoints
//!
//! Read-only projections for guests browsing the hotel. Responses use the
//! search DTOs, whose JSON keys keep their declared casing.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::db::repos::HotelSearchRepo;
use crate::dto::{RoomDetailsDto, RoomSearchDto, RoomTypeSearchDto};
use crate::http::error::{ApiError, ErrorBody};
use crate::http::extractors::{ValidId, ValidQuery};
use crate::http::server::AppState;
use crate::models::{
    AvailabilityCriteria, AvailabilityParams, Paginated, Pagination, PaginationParams,
    RoomTypeCriteria,
};

/// Room type search filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "PascalCase")]
#[into_params(parameter_in = Query)]
pub struct RoomTypeSearchQuery {
    /// Case-insensitive part of the type name
    pub type_name: Option<String>,
    /// Only types with accessibility features
    pub accessible: Option<bool>,
}

/// Availability filter; dates must be given together
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "PascalCase")]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub room_type_name: Option<String>,
    pub guests: Option<i32>,
    /// Comma-separated amenity IDs; rooms must offer all of them
    pub amenities: Option<String>,
}

impl AvailabilityQuery {
    fn criteria(&self) -> Result<AvailabilityCriteria, ApiError> {
        Ok(AvailabilityCriteria::new(AvailabilityParams {
            check_in: self.check_in_date,
            check_out: self.check_out_date,
            min_price: self.min_price,
            max_price: self.max_price,
            room_type_name: self.room_type_name.as_deref(),
            guests: self.guests,
            amenities: self.amenities.as_deref(),
        })?)
    }
}

/// GET /api/hotelsearch/roomtypes
#[utoipa::path(
    get,
    path = "/api/hotelsearch/roomtypes",
    tag = "hotel search",
    params(RoomTypeSearchQuery),
    responses(
        (status = 200, body = [RoomTypeSearchDto]),
        (status = 400, body = ErrorBody)
    )
)]
pub async fn search_room_types(
    State(state): State<Arc<AppState>>,
    ValidQuery(query): ValidQuery<RoomTypeSearchQuery>,
) -> Result<Json<Vec<RoomTypeSearchDto>>, ApiError> {
    let criteria = RoomTypeCriteria::new(query.type_name.as_deref(), query.accessible)?;
    let room_types = HotelSearchRepo::new(&state.db).room_types(&criteria).await?;
    Ok(Json(room_types))
}

/// GET /api/hotelsearch/roomtypes/{id}
#[utoipa::path(
    get,
    path = "/api/hotelsearch/roomtypes/{id}",
    tag = "hotel search",
    params(("id" = i32, Path, description = "Room type ID")),
    responses(
        (status = 200, body = RoomTypeSearchDto),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_room_type(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<RoomTypeSearchDto>, ApiError> {
    let room_type = HotelSearchRepo::new(&state.db).room_type(id).await?;
    Ok(Json(room_type))
}

/// GET /api/hotelsearch/availability
#[utoipa::path(
    get,
    path = "/api/hotelsearch/availability",
    tag = "hotel search",
    params(PaginationParams, AvailabilityQuery),
    responses(
        (status = 200, body = Paginated<RoomSearchDto>),
        (status = 400, body = ErrorBody)
    )
)]
pub async fn search_availability(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<PaginationParams>,
    ValidQuery(query): ValidQuery<AvailabilityQuery>,
) -> Result<Json<Paginated<RoomSearchDto>>, ApiError> {
    let criteria = query.criteria()?;
    let rooms = HotelSearchRepo::new(&state.db)
        .available_rooms(&criteria, Pagination::from(params))
        .await?;
    Ok(Json(rooms))
}

/// GET /api/hotelsearch/rooms/{id}
#[utoipa::path(
    get,
    path = "/api/hotelsearch/rooms/{id}",
    tag = "hotel search",
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, body = RoomDetailsDto),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_room_details(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<RoomDetailsDto>, ApiError> {
    let details = HotelSearchRepo::new(&state.db).room_details(id).await?;
    Ok(Json(details))
}

/// Hotel search routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/hotelsearch/roomtypes", get(search_room_types))
        .route("/api/hotelsearch/roomtypes/{id}", get(get_room_type))
        .route("/api/hotelsearch/availability", get(search_availability))
        .route("/api/hotelsearch/rooms/{id}", get(get_room_details))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_sided_date_range_is_rejected() {
        let query = AvailabilityQuery {
            check_in_date: NaiveDate::from_ymd_opt(2030, 1, 1),
            ..Default::default()
        };
        assert!(matches!(query.criteria(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn amenity_list_is_parsed() {
        let query = AvailabilityQuery {
            amenities: Some("4,2,4".into()),
            guests: Some(2),
            ..Default::default()
        };
        let criteria = query.criteria().unwrap();
        assert_eq!(criteria.amenity_ids, vec![2, 4]);
        assert_eq!(criteria.guests, Some(2));
    }
}
