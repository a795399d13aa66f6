//! Room type ↔ amenity link endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::amenities::AmenityResponse;
use super::room_types::RoomTypeResponse;
use crate::db::repos::RoomAmenityRepo;
use crate::http::error::{ApiError, ErrorBody};
use crate::http::extractors::{ValidId, ValidIdPair};
use crate::http::server::AppState;

/// Link response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RoomAmenityResponse {
    #[serde(rename = "RoomTypeID")]
    pub room_type_id: i32,
    #[serde(rename = "AmenityID")]
    pub amenity_id: i32,
}

/// GET /api/roomtypes/{id}/amenities
#[utoipa::path(
    get,
    path = "/api/roomtypes/{id}/amenities",
    tag = "room amenities",
    params(("id" = i32, Path, description = "Room type ID")),
    responses(
        (status = 200, body = [AmenityResponse]),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn list_room_type_amenities(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Vec<AmenityResponse>>, ApiError> {
    let amenities = RoomAmenityRepo::new(&state.db)
        .amenities_for_room_type(id)
        .await?;
    Ok(Json(amenities.into_iter().map(AmenityResponse::from).collect()))
}

/// GET /api/amenities/{id}/roomtypes
#[utoipa::path(
    get,
    path = "/api/amenities/{id}/roomtypes",
    tag = "room amenities",
    params(("id" = i32, Path, description = "Amenity ID")),
    responses(
        (status = 200, body = [RoomTypeResponse]),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn list_amenity_room_types(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<Vec<RoomTypeResponse>>, ApiError> {
    let room_types = RoomAmenityRepo::new(&state.db)
        .room_types_for_amenity(id)
        .await?;
    Ok(Json(room_types.into_iter().map(RoomTypeResponse::from).collect()))
}

/// PUT /api/roomtypes/{id}/amenities/{amenity_id} - 201 when new, 200 when already linked
#[utoipa::path(
    put,
    path = "/api/roomtypes/{id}/amenities/{amenity_id}",
    tag = "room amenities",
    params(
        ("id" = i32, Path, description = "Room type ID"),
        ("amenity_id" = i32, Path, description = "Amenity ID")
    ),
    responses(
        (status = 201, body = RoomAmenityResponse),
        (status = 200, description = "Already linked", body = RoomAmenityResponse),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn link_amenity(
    State(state): State<Arc<AppState>>,
    ValidIdPair(room_type_id, amenity_id): ValidIdPair,
) -> Result<(StatusCode, Json<RoomAmenityResponse>), ApiError> {
    let created = RoomAmenityRepo::new(&state.db)
        .add(room_type_id, amenity_id)
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(RoomAmenityResponse {
            room_type_id,
            amenity_id,
        }),
    ))
}

/// DELETE /api/roomtypes/{id}/amenities/{amenity_id}
#[utoipa::path(
    delete,
    path = "/api/roomtypes/{id}/amenities/{amenity_id}",
    tag = "room amenities",
    params(
        ("id" = i32, Path, description = "Room type ID"),
        ("amenity_id" = i32, Path, description = "Amenity ID")
    ),
    responses((status = 204), (status = 404, body = ErrorBody))
)]
pub async fn unlink_amenity(
    State(state): State<Arc<AppState>>,
    ValidIdPair(room_type_id, amenity_id): ValidIdPair,
) -> Result<StatusCode, ApiError> {
    RoomAmenityRepo::new(&state.db)
        .remove(room_type_id, amenity_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Link routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/roomtypes/{id}/amenities", get(list_room_type_amenities))
        .route(
            "/api/roomtypes/{id}/amenities/{amenity_id}",
            put(link_amenity).delete(unlink_amenity),
        )
        .route("/api/amenities/{id}/roomtypes", get(list_amenity_room_types))
}
