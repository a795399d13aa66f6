//! Room endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::db::repos::{Room, RoomFilter, RoomRepo};
use crate::http::error::{ApiError, ErrorBody};
use crate::http::extractors::{ValidId, ValidJson, ValidQuery};
use crate::http::server::AppState;
use crate::models::{Paginated, Pagination, PaginationParams, RoomFields, RoomInput, RoomStatus};

/// Create or replace a room
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RoomRequest {
    pub room_number: String,
    #[serde(rename = "RoomTypeID")]
    pub room_type_id: i32,
    pub price: f64,
    pub bed_type: String,
    pub view_type: Option<String>,
    pub max_occupancy: i32,
    pub status: Option<RoomStatus>,
    pub is_active: Option<bool>,
}

impl RoomRequest {
    fn validate(&self) -> Result<RoomInput, ApiError> {
        Ok(RoomInput::new(RoomFields {
            room_number: &self.room_number,
            room_type_id: self.room_type_id,
            price: self.price,
            bed_type: &self.bed_type,
            view_type: self.view_type.as_deref(),
            max_occupancy: self.max_occupancy,
            status: self.status,
            is_active: self.is_active,
        })?)
    }
}

/// Room list filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "PascalCase")]
#[into_params(parameter_in = Query)]
pub struct RoomListQuery {
    #[serde(rename = "RoomTypeID")]
    pub room_type_id: Option<i32>,
    pub status: Option<RoomStatus>,
    pub is_active: Option<bool>,
}

impl From<RoomListQuery> for RoomFilter {
    fn from(q: RoomListQuery) -> Self {
        Self {
            room_type_id: q.room_type_id,
            status: q.status,
            is_active: q.is_active,
        }
    }
}

/// Room response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RoomResponse {
    #[serde(rename = "RoomID")]
    pub room_id: i32,
    pub room_number: String,
    #[serde(rename = "RoomTypeID")]
    pub room_type_id: i32,
    pub price: f64,
    pub bed_type: String,
    pub view_type: String,
    pub max_occupancy: i32,
    pub status: RoomStatus,
    pub is_active: bool,
}

impl From<Room> for RoomResponse {
    fn from(r: Room) -> Self {
        Self {
            room_id: r.room_id,
            room_number: r.room_number,
            room_type_id: r.room_type_id,
            price: r.price,
            bed_type: r.bed_type,
            view_type: r.view_type,
            max_occupancy: r.max_occupancy,
            status: r.status,
            is_active: r.is_active,
        }
    }
}

/// GET /api/rooms
#[utoipa::path(
    get,
    path = "/api/rooms",
    tag = "rooms",
    params(PaginationParams, RoomListQuery),
    responses(
        (status = 200, body = Paginated<RoomResponse>),
        (status = 400, body = ErrorBody)
    )
)]
pub async fn list_rooms(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<PaginationParams>,
    ValidQuery(query): ValidQuery<RoomListQuery>,
) -> Result<Json<Paginated<RoomResponse>>, ApiError> {
    let result = RoomRepo::new(&state.db)
        .list(RoomFilter::from(query), Pagination::from(params))
        .await?;
    Ok(Json(result.map(RoomResponse::from)))
}

/// GET /api/rooms/{id}
#[utoipa::path(
    get,
    path = "/api/rooms/{id}",
    tag = "rooms",
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 200, body = RoomResponse),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<RoomResponse>, ApiError> {
    let room = RoomRepo::new(&state.db).get(id).await?;
    Ok(Json(RoomResponse::from(room)))
}

/// POST /api/rooms
#[utoipa::path(
    post,
    path = "/api/rooms",
    tag = "rooms",
    request_body = RoomRequest,
    responses(
        (status = 201, body = RoomResponse),
        (status = 400, body = ErrorBody),
        (status = 404, description = "Unknown room type", body = ErrorBody),
        (status = 409, body = ErrorBody)
    )
)]
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<RoomRequest>,
) -> Result<(StatusCode, Json<RoomResponse>), ApiError> {
    let input = req.validate()?;
    let room = RoomRepo::new(&state.db).create(&input).await?;
    Ok((StatusCode::CREATED, Json(RoomResponse::from(room))))
}

/// PUT /api/rooms/{id}
#[utoipa::path(
    put,
    path = "/api/rooms/{id}",
    tag = "rooms",
    params(("id" = i32, Path, description = "Room ID")),
    request_body = RoomRequest,
    responses(
        (status = 200, body = RoomResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 409, body = ErrorBody)
    )
)]
pub async fn update_room(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(req): ValidJson<RoomRequest>,
) -> Result<Json<RoomResponse>, ApiError> {
    let input = req.validate()?;
    let room = RoomRepo::new(&state.db).update(id, &input).await?;
    Ok(Json(RoomResponse::from(room)))
}

/// DELETE /api/rooms/{id}
#[utoipa::path(
    delete,
    path = "/api/rooms/{id}",
    tag = "rooms",
    params(("id" = i32, Path, description = "Room ID")),
    responses(
        (status = 204),
        (status = 404, body = ErrorBody),
        (status = 409, description = "Room has reservations", body = ErrorBody)
    )
)]
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    RoomRepo::new(&state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Room routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/rooms", get(list_rooms).post(create_room))
        .route(
            "/api/rooms/{id}",
            get(get_room).put(update_room).delete(delete_room),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_reads_id_casing() {
        let req: RoomRequest = serde_json::from_str(
            r#"{"RoomNumber":"101","RoomTypeID":1,"Price":120.5,"BedType":"Queen","MaxOccupancy":2}"#,
        )
        .unwrap();
        let input = req.validate().unwrap();
        assert_eq!(input.room_type_id, 1);
        assert_eq!(input.status, RoomStatus::Available);
    }

    #[test]
    fn unknown_status_fails_to_parse() {
        let parsed: Result<RoomRequest, _> = serde_json::from_str(
            r#"{"RoomNumber":"101","RoomTypeID":1,"Price":1,"BedType":"Q","MaxOccupancy":2,"Status":"Haunted"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let req = RoomRequest {
            room_number: "101".into(),
            room_type_id: 1,
            price: 0.0,
            bed_type: "Queen".into(),
            view_type: None,
            max_occupancy: 2,
            status: None,
            is_active: None,
        };
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
    }
}
