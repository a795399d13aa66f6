//! Room type endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ActiveQuery;
use crate::db::repos::{RoomType, RoomTypeRepo};
use crate::http::error::{ApiError, ErrorBody};
use crate::http::extractors::{ValidId, ValidJson, ValidQuery};
use crate::http::server::AppState;
use crate::models::{Paginated, Pagination, PaginationParams, RoomTypeInput};

/// Create or replace a room type
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RoomTypeRequest {
    pub type_name: String,
    pub accessibility_features: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl RoomTypeRequest {
    fn validate(&self) -> Result<RoomTypeInput, ApiError> {
        Ok(RoomTypeInput::new(
            &self.type_name,
            self.accessibility_features.as_deref(),
            self.description.as_deref(),
            self.is_active,
        )?)
    }
}

/// Activation toggle
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ActivationRequest {
    pub is_active: bool,
}

/// Room type response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct RoomTypeResponse {
    #[serde(rename = "RoomTypeID")]
    pub room_type_id: i32,
    pub type_name: String,
    pub accessibility_features: String,
    pub description: String,
    pub is_active: bool,
}

impl From<RoomType> for RoomTypeResponse {
    fn from(rt: RoomType) -> Self {
        Self {
            room_type_id: rt.room_type_id,
            type_name: rt.type_name,
            accessibility_features: rt.accessibility_features,
            description: rt.description,
            is_active: rt.is_active,
        }
    }
}

/// GET /api/roomtypes
#[utoipa::path(
    get,
    path = "/api/roomtypes",
    tag = "room types",
    params(PaginationParams, ActiveQuery),
    responses((status = 200, body = Paginated<RoomTypeResponse>))
)]
pub async fn list_room_types(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<PaginationParams>,
    ValidQuery(filter): ValidQuery<ActiveQuery>,
) -> Result<Json<Paginated<RoomTypeResponse>>, ApiError> {
    let result = RoomTypeRepo::new(&state.db)
        .list(filter.is_active, Pagination::from(params))
        .await?;
    Ok(Json(result.map(RoomTypeResponse::from)))
}

/// GET /api/roomtypes/{id}
#[utoipa::path(
    get,
    path = "/api/roomtypes/{id}",
    tag = "room types",
    params(("id" = i32, Path, description = "Room type ID")),
    responses(
        (status = 200, body = RoomTypeResponse),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_room_type(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<RoomTypeResponse>, ApiError> {
    let room_type = RoomTypeRepo::new(&state.db).get(id).await?;
    Ok(Json(RoomTypeResponse::from(room_type)))
}

/// POST /api/roomtypes
#[utoipa::path(
    post,
    path = "/api/roomtypes",
    tag = "room types",
    request_body = RoomTypeRequest,
    responses(
        (status = 201, body = RoomTypeResponse),
        (status = 400, body = ErrorBody),
        (status = 409, body = ErrorBody)
    )
)]
pub async fn create_room_type(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<RoomTypeRequest>,
) -> Result<(StatusCode, Json<RoomTypeResponse>), ApiError> {
    let input = req.validate()?;
    let room_type = RoomTypeRepo::new(&state.db).create(&input).await?;
    Ok((StatusCode::CREATED, Json(RoomTypeResponse::from(room_type))))
}

/// PUT /api/roomtypes/{id}
#[utoipa::path(
    put,
    path = "/api/roomtypes/{id}",
    tag = "room types",
    params(("id" = i32, Path, description = "Room type ID")),
    request_body = RoomTypeRequest,
    responses(
        (status = 200, body = RoomTypeResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 409, body = ErrorBody)
    )
)]
pub async fn update_room_type(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(req): ValidJson<RoomTypeRequest>,
) -> Result<Json<RoomTypeResponse>, ApiError> {
    let input = req.validate()?;
    let room_type = RoomTypeRepo::new(&state.db).update(id, &input).await?;
    Ok(Json(RoomTypeResponse::from(room_type)))
}

/// PUT /api/roomtypes/{id}/active - activate or deactivate
#[utoipa::path(
    put,
    path = "/api/roomtypes/{id}/active",
    tag = "room types",
    params(("id" = i32, Path, description = "Room type ID")),
    request_body = ActivationRequest,
    responses(
        (status = 200, body = RoomTypeResponse),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn set_room_type_active(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(req): ValidJson<ActivationRequest>,
) -> Result<Json<RoomTypeResponse>, ApiError> {
    let room_type = RoomTypeRepo::new(&state.db)
        .set_active(id, req.is_active)
        .await?;
    tracing::info!(room_type_id = id, is_active = req.is_active, "room type activation changed");
    Ok(Json(RoomTypeResponse::from(room_type)))
}

/// DELETE /api/roomtypes/{id}
#[utoipa::path(
    delete,
    path = "/api/roomtypes/{id}",
    tag = "room types",
    params(("id" = i32, Path, description = "Room type ID")),
    responses(
        (status = 204),
        (status = 404, body = ErrorBody),
        (status = 409, description = "Rooms still use this type", body = ErrorBody)
    )
)]
pub async fn delete_room_type(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    RoomTypeRepo::new(&state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Room type routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/roomtypes", get(list_room_types).post(create_room_type))
        .route(
            "/api/roomtypes/{id}",
            get(get_room_type)
                .put(update_room_type)
                .delete(delete_room_type),
        )
        .route("/api/roomtypes/{id}/active", put(set_room_type_active))
}
