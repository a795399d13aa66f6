//! Amenity endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::ActiveQuery;
use crate::db::repos::{Amenity, AmenityRepo};
use crate::http::error::{ApiError, ErrorBody};
use crate::http::extractors::{ValidId, ValidJson, ValidQuery};
use crate::http::server::AppState;
use crate::models::{AmenityInput, Paginated, Pagination, PaginationParams};

/// Create or replace an amenity
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct AmenityRequest {
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

impl AmenityRequest {
    fn validate(&self) -> Result<AmenityInput, ApiError> {
        Ok(AmenityInput::new(
            &self.name,
            self.description.as_deref(),
            self.is_active,
        )?)
    }
}

/// Amenity response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct AmenityResponse {
    #[serde(rename = "AmenityID")]
    pub amenity_id: i32,
    pub name: String,
    pub description: String,
    pub is_active: bool,
}

impl From<Amenity> for AmenityResponse {
    fn from(a: Amenity) -> Self {
        Self {
            amenity_id: a.amenity_id,
            name: a.name,
            description: a.description,
            is_active: a.is_active,
        }
    }
}

/// GET /api/amenities
#[utoipa::path(
    get,
    path = "/api/amenities",
    tag = "amenities",
    params(PaginationParams, ActiveQuery),
    responses((status = 200, body = Paginated<AmenityResponse>))
)]
pub async fn list_amenities(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<PaginationParams>,
    ValidQuery(filter): ValidQuery<ActiveQuery>,
) -> Result<Json<Paginated<AmenityResponse>>, ApiError> {
    let result = AmenityRepo::new(&state.db)
        .list(filter.is_active, Pagination::from(params))
        .await?;
    Ok(Json(result.map(AmenityResponse::from)))
}

/// GET /api/amenities/{id}
#[utoipa::path(
    get,
    path = "/api/amenities/{id}",
    tag = "amenities",
    params(("id" = i32, Path, description = "Amenity ID")),
    responses(
        (status = 200, body = AmenityResponse),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_amenity(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<AmenityResponse>, ApiError> {
    let amenity = AmenityRepo::new(&state.db).get(id).await?;
    Ok(Json(AmenityResponse::from(amenity)))
}

/// POST /api/amenities
#[utoipa::path(
    post,
    path = "/api/amenities",
    tag = "amenities",
    request_body = AmenityRequest,
    responses(
        (status = 201, body = AmenityResponse),
        (status = 400, body = ErrorBody),
        (status = 409, body = ErrorBody)
    )
)]
pub async fn create_amenity(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<AmenityRequest>,
) -> Result<(StatusCode, Json<AmenityResponse>), ApiError> {
    let input = req.validate()?;
    let amenity = AmenityRepo::new(&state.db).create(&input).await?;
    Ok((StatusCode::CREATED, Json(AmenityResponse::from(amenity))))
}

/// PUT /api/amenities/{id}
#[utoipa::path(
    put,
    path = "/api/amenities/{id}",
    tag = "amenities",
    params(("id" = i32, Path, description = "Amenity ID")),
    request_body = AmenityRequest,
    responses(
        (status = 200, body = AmenityResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 409, body = ErrorBody)
    )
)]
pub async fn update_amenity(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(req): ValidJson<AmenityRequest>,
) -> Result<Json<AmenityResponse>, ApiError> {
    let input = req.validate()?;
    let amenity = AmenityRepo::new(&state.db).update(id, &input).await?;
    Ok(Json(AmenityResponse::from(amenity)))
}

/// DELETE /api/amenities/{id} - also drops its room type links
#[utoipa::path(
    delete,
    path = "/api/amenities/{id}",
    tag = "amenities",
    params(("id" = i32, Path, description = "Amenity ID")),
    responses((status = 204), (status = 404, body = ErrorBody))
)]
pub async fn delete_amenity(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    AmenityRepo::new(&state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Amenity routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/amenities", get(list_amenities).post(create_amenity))
        .route(
            "/api/amenities/{id}",
            get(get_amenity).put(update_amenity).delete(delete_amenity),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_is_optional() {
        let req: AmenityRequest = serde_json::from_str(r#"{"Name":"Minibar"}"#).unwrap();
        let input = req.validate().unwrap();
        assert_eq!(input.description, "");
        assert!(input.is_active);
    }

    #[test]
    fn blank_name_is_rejected() {
        let req: AmenityRequest = serde_json::from_str(r#"{"Name":"   "}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
