//! User endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::db::repos::{User, UserFilter, UserRepo};
use crate::http::error::{ApiError, ErrorBody};
use crate::http::extractors::{ValidId, ValidJson, ValidQuery};
use crate::http::server::AppState;
use crate::models::{Paginated, Pagination, PaginationParams, Role, UserInput};

/// Create or replace a user
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UserRequest {
    pub email: String,
    pub full_name: String,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

impl UserRequest {
    fn validate(&self) -> Result<UserInput, ApiError> {
        Ok(UserInput::new(
            &self.email,
            &self.full_name,
            self.role,
            self.is_active,
        )?)
    }
}

/// User list filter
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "PascalCase")]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    pub is_active: Option<bool>,
}

/// User response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UserResponse {
    #[serde(rename = "UserID")]
    pub user_id: i32,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            user_id: u.user_id,
            email: u.email,
            full_name: u.full_name,
            role: u.role,
            is_active: u.is_active,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// GET /api/users - list users with pagination
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "users",
    params(PaginationParams, UserListQuery),
    responses(
        (status = 200, body = Paginated<UserResponse>),
        (status = 400, body = ErrorBody)
    )
)]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    ValidQuery(params): ValidQuery<PaginationParams>,
    ValidQuery(query): ValidQuery<UserListQuery>,
) -> Result<Json<Paginated<UserResponse>>, ApiError> {
    let filter = UserFilter {
        is_active: query.is_active,
    };
    let result = UserRepo::new(&state.db)
        .list(filter, Pagination::from(params))
        .await?;

    Ok(Json(result.map(UserResponse::from)))
}

/// GET /api/users/{id}
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, body = UserResponse),
        (status = 404, body = ErrorBody)
    )
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepo::new(&state.db).get(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = UserRequest,
    responses(
        (status = 201, body = UserResponse),
        (status = 400, body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    ValidJson(req): ValidJson<UserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let input = req.validate()?;
    let user = UserRepo::new(&state.db).create(&input).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User ID")),
    request_body = UserRequest,
    responses(
        (status = 200, body = UserResponse),
        (status = 400, body = ErrorBody),
        (status = 404, body = ErrorBody),
        (status = 409, body = ErrorBody)
    )
)]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ValidJson(req): ValidJson<UserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let input = req.validate()?;
    let user = UserRepo::new(&state.db).update(id, &input).await?;
    Ok(Json(UserResponse::from(user)))
}

/// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 204),
        (status = 404, body = ErrorBody),
        (status = 409, description = "User has reservations", body = ErrorBody)
    )
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<StatusCode, ApiError> {
    UserRepo::new(&state.db).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn request_uses_pascal_case() {
        let req: UserRequest = serde_json::from_str(
            r#"{"Email":"a@b.co","FullName":"Ada","Role":"Admin"}"#,
        )
        .unwrap();
        let input = req.validate().unwrap();
        assert_eq!(input.role, Role::Admin);
        assert!(input.is_active);
    }

    #[test]
    fn invalid_request_is_validation_error() {
        let req = UserRequest {
            email: "nope".into(),
            full_name: "Ada".into(),
            role: None,
            is_active: None,
        };
        assert!(matches!(req.validate(), Err(ApiError::Validation(_))));
    }

    #[test]
    fn response_keys() {
        let response = UserResponse::from(User {
            user_id: 3,
            email: "a@b.co".into(),
            full_name: "Ada".into(),
            role: Role::Guest,
            is_active: true,
            created_at: Utc::now(),
        });
        let json = serde_json::to_value(response).unwrap();
        assert_eq!(json["UserID"], 3);
        assert_eq!(json["Role"], "Guest");
        assert!(json.get("CreatedAt").is_some());
    }
}
