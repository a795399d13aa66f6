//! Room type repository

use sqlx::{FromRow, Row};

use super::{still_referenced, DbError};
use crate::db::ConnectionFactory;
use crate::models::{Paginated, Pagination, RoomTypeInput};

/// Room type record from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct RoomType {
    pub room_type_id: i32,
    pub type_name: String,
    pub accessibility_features: String,
    pub description: String,
    pub is_active: bool,
}

const ACTIVE_FILTER: &str = "($1::BOOLEAN IS NULL OR is_active = $1)";

/// Room type repository
pub struct RoomTypeRepo<'a> {
    db: &'a ConnectionFactory,
}

impl<'a> RoomTypeRepo<'a> {
    pub fn new(db: &'a ConnectionFactory) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: i32) -> Result<RoomType, DbError> {
        let mut conn = self.db.connect().await?;

        sqlx::query_as::<_, RoomType>(
            r#"
            SELECT room_type_id, type_name, accessibility_features, description, is_active
            FROM room_types
            WHERE room_type_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("room type", id))
    }

    /// List room types ordered by name.
    pub async fn list(
        &self,
        is_active: Option<bool>,
        page: Pagination,
    ) -> Result<Paginated<RoomType>, DbError> {
        let mut conn = self.db.connect().await?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT
                room_type_id, type_name, accessibility_features, description, is_active,
                COUNT(*) OVER() AS total
            FROM room_types
            WHERE {}
            ORDER BY type_name
            LIMIT $2 OFFSET $3
            "#,
            ACTIVE_FILTER
        ))
        .bind(is_active)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *conn)
        .await?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total")?,
            // An empty page past the end carries no window count
            None if page.page > 1 => {
                sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM room_types WHERE {}", ACTIVE_FILTER))
                    .bind(is_active)
                    .fetch_one(&mut *conn)
                    .await?
            }
            None => 0,
        };
        let items = rows
            .iter()
            .map(RoomType::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    pub async fn create(&self, input: &RoomTypeInput) -> Result<RoomType, DbError> {
        let mut conn = self.db.connect().await?;

        let room_type = sqlx::query_as::<_, RoomType>(
            r#"
            INSERT INTO room_types (type_name, accessibility_features, description, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING room_type_id, type_name, accessibility_features, description, is_active
            "#,
        )
        .bind(&input.type_name)
        .bind(&input.accessibility_features)
        .bind(&input.description)
        .bind(input.is_active)
        .fetch_one(&mut *conn)
        .await?;

        tracing::debug!(room_type_id = room_type.room_type_id, "room type created");
        Ok(room_type)
    }

    pub async fn update(&self, id: i32, input: &RoomTypeInput) -> Result<RoomType, DbError> {
        let mut conn = self.db.connect().await?;

        sqlx::query_as::<_, RoomType>(
            r#"
            UPDATE room_types
            SET type_name = $2, accessibility_features = $3, description = $4, is_active = $5
            WHERE room_type_id = $1
            RETURNING room_type_id, type_name, accessibility_features, description, is_active
            "#,
        )
        .bind(id)
        .bind(&input.type_name)
        .bind(&input.accessibility_features)
        .bind(&input.description)
        .bind(input.is_active)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("room type", id))
    }

    /// Activate or deactivate a room type without touching its other fields.
    pub async fn set_active(&self, id: i32, is_active: bool) -> Result<RoomType, DbError> {
        let mut conn = self.db.connect().await?;

        sqlx::query_as::<_, RoomType>(
            r#"
            UPDATE room_types
            SET is_active = $2
            WHERE room_type_id = $1
            RETURNING room_type_id, type_name, accessibility_features, description, is_active
            "#,
        )
        .bind(id)
        .bind(is_active)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("room type", id))
    }

    /// Delete a room type. Fails with `Rejected` while rooms still use it.
    pub async fn delete(&self, id: i32) -> Result<(), DbError> {
        let mut conn = self.db.connect().await?;

        let result = sqlx::query("DELETE FROM room_types WHERE room_type_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(still_referenced("room type", id))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("room type", id));
        }
        Ok(())
    }
}
