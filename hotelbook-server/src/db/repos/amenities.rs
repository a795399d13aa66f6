//! Amenity repository

use sqlx::{FromRow, Row};

use super::DbError;
use crate::db::ConnectionFactory;
use crate::models::{AmenityInput, Paginated, Pagination};

/// Amenity record from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Amenity {
    pub amenity_id: i32,
    pub name: String,
    pub description: String,
    pub is_active: bool,
}

const ACTIVE_FILTER: &str = "($1::BOOLEAN IS NULL OR is_active = $1)";

/// Amenity repository
pub struct AmenityRepo<'a> {
    db: &'a ConnectionFactory,
}

impl<'a> AmenityRepo<'a> {
    pub fn new(db: &'a ConnectionFactory) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: i32) -> Result<Amenity, DbError> {
        let mut conn = self.db.connect().await?;

        sqlx::query_as::<_, Amenity>(
            "SELECT amenity_id, name, description, is_active FROM amenities WHERE amenity_id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("amenity", id))
    }

    pub async fn list(
        &self,
        is_active: Option<bool>,
        page: Pagination,
    ) -> Result<Paginated<Amenity>, DbError> {
        let mut conn = self.db.connect().await?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT amenity_id, name, description, is_active, COUNT(*) OVER() AS total
            FROM amenities
            WHERE {}
            ORDER BY name
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
                sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM amenities WHERE {}", ACTIVE_FILTER))
                    .bind(is_active)
                    .fetch_one(&mut *conn)
                    .await?
            }
            None => 0,
        };
        let items = rows
            .iter()
            .map(Amenity::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    pub async fn create(&self, input: &AmenityInput) -> Result<Amenity, DbError> {
        let mut conn = self.db.connect().await?;

        let amenity = sqlx::query_as::<_, Amenity>(
            r#"
            INSERT INTO amenities (name, description, is_active)
            VALUES ($1, $2, $3)
            RETURNING amenity_id, name, description, is_active
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.is_active)
        .fetch_one(&mut *conn)
        .await?;

        Ok(amenity)
    }

    pub async fn update(&self, id: i32, input: &AmenityInput) -> Result<Amenity, DbError> {
        let mut conn = self.db.connect().await?;

        sqlx::query_as::<_, Amenity>(
            r#"
            UPDATE amenities
            SET name = $2, description = $3, is_active = $4
            WHERE amenity_id = $1
            RETURNING amenity_id, name, description, is_active
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.is_active)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("amenity", id))
    }

    /// Delete an amenity; its room type links go with it (ON DELETE CASCADE).
    pub async fn delete(&self, id: i32) -> Result<(), DbError> {
        let mut conn = self.db.connect().await?;

        let result = sqlx::query("DELETE FROM amenities WHERE amenity_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("amenity", id));
        }
        Ok(())
    }
}
