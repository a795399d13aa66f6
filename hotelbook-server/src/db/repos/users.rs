//! User repository
//!
//! Plain CRUD. Emails are unique (lowercased before insert), so a duplicate
//! surfaces as `DbError::Conflict` straight from the constraint.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::{decode_enum, still_referenced, DbError};
use crate::db::ConnectionFactory;
use crate::models::{Paginated, Pagination, Role, UserInput};

/// User record from database
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: i32,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for User {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            user_id: row.try_get("user_id")?,
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
            role: decode_enum(row, "role")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// List filter
#[derive(Debug, Clone, Copy, Default)]
pub struct UserFilter {
    pub is_active: Option<bool>,
}

/// List predicates; shared by the page query and its count
const USER_FILTER: &str = "($1::BOOLEAN IS NULL OR is_active = $1)";

/// User repository
pub struct UserRepo<'a> {
    db: &'a ConnectionFactory,
}

impl<'a> UserRepo<'a> {
    pub fn new(db: &'a ConnectionFactory) -> Self {
        Self { db }
    }

    /// Get a single user by ID.
    pub async fn get(&self, id: i32) -> Result<User, DbError> {
        let mut conn = self.db.connect().await?;

        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, full_name, role, is_active, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("user", id))
    }

    /// List users, newest first.
    pub async fn list(&self, filter: UserFilter, page: Pagination) -> Result<Paginated<User>, DbError> {
        let mut conn = self.db.connect().await?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT
                user_id, email, full_name, role, is_active, created_at,
                COUNT(*) OVER() AS total
            FROM users
            WHERE {}
            ORDER BY user_id DESC
            LIMIT $2 OFFSET $3
            "#,
            USER_FILTER
        ))
        .bind(filter.is_active)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *conn)
        .await?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total")?,
            // An empty page past the end carries no window count
            None if page.page > 1 => {
                sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM users WHERE {}", USER_FILTER))
                    .bind(filter.is_active)
                    .fetch_one(&mut *conn)
                    .await?
            }
            None => 0,
        };
        let items = rows
            .iter()
            .map(User::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    /// Create a user; the database assigns `user_id`.
    pub async fn create(&self, input: &UserInput) -> Result<User, DbError> {
        let mut conn = self.db.connect().await?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, full_name, role, is_active)
            VALUES ($1, $2, $3, $4)
            RETURNING user_id, email, full_name, role, is_active, created_at
            "#,
        )
        .bind(input.email.as_str())
        .bind(&input.full_name)
        .bind(input.role.as_str())
        .bind(input.is_active)
        .fetch_one(&mut *conn)
        .await?;

        tracing::debug!(user_id = user.user_id, "user created");
        Ok(user)
    }

    /// Replace a user's editable fields.
    pub async fn update(&self, id: i32, input: &UserInput) -> Result<User, DbError> {
        let mut conn = self.db.connect().await?;

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = $2, full_name = $3, role = $4, is_active = $5
            WHERE user_id = $1
            RETURNING user_id, email, full_name, role, is_active, created_at
            "#,
        )
        .bind(id)
        .bind(input.email.as_str())
        .bind(&input.full_name)
        .bind(input.role.as_str())
        .bind(input.is_active)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("user", id))
    }

    /// Delete a user. Users with reservations cannot be deleted; deactivate them instead.
    pub async fn delete(&self, id: i32) -> Result<(), DbError> {
        let mut conn = self.db.connect().await?;

        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(still_referenced("user", id))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("user", id));
        }
        Ok(())
    }
}
