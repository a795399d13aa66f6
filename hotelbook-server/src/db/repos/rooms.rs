//! Room repository

use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};

use super::{decode_enum, still_referenced, DbError};
use crate::db::ConnectionFactory;
use crate::models::{Paginated, Pagination, RoomInput, RoomStatus};

/// Room record from database
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub room_id: i32,
    pub room_number: String,
    pub room_type_id: i32,
    pub price: f64,
    pub bed_type: String,
    pub view_type: String,
    pub max_occupancy: i32,
    pub status: RoomStatus,
    pub is_active: bool,
}

impl<'r> FromRow<'r, PgRow> for Room {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            room_id: row.try_get("room_id")?,
            room_number: row.try_get("room_number")?,
            room_type_id: row.try_get("room_type_id")?,
            price: row.try_get("price")?,
            bed_type: row.try_get("bed_type")?,
            view_type: row.try_get("view_type")?,
            max_occupancy: row.try_get("max_occupancy")?,
            status: decode_enum(row, "status")?,
            is_active: row.try_get("is_active")?,
        })
    }
}

/// List filter; every field narrows the result when set
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomFilter {
    pub room_type_id: Option<i32>,
    pub status: Option<RoomStatus>,
    pub is_active: Option<bool>,
}

const ROOM_COLUMNS: &str =
    "room_id, room_number, room_type_id, price, bed_type, view_type, max_occupancy, status, is_active";

const ROOM_FILTER: &str = "($1::INT IS NULL OR room_type_id = $1) \
     AND ($2::TEXT IS NULL OR status = $2) \
     AND ($3::BOOLEAN IS NULL OR is_active = $3)";

/// Room repository
pub struct RoomRepo<'a> {
    db: &'a ConnectionFactory,
}

impl<'a> RoomRepo<'a> {
    pub fn new(db: &'a ConnectionFactory) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: i32) -> Result<Room, DbError> {
        let mut conn = self.db.connect().await?;

        sqlx::query_as::<_, Room>(&format!(
            "SELECT {} FROM rooms WHERE room_id = $1",
            ROOM_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("room", id))
    }

    /// List rooms ordered by room number.
    pub async fn list(&self, filter: RoomFilter, page: Pagination) -> Result<Paginated<Room>, DbError> {
        let mut conn = self.db.connect().await?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT {}, COUNT(*) OVER() AS total
            FROM rooms
            WHERE {}
            ORDER BY room_number
            LIMIT $4 OFFSET $5
            "#,
            ROOM_COLUMNS, ROOM_FILTER
        ))
        .bind(filter.room_type_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(filter.is_active)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *conn)
        .await?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total")?,
            // An empty page past the end carries no window count
            None if page.page > 1 => {
                sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM rooms WHERE {}", ROOM_FILTER))
                    .bind(filter.room_type_id)
                    .bind(filter.status.map(|s| s.as_str()))
                    .bind(filter.is_active)
                    .fetch_one(&mut *conn)
                    .await?
            }
            None => 0,
        };
        let items = rows
            .iter()
            .map(Room::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    /// Create a room. An unknown `room_type_id` is rejected by the foreign key.
    pub async fn create(&self, input: &RoomInput) -> Result<Room, DbError> {
        let mut conn = self.db.connect().await?;

        let room = sqlx::query_as::<_, Room>(&format!(
            r#"
            INSERT INTO rooms
                (room_number, room_type_id, price, bed_type, view_type, max_occupancy, status, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            ROOM_COLUMNS
        ))
        .bind(&input.room_number)
        .bind(input.room_type_id)
        .bind(input.price)
        .bind(&input.bed_type)
        .bind(&input.view_type)
        .bind(input.max_occupancy)
        .bind(input.status.as_str())
        .bind(input.is_active)
        .fetch_one(&mut *conn)
        .await
        .map_err(unknown_room_type(input.room_type_id))?;

        tracing::debug!(room_id = room.room_id, room_number = %room.room_number, "room created");
        Ok(room)
    }

    pub async fn update(&self, id: i32, input: &RoomInput) -> Result<Room, DbError> {
        let mut conn = self.db.connect().await?;

        sqlx::query_as::<_, Room>(&format!(
            r#"
            UPDATE rooms
            SET room_number = $2, room_type_id = $3, price = $4, bed_type = $5,
                view_type = $6, max_occupancy = $7, status = $8, is_active = $9
            WHERE room_id = $1
            RETURNING {}
            "#,
            ROOM_COLUMNS
        ))
        .bind(id)
        .bind(&input.room_number)
        .bind(input.room_type_id)
        .bind(input.price)
        .bind(&input.bed_type)
        .bind(&input.view_type)
        .bind(input.max_occupancy)
        .bind(input.status.as_str())
        .bind(input.is_active)
        .fetch_optional(&mut *conn)
        .await
        .map_err(unknown_room_type(input.room_type_id))?
        .ok_or_else(|| DbError::not_found("room", id))
    }

    /// Delete a room. Rooms with reservations are rejected; deactivate them instead.
    pub async fn delete(&self, id: i32) -> Result<(), DbError> {
        let mut conn = self.db.connect().await?;

        let result = sqlx::query("DELETE FROM rooms WHERE room_id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(still_referenced("room", id))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("room", id));
        }
        Ok(())
    }
}

/// On insert/update a foreign-key failure can only mean the room type is missing.
fn unknown_room_type(room_type_id: i32) -> impl FnOnce(sqlx::Error) -> DbError {
    move |e| match DbError::from(e) {
        DbError::Rejected(_) => DbError::not_found("room type", room_type_id),
        other => other,
    }
}
