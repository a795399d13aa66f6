//! Room type ↔ amenity links
//!
//! The junction row is the whole entity, so there is no update: linking is
//! idempotent and unlinking reports NotFound when there was nothing to remove.

use super::{Amenity, DbError, RoomType};
use crate::db::ConnectionFactory;

/// Room amenity repository
pub struct RoomAmenityRepo<'a> {
    db: &'a ConnectionFactory,
}

impl<'a> RoomAmenityRepo<'a> {
    pub fn new(db: &'a ConnectionFactory) -> Self {
        Self { db }
    }

    /// Link an amenity to a room type.
    ///
    /// Returns `true` when a new link was written, `false` when it already existed.
    /// Missing room type or amenity is reported as NotFound.
    pub async fn add(&self, room_type_id: i32, amenity_id: i32) -> Result<bool, DbError> {
        let mut conn = self.db.connect().await?;

        // Single statement: resolve both parents and insert only when both exist
        let row: (bool, bool, bool) = sqlx::query_as(
            r#"
            WITH parents AS (
                SELECT
                    EXISTS(SELECT 1 FROM room_types WHERE room_type_id = $1) AS has_room_type,
                    EXISTS(SELECT 1 FROM amenities WHERE amenity_id = $2) AS has_amenity
            ),
            inserted AS (
                INSERT INTO room_amenities (room_type_id, amenity_id)
                SELECT $1, $2 FROM parents WHERE has_room_type AND has_amenity
                ON CONFLICT DO NOTHING
                RETURNING 1
            )
            SELECT has_room_type, has_amenity, EXISTS(SELECT 1 FROM inserted)
            FROM parents
            "#,
        )
        .bind(room_type_id)
        .bind(amenity_id)
        .fetch_one(&mut *conn)
        .await?;

        match row {
            (false, _, _) => Err(DbError::not_found("room type", room_type_id)),
            (_, false, _) => Err(DbError::not_found("amenity", amenity_id)),
            (true, true, inserted) => Ok(inserted),
        }
    }

    /// Remove a link.
    pub async fn remove(&self, room_type_id: i32, amenity_id: i32) -> Result<(), DbError> {
        let mut conn = self.db.connect().await?;

        let result = sqlx::query(
            "DELETE FROM room_amenities WHERE room_type_id = $1 AND amenity_id = $2",
        )
        .bind(room_type_id)
        .bind(amenity_id)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "room amenity",
                format!("{}/{}", room_type_id, amenity_id),
            ));
        }
        Ok(())
    }

    /// Amenities offered by a room type, by name.
    ///
    /// An unknown room type is NotFound; a known one without amenities is an empty list.
    pub async fn amenities_for_room_type(&self, room_type_id: i32) -> Result<Vec<Amenity>, DbError> {
        let mut conn = self.db.connect().await?;

        let rows: Vec<(Option<i32>, Option<String>, Option<String>, Option<bool>)> = sqlx::query_as(
            r#"
            SELECT a.amenity_id, a.name, a.description, a.is_active
            FROM room_types rt
            LEFT JOIN room_amenities ra ON ra.room_type_id = rt.room_type_id
            LEFT JOIN amenities a ON a.amenity_id = ra.amenity_id
            WHERE rt.room_type_id = $1
            ORDER BY a.name
            "#,
        )
        .bind(room_type_id)
        .fetch_all(&mut *conn)
        .await?;

        if rows.is_empty() {
            return Err(DbError::not_found("room type", room_type_id));
        }

        Ok(rows
            .into_iter()
            .filter_map(|(id, name, description, is_active)| {
                Some(Amenity {
                    amenity_id: id?,
                    name: name?,
                    description: description.unwrap_or_default(),
                    is_active: is_active.unwrap_or(false),
                })
            })
            .collect())
    }

    /// Room types offering an amenity, by name.
    pub async fn room_types_for_amenity(&self, amenity_id: i32) -> Result<Vec<RoomType>, DbError> {
        let mut conn = self.db.connect().await?;

        let rows: Vec<(Option<i32>, Option<String>, Option<String>, Option<String>, Option<bool>)> =
            sqlx::query_as(
                r#"
                SELECT rt.room_type_id, rt.type_name, rt.accessibility_features,
                       rt.description, rt.is_active
                FROM amenities a
                LEFT JOIN room_amenities ra ON ra.amenity_id = a.amenity_id
                LEFT JOIN room_types rt ON rt.room_type_id = ra.room_type_id
                WHERE a.amenity_id = $1
                ORDER BY rt.type_name
                "#,
            )
            .bind(amenity_id)
            .fetch_all(&mut *conn)
            .await?;

        if rows.is_empty() {
            return Err(DbError::not_found("amenity", amenity_id));
        }

        Ok(rows
            .into_iter()
            .filter_map(|(id, type_name, features, description, is_active)| {
                Some(RoomType {
                    room_type_id: id?,
                    type_name: type_name?,
                    accessibility_features: features.unwrap_or_default(),
                    description: description.unwrap_or_default(),
                    is_active: is_active.unwrap_or(false),
                })
            })
            .collect())
    }
}
