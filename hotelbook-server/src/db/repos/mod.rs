//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Borrows the connection factory for the lifetime of one request
//! - Acquires a connection per operation and releases it on drop
//! - Uses JOINs for composite reads (no N+1)
//! - Relies on DB constraints for uniqueness (no check-then-insert)
//! - Uses transactions only for multi-step writes (reservations, cancellations)

use std::str::FromStr;

use sqlx::postgres::PgRow;
use sqlx::Row;

use crate::models::ValidationError;

pub mod users;
pub mod room_types;
pub mod rooms;
pub mod amenities;
pub mod room_amenities;
pub mod hotel_search;
pub mod reservations;
pub mod cancellations;

pub use users::{User, UserFilter, UserRepo};
pub use room_types::{RoomType, RoomTypeRepo};
pub use rooms::{Room, RoomFilter, RoomRepo};
pub use amenities::{Amenity, AmenityRepo};
pub use room_amenities::RoomAmenityRepo;
pub use hotel_search::HotelSearchRepo;
pub use reservations::{Reservation, ReservationFilter, ReservationQuote, ReservationRepo};
pub use cancellations::{Cancellation, CancellationRepo};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// Database unreachable, pool exhausted or connection string invalid
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// Query failed at the database
    #[error("database error: {0}")]
    Sqlx(#[source] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    /// Unique constraint violated
    #[error("conflict: {0}")]
    Conflict(String),

    /// Domain rule refused the operation
    #[error("rejected: {0}")]
    Rejected(String),
}

impl DbError {
    pub(crate) fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return Self::Conflict(describe_unique(db.constraint()));
            }
            if db.is_foreign_key_violation() {
                return Self::Rejected(describe_reference(db.constraint()));
            }
        }

        match e {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => Self::Connection(e),
            other => Self::Sqlx(other),
        }
    }
}

fn describe_unique(constraint: Option<&str>) -> String {
    match constraint {
        Some("users_email_key") => "a user with this Email already exists".to_owned(),
        Some("room_types_type_name_key") => "a room type with this TypeName already exists".to_owned(),
        Some("rooms_room_number_key") => "a room with this RoomNumber already exists".to_owned(),
        Some("amenities_name_key") => "an amenity with this Name already exists".to_owned(),
        Some("cancellations_reservation_id_key") => {
            "reservation is already cancelled".to_owned()
        }
        Some(other) => format!("duplicate value violates '{}'", other),
        None => "duplicate value".to_owned(),
    }
}

fn describe_reference(constraint: Option<&str>) -> String {
    match constraint {
        Some(name) => format!("operation breaks reference '{}'", name),
        None => "operation breaks a reference between records".to_owned(),
    }
}

/// Map a foreign-key failure on DELETE to a readable rejection.
pub(crate) fn still_referenced(resource: &'static str, id: i32) -> impl FnOnce(sqlx::Error) -> DbError {
    move |e| match DbError::from(e) {
        DbError::Rejected(_) => DbError::Rejected(format!(
            "{} '{}' is still referenced by other records",
            resource, id
        )),
        other => other,
    }
}

/// Decode a TEXT column holding one of our enum names.
pub(crate) fn decode_enum<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = ValidationError>,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e: ValidationError| sqlx::Error::ColumnDecode {
        index: column.to_owned(),
        source: Box::new(e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_are_connection_errors() {
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::Connection(_)
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::Sqlx(_)
        ));
    }

    #[test]
    fn unique_messages_name_the_field() {
        assert_eq!(
            describe_unique(Some("users_email_key")),
            "a user with this Email already exists"
        );
        assert_eq!(describe_unique(None), "duplicate value");
    }

    #[test]
    fn not_found_display() {
        let err = DbError::not_found("room", 42);
        assert_eq!(err.to_string(), "not found: room '42'");
    }
}
