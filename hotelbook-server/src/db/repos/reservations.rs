//! Reservation repository
//!
//! Creating a reservation locks the room row first, so two concurrent
//! bookings of the same room serialize and the overlap check inside the
//! transaction sees the other's insert.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Connection, FromRow, Row};

use super::{decode_enum, DbError};
use crate::db::ConnectionFactory;
use crate::models::{
    Paginated, Pagination, ReservationInput, ReservationStatus, RoomStatus, StayDates,
};

/// Reservation record from database
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub reservation_id: i32,
    pub user_id: i32,
    pub room_id: i32,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub number_of_guests: i32,
    pub total_cost: f64,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Reservation {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            reservation_id: row.try_get("reservation_id")?,
            user_id: row.try_get("user_id")?,
            room_id: row.try_get("room_id")?,
            check_in_date: row.try_get("check_in_date")?,
            check_out_date: row.try_get("check_out_date")?,
            number_of_guests: row.try_get("number_of_guests")?,
            total_cost: row.try_get("total_cost")?,
            status: decode_enum(row, "status")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// List filter
#[derive(Debug, Clone, Copy, Default)]
pub struct ReservationFilter {
    pub user_id: Option<i32>,
    pub status: Option<ReservationStatus>,
}

/// Price of a prospective stay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReservationQuote {
    pub room_id: i32,
    pub nights: i64,
    pub price_per_night: f64,
    pub total_cost: f64,
}

const RESERVATION_COLUMNS: &str = "reservation_id, user_id, room_id, check_in_date, \
     check_out_date, number_of_guests, total_cost, status, created_at";

const RESERVATION_FILTER: &str =
    "($1::INT IS NULL OR user_id = $1) AND ($2::TEXT IS NULL OR status = $2)";

/// Reservation repository
pub struct ReservationRepo<'a> {
    db: &'a ConnectionFactory,
}

impl<'a> ReservationRepo<'a> {
    pub fn new(db: &'a ConnectionFactory) -> Self {
        Self { db }
    }

    /// Get a single reservation by ID.
    pub async fn get(&self, id: i32) -> Result<Reservation, DbError> {
        let mut conn = self.db.connect().await?;

        sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {} FROM reservations WHERE reservation_id = $1",
            RESERVATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("reservation", id))
    }

    /// List reservations by check-in date, most recent first.
    pub async fn list(
        &self,
        filter: ReservationFilter,
        page: Pagination,
    ) -> Result<Paginated<Reservation>, DbError> {
        let mut conn = self.db.connect().await?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT {}, COUNT(*) OVER() AS total
            FROM reservations
            WHERE {}
            ORDER BY check_in_date DESC, reservation_id DESC
            LIMIT $3 OFFSET $4
            "#,
            RESERVATION_COLUMNS, RESERVATION_FILTER
        ))
        .bind(filter.user_id)
        .bind(filter.status.map(|s| s.as_str()))
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *conn)
        .await?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total")?,
            // An empty page past the end carries no window count
            None if page.page > 1 => {
                sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM reservations WHERE {}", RESERVATION_FILTER))
                    .bind(filter.user_id)
                    .bind(filter.status.map(|s| s.as_str()))
                    .fetch_one(&mut *conn)
                    .await?
            }
            None => 0,
        };
        let items = rows
            .iter()
            .map(Reservation::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    /// Price a stay without booking it.
    pub async fn quote(&self, room_id: i32, stay: StayDates) -> Result<ReservationQuote, DbError> {
        let mut conn = self.db.connect().await?;

        let (price,): (f64,) = sqlx::query_as("SELECT price FROM rooms WHERE room_id = $1")
            .bind(room_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| DbError::not_found("room", room_id))?;

        Ok(ReservationQuote {
            room_id,
            nights: stay.nights(),
            price_per_night: price,
            total_cost: stay.cost(price),
        })
    }

    /// Book a room.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the room or user does not exist
    /// - `Rejected` if the room is inactive or under maintenance, too small
    ///   for the party, the user is inactive, or the dates overlap an active
    ///   reservation
    pub async fn create(&self, input: &ReservationInput) -> Result<Reservation, DbError> {
        let mut conn = self.db.connect().await?;
        let mut tx = conn.begin().await?;

        let room = sqlx::query(
            r#"
            SELECT r.price, r.max_occupancy, r.status, r.is_active AND rt.is_active AS bookable
            FROM rooms r
            JOIN room_types rt ON rt.room_type_id = r.room_type_id
            WHERE r.room_id = $1
            FOR UPDATE OF r
            "#,
        )
        .bind(input.room_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("room", input.room_id))?;

        let price: f64 = room.try_get("price")?;
        let max_occupancy: i32 = room.try_get("max_occupancy")?;
        let status: RoomStatus = decode_enum(&room, "status")?;
        let bookable: bool = room.try_get("bookable")?;

        if !bookable || status == RoomStatus::UnderMaintenance {
            return Err(DbError::Rejected(format!(
                "room '{}' is not available for booking",
                input.room_id
            )));
        }
        if input.guests > max_occupancy {
            return Err(DbError::Rejected(format!(
                "room '{}' holds at most {} guests",
                input.room_id, max_occupancy
            )));
        }

        let (user_active,): (bool,) = sqlx::query_as("SELECT is_active FROM users WHERE user_id = $1")
            .bind(input.user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("user", input.user_id))?;
        if !user_active {
            return Err(DbError::Rejected(format!(
                "user '{}' is inactive",
                input.user_id
            )));
        }

        let (overlapping,): (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM reservations
                WHERE room_id = $1
                  AND status IN ('Reserved', 'CheckedIn')
                  AND check_in_date < $3
                  AND check_out_date > $2
            )
            "#,
        )
        .bind(input.room_id)
        .bind(input.stay.check_in())
        .bind(input.stay.check_out())
        .fetch_one(&mut *tx)
        .await?;
        if overlapping {
            return Err(DbError::Rejected(format!(
                "room '{}' is already booked for these dates",
                input.room_id
            )));
        }

        let reservation = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            INSERT INTO reservations
                (user_id, room_id, check_in_date, check_out_date, number_of_guests, total_cost, status)
            VALUES ($1, $2, $3, $4, $5, $6, 'Reserved')
            RETURNING {}
            "#,
            RESERVATION_COLUMNS
        ))
        .bind(input.user_id)
        .bind(input.room_id)
        .bind(input.stay.check_in())
        .bind(input.stay.check_out())
        .bind(input.guests)
        .bind(input.stay.cost(price))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            reservation_id = reservation.reservation_id,
            room_id = reservation.room_id,
            nights = input.stay.nights(),
            "reservation created"
        );
        Ok(reservation)
    }
}
