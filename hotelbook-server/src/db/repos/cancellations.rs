//! Cancellation repository

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Connection, FromRow, Row};

use super::{decode_enum, DbError};
use crate::db::ConnectionFactory;
use crate::models::{
    check_cancellable, refund_amount, CancellationInput, Paginated, Pagination, ReservationStatus,
};

/// Cancellation record from database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Cancellation {
    pub cancellation_id: i32,
    pub reservation_id: i32,
    pub reason: String,
    pub refund_amount: f64,
    pub cancelled_at: DateTime<Utc>,
}

const CANCELLATION_FILTER: &str = "($1::INT IS NULL OR reservation_id = $1)";

/// Cancellation repository
pub struct CancellationRepo<'a> {
    db: &'a ConnectionFactory,
}

impl<'a> CancellationRepo<'a> {
    pub fn new(db: &'a ConnectionFactory) -> Self {
        Self { db }
    }

    pub async fn get(&self, id: i32) -> Result<Cancellation, DbError> {
        let mut conn = self.db.connect().await?;

        sqlx::query_as::<_, Cancellation>(
            r#"
            SELECT cancellation_id, reservation_id, reason, refund_amount, cancelled_at
            FROM cancellations
            WHERE cancellation_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("cancellation", id))
    }

    /// List cancellations, newest first.
    pub async fn list(
        &self,
        reservation_id: Option<i32>,
        page: Pagination,
    ) -> Result<Paginated<Cancellation>, DbError> {
        let mut conn = self.db.connect().await?;

        let rows = sqlx::query(&format!(
            r#"
            SELECT
                cancellation_id, reservation_id, reason, refund_amount, cancelled_at,
                COUNT(*) OVER() AS total
            FROM cancellations
            WHERE {}
            ORDER BY cancelled_at DESC, cancellation_id DESC
            LIMIT $2 OFFSET $3
            "#,
            CANCELLATION_FILTER
        ))
        .bind(reservation_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&mut *conn)
        .await?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total")?,
            // An empty page past the end carries no window count
            None if page.page > 1 => {
                sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM cancellations WHERE {}", CANCELLATION_FILTER))
                    .bind(reservation_id)
                    .fetch_one(&mut *conn)
                    .await?
            }
            None => 0,
        };
        let items = rows
            .iter()
            .map(Cancellation::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    /// Cancel a reservation on `today` and record the refund.
    ///
    /// The reservation row is locked, its status flipped to `Cancelled` and
    /// the cancellation inserted in one transaction.
    pub async fn cancel(
        &self,
        input: &CancellationInput,
        today: NaiveDate,
    ) -> Result<Cancellation, DbError> {
        let mut conn = self.db.connect().await?;
        let mut tx = conn.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT status, check_in_date, total_cost
            FROM reservations
            WHERE reservation_id = $1
            FOR UPDATE
            "#,
        )
        .bind(input.reservation_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| DbError::not_found("reservation", input.reservation_id))?;

        let status: ReservationStatus = decode_enum(&row, "status")?;
        let check_in: NaiveDate = row.try_get("check_in_date")?;
        let total_cost: f64 = row.try_get("total_cost")?;

        if let Err(rejection) = check_cancellable(status, check_in, today) {
            tracing::warn!(
                reservation_id = input.reservation_id,
                %rejection,
                "cancellation refused"
            );
            return Err(DbError::Rejected(rejection.to_string()));
        }

        sqlx::query("UPDATE reservations SET status = 'Cancelled' WHERE reservation_id = $1")
            .bind(input.reservation_id)
            .execute(&mut *tx)
            .await?;

        let cancellation = sqlx::query_as::<_, Cancellation>(
            r#"
            INSERT INTO cancellations (reservation_id, reason, refund_amount)
            VALUES ($1, $2, $3)
            RETURNING cancellation_id, reservation_id, reason, refund_amount, cancelled_at
            "#,
        )
        .bind(input.reservation_id)
        .bind(&input.reason)
        .bind(refund_amount(total_cost, check_in, today))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!(
            reservation_id = cancellation.reservation_id,
            refund = cancellation.refund_amount,
            "reservation cancelled"
        );
        Ok(cancellation)
    }
}
