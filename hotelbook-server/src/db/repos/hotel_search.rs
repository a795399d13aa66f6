//! Hotel search repository
//!
//! Read-only joins over rooms, room types, amenities and reservations.
//! Every filter becomes a bound predicate in the query; nothing is filtered
//! in process, and result sets are capped.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, Postgres, QueryBuilder, Row};

use super::{decode_enum, DbError};
use crate::db::ConnectionFactory;
use crate::dto::{AmenitySearchDto, RoomDetailsDto, RoomSearchDto, RoomTypeSearchDto};
use crate::models::search::contains_pattern;
use crate::models::{AvailabilityCriteria, Paginated, Pagination, RoomTypeCriteria};

/// Cap for the unpaginated room type search
const MAX_ROOM_TYPE_RESULTS: i64 = 100;

/// Hotel search repository
pub struct HotelSearchRepo<'a> {
    db: &'a ConnectionFactory,
}

impl<'a> HotelSearchRepo<'a> {
    pub fn new(db: &'a ConnectionFactory) -> Self {
        Self { db }
    }

    /// Look up one room type as a search projection.
    pub async fn room_type(&self, id: i32) -> Result<RoomTypeSearchDto, DbError> {
        let mut conn = self.db.connect().await?;

        sqlx::query_as::<_, RoomTypeSearchDto>(
            r#"
            SELECT room_type_id, type_name, accessibility_features, description
            FROM room_types
            WHERE room_type_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| DbError::not_found("room type", id))
    }

    /// Active room types matching the criteria, by name.
    pub async fn room_types(
        &self,
        criteria: &RoomTypeCriteria,
    ) -> Result<Vec<RoomTypeSearchDto>, DbError> {
        let mut conn = self.db.connect().await?;

        let rows = sqlx::query_as::<_, RoomTypeSearchDto>(
            r#"
            SELECT room_type_id, type_name, accessibility_features, description
            FROM room_types
            WHERE is_active
              AND ($1::TEXT IS NULL OR type_name ILIKE $1)
              AND (NOT $2 OR accessibility_features <> '')
            ORDER BY type_name
            LIMIT $3
            "#,
        )
        .bind(criteria.type_name.as_deref().map(contains_pattern))
        .bind(criteria.accessible_only)
        .bind(MAX_ROOM_TYPE_RESULTS)
        .fetch_all(&mut *conn)
        .await?;

        Ok(rows)
    }

    /// Bookable rooms matching the criteria, cheapest first.
    ///
    /// A room is bookable when it and its type are active, it is not under
    /// maintenance, and (with dates) no `Reserved`/`CheckedIn` reservation
    /// overlaps the half-open stay.
    pub async fn available_rooms(
        &self,
        criteria: &AvailabilityCriteria,
        page: Pagination,
    ) -> Result<Paginated<RoomSearchDto>, DbError> {
        let mut qb = availability_query(criteria);
        qb.push(" ORDER BY r.price, r.room_number LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let mut conn = self.db.connect().await?;
        let rows = qb.build().fetch_all(&mut *conn).await?;

        let total = match rows.first() {
            Some(row) => row.try_get::<i64, _>("total")?,
            None if page.page > 1 => {
                availability_count(criteria)
                    .build_query_scalar::<i64>()
                    .fetch_one(&mut *conn)
                    .await?
            }
            None => 0,
        };
        let items = rows
            .iter()
            .map(room_search_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(total, page = page.page, "availability search");
        Ok(Paginated {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        })
    }

    /// Room, its type and the type's amenities in one joined query.
    pub async fn room_details(&self, room_id: i32) -> Result<RoomDetailsDto, DbError> {
        let mut conn = self.db.connect().await?;

        let rows = sqlx::query(
            r#"
            SELECT
                r.room_id, r.room_number, r.price, r.bed_type, r.view_type,
                r.max_occupancy, r.status, r.is_active,
                rt.room_type_id, rt.type_name, rt.accessibility_features, rt.description,
                a.amenity_id, a.name AS amenity_name, a.description AS amenity_description
            FROM rooms r
            JOIN room_types rt ON rt.room_type_id = r.room_type_id
            LEFT JOIN room_amenities ra ON ra.room_type_id = rt.room_type_id
            LEFT JOIN amenities a ON a.amenity_id = ra.amenity_id AND a.is_active
            WHERE r.room_id = $1
            ORDER BY a.name
            "#,
        )
        .bind(room_id)
        .fetch_all(&mut *conn)
        .await?;

        let Some(first) = rows.first() else {
            return Err(DbError::not_found("room", room_id));
        };

        let mut details = RoomDetailsDto {
            room_id: first.try_get("room_id")?,
            room_number: first.try_get("room_number")?,
            price: first.try_get("price")?,
            bed_type: first.try_get("bed_type")?,
            view_type: first.try_get("view_type")?,
            max_occupancy: first.try_get("max_occupancy")?,
            status: decode_enum(first, "status")?,
            is_active: first.try_get("is_active")?,
            room_type: RoomTypeSearchDto::from_row(first)?,
            amenities: Vec::with_capacity(rows.len()),
        };

        for row in &rows {
            let amenity_id: Option<i32> = row.try_get("amenity_id")?;
            if let Some(amenity_id) = amenity_id {
                details.amenities.push(AmenitySearchDto {
                    amenity_id,
                    name: row.try_get("amenity_name")?,
                    description: row.try_get("amenity_description")?,
                });
            }
        }

        Ok(details)
    }
}

/// SELECT … WHERE for the availability search, without ORDER/LIMIT.
fn availability_query(criteria: &AvailabilityCriteria) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        r#"
        SELECT
            r.room_id, r.room_number, r.price, r.bed_type, r.view_type,
            r.max_occupancy, r.status,
            rt.room_type_id, rt.type_name, rt.accessibility_features, rt.description,
            COUNT(*) OVER() AS total
        "#,
    );
    push_availability_filters(&mut qb, criteria);
    qb
}

/// Row count for the availability search.
fn availability_count(criteria: &AvailabilityCriteria) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*)");
    push_availability_filters(&mut qb, criteria);
    qb
}

fn push_availability_filters(qb: &mut QueryBuilder<'static, Postgres>, criteria: &AvailabilityCriteria) {
    qb.push(
        r#"
        FROM rooms r
        JOIN room_types rt ON rt.room_type_id = r.room_type_id
        WHERE r.is_active
          AND rt.is_active
          AND r.status <> 'UnderMaintenance'
        "#,
    );

    if let Some(stay) = criteria.stay {
        qb.push(
            " AND NOT EXISTS (SELECT 1 FROM reservations res \
             WHERE res.room_id = r.room_id \
             AND res.status IN ('Reserved', 'CheckedIn') \
             AND res.check_in_date < ",
        )
        .push_bind(stay.check_out())
        .push(" AND res.check_out_date > ")
        .push_bind(stay.check_in())
        .push(")");
    }

    if let Some(min) = criteria.min_price {
        qb.push(" AND r.price >= ").push_bind(min);
    }

    if let Some(max) = criteria.max_price {
        qb.push(" AND r.price <= ").push_bind(max);
    }

    if let Some(name) = &criteria.room_type_name {
        qb.push(" AND rt.type_name ILIKE ").push_bind(contains_pattern(name));
    }

    if let Some(guests) = criteria.guests {
        qb.push(" AND r.max_occupancy >= ").push_bind(guests);
    }

    if !criteria.amenity_ids.is_empty() {
        // Ids are deduplicated, so a full match means the count equals the list length
        qb.push(
            " AND (SELECT COUNT(*) FROM room_amenities ra \
             WHERE ra.room_type_id = rt.room_type_id AND ra.amenity_id = ANY(",
        )
        .push_bind(criteria.amenity_ids.clone())
        .push(")) = ")
        .push_bind(criteria.amenity_ids.len() as i64);
    }
}

fn room_search_from_row(row: &PgRow) -> Result<RoomSearchDto, sqlx::Error> {
    Ok(RoomSearchDto {
        room_id: row.try_get("room_id")?,
        room_number: row.try_get("room_number")?,
        price: row.try_get("price")?,
        bed_type: row.try_get("bed_type")?,
        view_type: row.try_get("view_type")?,
        max_occupancy: row.try_get("max_occupancy")?,
        status: decode_enum(row, "status")?,
        room_type: RoomTypeSearchDto::from_row(row)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AvailabilityParams, StayDates};
    use chrono::NaiveDate;

    fn sql(criteria: &AvailabilityCriteria) -> String {
        availability_query(criteria).into_sql()
    }

    #[test]
    fn no_filters_means_only_bookable_rooms() {
        let sql = sql(&AvailabilityCriteria::default());
        assert!(sql.contains("r.status <> 'UnderMaintenance'"));
        assert!(!sql.contains("NOT EXISTS"));
        assert!(!sql.contains("$1"));
    }

    #[test]
    fn every_filter_is_bound_not_inlined() {
        let criteria = AvailabilityCriteria::new(AvailabilityParams {
            check_in: NaiveDate::from_ymd_opt(2030, 3, 1),
            check_out: NaiveDate::from_ymd_opt(2030, 3, 4),
            min_price: Some(50.0),
            max_price: Some(500.0),
            room_type_name: Some("suite'; DROP TABLE rooms; --"),
            guests: Some(2),
            amenities: Some("1,2"),
        })
        .unwrap();

        let sql = sql(&criteria);
        assert!(!sql.contains("DROP TABLE"));
        assert!(sql.contains("NOT EXISTS"));
        assert!(sql.contains("ANY($7)"));
        assert!(sql.contains("= $8"));
    }

    #[test]
    fn count_shares_the_filters() {
        let criteria = AvailabilityCriteria::new(AvailabilityParams {
            guests: Some(2),
            amenities: Some("4"),
            ..Default::default()
        })
        .unwrap();
        let sql = availability_count(&criteria).into_sql();
        assert!(sql.starts_with("SELECT COUNT(*)"));
        assert!(!sql.contains("OVER()"));
        assert!(sql.contains("r.max_occupancy >= $1"));
        assert!(sql.contains("ANY($2)"));
    }

    #[test]
    fn overlap_uses_half_open_interval() {
        let criteria = AvailabilityCriteria {
            stay: Some(
                StayDates::new(
                    NaiveDate::from_ymd_opt(2030, 3, 1).unwrap(),
                    NaiveDate::from_ymd_opt(2030, 3, 4).unwrap(),
                )
                .unwrap(),
            ),
            ..Default::default()
        };
        let sql = sql(&criteria);
        assert!(sql.contains("res.check_in_date < $1"));
        assert!(sql.contains("res.check_out_date > $2"));
    }
}
