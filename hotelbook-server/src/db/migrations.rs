//! Schema migrations for the booking tables
//!
//! Every statement is idempotent, so `run` is safe on each startup.

use sqlx::PgPool;

use super::repos::DbError;

/// Tables in dependency order.
const TABLES: &[(&str, &str)] = &[
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            user_id SERIAL PRIMARY KEY,
            email TEXT NOT NULL,
            full_name TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'Guest',
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT users_email_key UNIQUE (email),
            CONSTRAINT users_role_check CHECK (role IN ('Guest', 'Admin'))
        )
        "#,
    ),
    (
        "room_types",
        r#"
        CREATE TABLE IF NOT EXISTS room_types (
            room_type_id SERIAL PRIMARY KEY,
            type_name TEXT NOT NULL,
            accessibility_features TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            CONSTRAINT room_types_type_name_key UNIQUE (type_name)
        )
        "#,
    ),
    (
        "rooms",
        r#"
        CREATE TABLE IF NOT EXISTS rooms (
            room_id SERIAL PRIMARY KEY,
            room_number TEXT NOT NULL,
            room_type_id INT NOT NULL,
            price DOUBLE PRECISION NOT NULL,
            bed_type TEXT NOT NULL,
            view_type TEXT NOT NULL DEFAULT '',
            max_occupancy INT NOT NULL,
            status TEXT NOT NULL DEFAULT 'Available',
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            CONSTRAINT rooms_room_number_key UNIQUE (room_number),
            CONSTRAINT rooms_room_type_id_fkey FOREIGN KEY (room_type_id)
                REFERENCES room_types(room_type_id),
            CONSTRAINT rooms_price_check CHECK (price > 0),
            CONSTRAINT rooms_status_check
                CHECK (status IN ('Available', 'Occupied', 'UnderMaintenance'))
        )
        "#,
    ),
    (
        "amenities",
        r#"
        CREATE TABLE IF NOT EXISTS amenities (
            amenity_id SERIAL PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            CONSTRAINT amenities_name_key UNIQUE (name)
        )
        "#,
    ),
    (
        "room_amenities",
        r#"
        CREATE TABLE IF NOT EXISTS room_amenities (
            room_type_id INT NOT NULL REFERENCES room_types(room_type_id) ON DELETE CASCADE,
            amenity_id INT NOT NULL REFERENCES amenities(amenity_id) ON DELETE CASCADE,
            PRIMARY KEY (room_type_id, amenity_id)
        )
        "#,
    ),
    (
        "reservations",
        r#"
        CREATE TABLE IF NOT EXISTS reservations (
            reservation_id SERIAL PRIMARY KEY,
            user_id INT NOT NULL,
            room_id INT NOT NULL,
            check_in_date DATE NOT NULL,
            check_out_date DATE NOT NULL,
            number_of_guests INT NOT NULL,
            total_cost DOUBLE PRECISION NOT NULL,
            status TEXT NOT NULL DEFAULT 'Reserved',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT reservations_user_id_fkey FOREIGN KEY (user_id)
                REFERENCES users(user_id),
            CONSTRAINT reservations_room_id_fkey FOREIGN KEY (room_id)
                REFERENCES rooms(room_id),
            CONSTRAINT reservations_dates_check CHECK (check_out_date > check_in_date),
            CONSTRAINT reservations_status_check
                CHECK (status IN ('Reserved', 'CheckedIn', 'CheckedOut', 'Cancelled'))
        )
        "#,
    ),
    (
        "cancellations",
        r#"
        CREATE TABLE IF NOT EXISTS cancellations (
            cancellation_id SERIAL PRIMARY KEY,
            reservation_id INT NOT NULL,
            reason TEXT NOT NULL DEFAULT '',
            refund_amount DOUBLE PRECISION NOT NULL,
            cancelled_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            CONSTRAINT cancellations_reservation_id_key UNIQUE (reservation_id),
            CONSTRAINT cancellations_reservation_id_fkey FOREIGN KEY (reservation_id)
                REFERENCES reservations(reservation_id) ON DELETE CASCADE
        )
        "#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_rooms_room_type ON rooms(room_type_id)",
    "CREATE INDEX IF NOT EXISTS idx_room_amenities_amenity ON room_amenities(amenity_id)",
    "CREATE INDEX IF NOT EXISTS idx_reservations_user ON reservations(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_reservations_room_dates \
     ON reservations(room_id, check_in_date, check_out_date) \
     WHERE status IN ('Reserved', 'CheckedIn')",
];

/// Run all migrations
pub async fn run(pool: &PgPool) -> Result<(), DbError> {
    tracing::info!("Running schema migrations...");

    for (table, ddl) in TABLES {
        tracing::debug!(table, "ensuring table");
        sqlx::query(ddl).execute(pool).await?;
    }

    for ddl in INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }

    tracing::info!("Schema migrations complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referenced_tables_come_first() {
        let position = |name: &str| TABLES.iter().position(|(t, _)| *t == name).unwrap();

        for (table, ddl) in TABLES {
            for (other, _) in TABLES {
                if ddl.contains(&format!("REFERENCES {}(", other)) {
                    assert!(
                        position(*other) < position(*table),
                        "{} references {} before it is created",
                        table,
                        other
                    );
                }
            }
        }
    }

    #[test]
    fn every_statement_is_idempotent() {
        assert!(TABLES.iter().all(|(_, ddl)| ddl.contains("IF NOT EXISTS")));
        assert!(INDEXES.iter().all(|ddl| ddl.contains("IF NOT EXISTS")));
    }
}
