use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{Booking, BookingStatus, NewBooking};
use crate::db::DatabaseError;

pub struct BookingRepository;

impl BookingRepository {
    /// Atomic reserve-if-free. The partial unique index on
    /// `(owner_id, start_time) WHERE status <> 'cancelled'` is the race
    /// backstop: a concurrent insert for the same slot surfaces here as
    /// `DatabaseError::Duplicate`, never as a second committed booking.
    pub async fn insert_if_free(
        pool: &PgPool,
        new: &NewBooking,
    ) -> Result<Booking, DatabaseError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings
                (id, event_type_id, owner_id, start_time, end_time,
                 client_name, client_email, client_phone, notes, timezone, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(new.event_type_id)
        .bind(new.owner_id)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(&new.client_name)
        .bind(&new.client_email)
        .bind(&new.client_phone)
        .bind(&new.notes)
        .bind(&new.timezone)
        .bind(BookingStatus::Confirmed)
        .fetch_one(pool)
        .await?;

        Ok(booking)
    }

    /// Non-cancelled bookings for an owner whose [start, end) interval
    /// touches the given range.
    pub async fn active_between(
        pool: &PgPool,
        owner_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Booking>, DatabaseError> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE owner_id = $1
              AND status <> 'cancelled'
              AND start_time < $3
              AND end_time > $2
            ORDER BY start_time
            "#,
        )
        .bind(owner_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        Ok(bookings)
    }

    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<Booking>, DatabaseError> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE owner_id = $1
              AND ($2::timestamptz IS NULL OR start_time >= $2)
              AND ($3::timestamptz IS NULL OR start_time < $3)
            ORDER BY start_time
            "#,
        )
        .bind(owner_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        Ok(bookings)
    }

    pub async fn cancel(
        pool: &PgPool,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<Booking, DatabaseError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET status = 'cancelled'
            WHERE id = $1 AND owner_id = $2 AND status <> 'cancelled'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?
        .ok_or(DatabaseError::NotFound)?;

        Ok(booking)
    }
}
