use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{Booking, EventType, NewBooking};
use crate::db::repositories::{BookingRepository, EventTypeRepository};
use crate::db::DatabaseError;
use crate::scheduling::admission::{BookingStore, StoreError};

/// Postgres-backed [`BookingStore`]. Atomicity of `insert_if_free` comes
/// from the partial unique index on `(owner_id, start_time)`; a violation
/// surfaces as [`StoreError::Conflict`].
#[derive(Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_store_error(err: DatabaseError) -> StoreError {
    match err {
        DatabaseError::Duplicate => StoreError::Conflict,
        other => StoreError::Unavailable(other.to_string()),
    }
}

impl BookingStore for PgBookingStore {
    async fn find_event_type(&self, id: Uuid) -> Result<Option<EventType>, StoreError> {
        EventTypeRepository::find_by_id(&self.pool, id)
            .await
            .map_err(into_store_error)
    }

    async fn active_bookings_between(
        &self,
        owner_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Booking>, StoreError> {
        BookingRepository::active_between(&self.pool, owner_id, from, to)
            .await
            .map_err(into_store_error)
    }

    async fn insert_if_free(&self, new: NewBooking) -> Result<Booking, StoreError> {
        BookingRepository::insert_if_free(&self.pool, &new)
            .await
            .map_err(into_store_error)
    }
}
