use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// A committed reservation against an event type.
///
/// Start/end are absolute UTC instants; `timezone` records the client's
/// zone for display only. Once confirmed, start/end are immutable — a
/// reschedule is a cancel plus a fresh booking.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub event_type_id: Uuid,
    pub owner_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub notes: Option<String>,
    pub timezone: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// A validated booking ready for insertion. Produced only by the admission
/// guard; handlers never construct one from raw client input.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub event_type_id: Uuid,
    pub owner_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub notes: Option<String>,
    pub timezone: Option<String>,
}
