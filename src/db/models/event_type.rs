use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

/// How far into the future an event type accepts bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BookingWindow {
    /// No restriction beyond minimum notice.
    Unlimited,
    /// Bookings may start at most `days` days from now.
    Rolling { days: i64 },
    /// Bookings must fall inside a fixed date range (inclusive).
    Range { start: NaiveDate, end: NaiveDate },
}

/// Where a session takes place. Stored as a tagged JSON value so the
/// booking path never has to interpret free-form shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Location {
    Zoom,
    InPerson { address: String },
    Custom { text: String },
}

/// A bookable session definition owned by a provider.
///
/// Slugs are unique per owner. Event types referenced by bookings are
/// soft-hidden via `hidden`, never hard-deleted.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct EventType {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub buffer_before_minutes: i32,
    pub buffer_after_minutes: i32,
    pub minimum_notice_minutes: i32,
    pub booking_window: Json<BookingWindow>,
    pub location: Json<Location>,
    pub price_cents: Option<i64>,
    pub active: bool,
    pub hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewEventType {
    #[validate(length(min = 1, max = 120))]
    pub slug: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "Duration must be at least 1 minute"))]
    pub duration_minutes: i32,
    #[validate(range(min = 0))]
    pub buffer_before_minutes: i32,
    #[validate(range(min = 0))]
    pub buffer_after_minutes: i32,
    #[validate(range(min = 0))]
    pub minimum_notice_minutes: i32,
    pub booking_window: BookingWindow,
    pub location: Location,
    pub price_cents: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEventType {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
    #[validate(range(min = 0))]
    pub buffer_before_minutes: Option<i32>,
    #[validate(range(min = 0))]
    pub buffer_after_minutes: Option<i32>,
    #[validate(range(min = 0))]
    pub minimum_notice_minutes: Option<i32>,
    pub booking_window: Option<BookingWindow>,
    pub location: Option<Location>,
    pub price_cents: Option<i64>,
    pub active: Option<bool>,
    pub hidden: Option<bool>,
}
