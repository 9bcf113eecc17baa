use std::net::IpAddr;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use crate::config::BookingPolicy;
use crate::db::{Booking, BookingWindow, EventType, NewBooking};
use crate::scheduling::conflicts::conflicts_with_booking;
use crate::scheduling::rate_limit::RateLimiter;

#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("event type not found")]
    EventTypeNotFound,

    #[error("slot already taken")]
    SlotTaken,

    #[error("rate limited")]
    RateLimited,

    #[error("storage failure: {0}")]
    StorageFailure(String),
}

/// Faults the storage collaborator can report. A constraint violation is a
/// first-class signal, not a generic failure: the guard turns it into
/// [`AdmissionError::SlotTaken`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conflicting booking exists")]
    Conflict,

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Storage boundary for the admission path.
///
/// `insert_if_free` must be atomic from the store's perspective: either the
/// booking is inserted and no conflicting booking existed, or the insert is
/// rejected with [`StoreError::Conflict`]. A separate read-then-write pair
/// does not satisfy this contract.
pub trait BookingStore: Send + Sync {
    async fn find_event_type(&self, id: Uuid) -> Result<Option<EventType>, StoreError>;

    async fn active_bookings_between(
        &self,
        owner_id: Uuid,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Booking>, StoreError>;

    async fn insert_if_free(&self, new: NewBooking) -> Result<Booking, StoreError>;
}

/// An untrusted booking request, deserialized straight off the wire. Every
/// field is re-validated here even when a client-side workflow already
/// checked it.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct BookingRequest {
    pub event_type_id: Uuid,
    pub slug: String,
    pub date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub client_name: String,
    pub client_email: String,
    pub client_phone: String,
    pub notes: Option<String>,
    pub timezone: Option<String>,
}

/// Throttle context for public requests. Admin-created bookings skip it and
/// go through the same guard otherwise.
#[derive(Debug, Clone, Copy)]
pub struct Throttle<'a> {
    pub limiter: &'a RateLimiter,
    pub client_ip: IpAddr,
}

/// Validate and atomically commit a booking request.
///
/// Phases: Received → Validated → Reserved → Committed, or Rejected at any
/// gate. The availability re-check runs against the *current* committed set
/// immediately before the insert, and the insert itself is the atomic
/// backstop for races the re-check cannot see. The guard never retries; all
/// failures are surfaced to the caller.
pub async fn admit_booking<S: BookingStore>(
    store: &S,
    throttle: Option<Throttle<'_>>,
    policy: &BookingPolicy,
    request: &BookingRequest,
    now: DateTime<Utc>,
) -> Result<Booking, AdmissionError> {
    if let Some(throttle) = throttle {
        if !throttle.limiter.allow(throttle.client_ip, &request.slug) {
            warn!(client_ip = %throttle.client_ip, slug = %request.slug, "booking request rate limited");
            return Err(AdmissionError::RateLimited);
        }
    }

    validate_request(request, now)?;

    let storage_timeout = StdDuration::from_secs(policy.storage_timeout_secs);
    let event_type = bounded(storage_timeout, store.find_event_type(request.event_type_id))
        .await?
        .filter(|et| et.active && !et.hidden)
        .ok_or(AdmissionError::EventTypeNotFound)?;

    validate_against_event_type(request, &event_type, policy, now)?;
    debug!(event_type = %event_type.slug, start = %request.start_time, "booking request validated");

    // Availability re-check against the current committed set. The window is
    // widened by both buffers on each side so any booking whose padded
    // interval can reach ours is fetched.
    let buffer_before = Duration::minutes(event_type.buffer_before_minutes as i64);
    let buffer_after = Duration::minutes(event_type.buffer_after_minutes as i64);
    let reach = buffer_before + buffer_after;
    let existing = bounded(
        storage_timeout,
        store.active_bookings_between(
            event_type.owner_id,
            request.start_time - reach,
            request.end_time + reach,
        ),
    )
    .await?;

    let conflicting = existing.iter().any(|booking| {
        conflicts_with_booking(
            request.start_time,
            request.end_time,
            booking,
            buffer_before,
            buffer_after,
        )
    });
    if conflicting {
        debug!(start = %request.start_time, "slot lost before commit");
        return Err(AdmissionError::SlotTaken);
    }

    let new = NewBooking {
        event_type_id: event_type.id,
        owner_id: event_type.owner_id,
        start_time: request.start_time,
        end_time: request.end_time,
        client_name: request.client_name.clone(),
        client_email: request.client_email.clone(),
        client_phone: request.client_phone.clone(),
        notes: request.notes.clone(),
        timezone: request.timezone.clone(),
    };

    let booking = bounded(storage_timeout, store.insert_if_free(new)).await?;
    info!(booking_id = %booking.id, event_type = %event_type.slug, start = %booking.start_time, "booking committed");
    Ok(booking)
}

/// Pure validation; no I/O.
fn validate_request(request: &BookingRequest, now: DateTime<Utc>) -> Result<(), AdmissionError> {
    let fail = |msg: &str| Err(AdmissionError::ValidationFailed(msg.to_string()));

    if request.slug.trim().is_empty() {
        return fail("slug is required");
    }
    if request.client_name.trim().is_empty() {
        return fail("client_name is required");
    }
    if request.client_phone.trim().is_empty() {
        return fail("client_phone is required");
    }
    if !request.client_email.validate_email() {
        return fail("client_email is not a valid email address");
    }
    if request.start_time >= request.end_time {
        return fail("start_time must be before end_time");
    }
    if request.start_time < now {
        return fail("start_time must not be in the past");
    }
    Ok(())
}

fn validate_against_event_type(
    request: &BookingRequest,
    event_type: &EventType,
    policy: &BookingPolicy,
    now: DateTime<Utc>,
) -> Result<(), AdmissionError> {
    let fail = |msg: String| Err(AdmissionError::ValidationFailed(msg));

    if event_type.slug != request.slug {
        return fail("slug does not match the requested event type".to_string());
    }

    let requested_secs = (request.end_time - request.start_time).num_seconds();
    let configured_secs = i64::from(event_type.duration_minutes) * 60;
    if (requested_secs - configured_secs).abs() > policy.duration_tolerance_secs {
        return fail(format!(
            "requested duration {requested_secs}s does not match the configured {configured_secs}s"
        ));
    }

    let notice = Duration::minutes(i64::from(event_type.minimum_notice_minutes));
    if request.start_time < now + notice {
        return fail(format!(
            "bookings require at least {} minutes notice",
            event_type.minimum_notice_minutes
        ));
    }

    match &*event_type.booking_window {
        BookingWindow::Unlimited => {}
        BookingWindow::Rolling { days } => {
            if request.start_time > now + Duration::days(*days) {
                return fail(format!("bookings open at most {days} days in advance"));
            }
        }
        BookingWindow::Range { start, end } => {
            if request.date < *start || request.date > *end {
                return fail(format!("bookings are only open between {start} and {end}"));
            }
        }
    }

    Ok(())
}

/// Bound a storage operation. Exceeding the timeout fails closed as a
/// storage failure; the store's commit-or-rollback semantics guarantee no
/// half-committed booking is left behind.
async fn bounded<T>(
    limit: StdDuration,
    op: impl std::future::Future<Output = Result<T, StoreError>>,
) -> Result<T, AdmissionError> {
    match tokio::time::timeout(limit, op).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(StoreError::Conflict)) => Err(AdmissionError::SlotTaken),
        Ok(Err(StoreError::Unavailable(reason))) => Err(AdmissionError::StorageFailure(reason)),
        Err(_) => Err(AdmissionError::StorageFailure(
            "storage operation timed out".to_string(),
        )),
    }
}
