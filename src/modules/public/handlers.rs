use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::app_state::AppState;
use crate::db::{AvailabilityRepository, BookingRepository, EventTypeRepository, PgBookingStore};
use crate::error::{AppError, AppResult};
use crate::middleware::ClientIp;
use crate::scheduling::admission::{admit_booking, BookingRequest, Throttle};
use crate::scheduling::{conflicts, slots};

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub slug: String,
    pub date: NaiveDate,
    pub timezone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub slots: Vec<slots::TimeSlot>,
}

/// Free/taken slots for one event type on one calendar day, composed from
/// the slot generator and the conflict filter.
pub async fn get_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    let tz: Tz = query
        .timezone
        .as_deref()
        .unwrap_or("UTC")
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Unknown timezone: {:?}", query.timezone)))?;

    let event_type = EventTypeRepository::find_public_by_slug(&state.db, &query.slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No bookable event type '{}'", query.slug)))?;

    let now = Utc::now();
    let today = now.with_timezone(&tz).date_naive();
    if query.date < today {
        // Past days never offer slots.
        return Ok(Json(AvailabilityResponse { slots: Vec::new() }));
    }

    let rules = AvailabilityRepository::active_for_owner(&state.db, event_type.owner_id).await?;
    let generated = slots::generate_slots(
        query.date,
        &rules,
        i64::from(event_type.duration_minutes),
        None,
    );

    // One UTC day padded on both sides covers every rule timezone and any
    // buffer reach into neighboring days.
    let day_start = query.date.and_time(NaiveTime::MIN).and_utc();
    let existing = BookingRepository::active_between(
        &state.db,
        event_type.owner_id,
        day_start - Duration::days(1),
        day_start + Duration::days(2),
    )
    .await?;

    let slots = conflicts::filter_available(
        generated,
        &existing,
        i64::from(event_type.buffer_before_minutes),
        i64::from(event_type.buffer_after_minutes),
        i64::from(event_type.minimum_notice_minutes),
        now,
    );

    Ok(Json(AvailabilityResponse { slots }))
}

/// Public booking admission. The whole request rides through the guard as
/// one atomic operation; nothing is reserved before it.
pub async fn create_booking(
    State(state): State<AppState>,
    ClientIp(client_ip): ClientIp,
    Json(request): Json<BookingRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    let store = PgBookingStore::new(state.db.clone());
    let throttle = Throttle {
        limiter: &state.rate_limiter,
        client_ip,
    };

    let booking = admit_booking(
        &store,
        Some(throttle),
        &state.env.booking,
        &request,
        Utc::now(),
    )
    .await?;

    let body = json!({
        "success": true,
        "booking": {
            "id": booking.id,
            "event_type": request.slug,
            "date": request.date,
            "start_time": booking.start_time,
            "end_time": booking.end_time,
            "client_name": booking.client_name,
            "client_email": booking.client_email,
            "timezone": booking.timezone,
        }
    });

    Ok((StatusCode::CREATED, Json(body)))
}
