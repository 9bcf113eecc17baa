use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::app_state::AppState;
use crate::db::{
    AvailabilityRepository, AvailabilityRule, Booking, BookingRepository, EventType,
    EventTypeRepository, NewAvailabilityRule, NewEventType, PgBookingStore, UpdateEventType,
};
use crate::error::{AppError, AppResult};
use crate::middleware::OwnerId;
use crate::scheduling::admission::{admit_booking, BookingRequest};

// Event types

pub async fn create_event_type(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Json(new): Json<NewEventType>,
) -> AppResult<(StatusCode, Json<EventType>)> {
    new.validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;
    let event_type = EventTypeRepository::create(&state.db, owner_id, &new).await?;
    Ok((StatusCode::CREATED, Json(event_type)))
}

pub async fn list_event_types(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
) -> AppResult<Json<Vec<EventType>>> {
    let event_types = EventTypeRepository::list_for_owner(&state.db, owner_id).await?;
    Ok(Json(event_types))
}

pub async fn get_event_type(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EventType>> {
    let event_type = EventTypeRepository::find_by_id(&state.db, id)
        .await?
        .filter(|et| et.owner_id == owner_id)
        .ok_or_else(|| AppError::NotFound("Event type not found".to_string()))?;
    Ok(Json(event_type))
}

pub async fn update_event_type(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(id): Path<Uuid>,
    Json(update): Json<UpdateEventType>,
) -> AppResult<Json<EventType>> {
    update
        .validate()
        .map_err(|err| AppError::Validation(err.to_string()))?;
    let event_type = EventTypeRepository::update(&state.db, owner_id, id, &update).await?;
    Ok(Json(event_type))
}

// Availability rules

pub async fn create_availability_rule(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Json(new): Json<NewAvailabilityRule>,
) -> AppResult<(StatusCode, Json<AvailabilityRule>)> {
    new.validate().map_err(AppError::Validation)?;
    let rule = AvailabilityRepository::create(&state.db, owner_id, &new).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

pub async fn list_availability_rules(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
) -> AppResult<Json<Vec<AvailabilityRule>>> {
    let rules = AvailabilityRepository::list_for_owner(&state.db, owner_id).await?;
    Ok(Json(rules))
}

pub async fn delete_availability_rule(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    AvailabilityRepository::delete(&state.db, owner_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// Bookings

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

pub async fn list_bookings(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings =
        BookingRepository::list_for_owner(&state.db, owner_id, query.from, query.to).await?;
    Ok(Json(bookings))
}

/// Manual booking on behalf of a client. Goes through the same admission
/// guard as the public path (no throttle), so owner-entered bookings cannot
/// double-book either.
pub async fn create_booking(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Json(request): Json<BookingRequest>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    EventTypeRepository::find_by_id(&state.db, request.event_type_id)
        .await?
        .filter(|et| et.owner_id == owner_id)
        .ok_or_else(|| AppError::NotFound("Event type not found".to_string()))?;

    let store = PgBookingStore::new(state.db.clone());
    let booking = admit_booking(&store, None, &state.env.booking, &request, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    OwnerId(owner_id): OwnerId,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Booking>> {
    let booking = BookingRepository::cancel(&state.db, owner_id, id).await?;
    Ok(Json(booking))
}
