use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{EventType, NewEventType, UpdateEventType};
use crate::db::DatabaseError;

pub struct EventTypeRepository;

impl EventTypeRepository {
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        new: &NewEventType,
    ) -> Result<EventType, DatabaseError> {
        let event_type = sqlx::query_as::<_, EventType>(
            r#"
            INSERT INTO event_types
                (id, owner_id, slug, name, description, duration_minutes,
                 buffer_before_minutes, buffer_after_minutes, minimum_notice_minutes,
                 booking_window, location, price_cents)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(owner_id)
        .bind(&new.slug)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.duration_minutes)
        .bind(new.buffer_before_minutes)
        .bind(new.buffer_after_minutes)
        .bind(new.minimum_notice_minutes)
        .bind(Json(&new.booking_window))
        .bind(Json(&new.location))
        .bind(new.price_cents)
        .fetch_one(pool)
        .await?;

        Ok(event_type)
    }

    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
    ) -> Result<Vec<EventType>, DatabaseError> {
        let event_types = sqlx::query_as::<_, EventType>(
            "SELECT * FROM event_types WHERE owner_id = $1 ORDER BY created_at",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(event_types)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<EventType>, DatabaseError> {
        let event_type =
            sqlx::query_as::<_, EventType>("SELECT * FROM event_types WHERE id = $1")
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(event_type)
    }

    /// Public lookup: only active, non-hidden event types are bookable.
    pub async fn find_public_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<EventType>, DatabaseError> {
        let event_type = sqlx::query_as::<_, EventType>(
            "SELECT * FROM event_types WHERE slug = $1 AND active AND NOT hidden LIMIT 1",
        )
        .bind(slug)
        .fetch_optional(pool)
        .await?;

        Ok(event_type)
    }

    pub async fn update(
        pool: &PgPool,
        owner_id: Uuid,
        id: Uuid,
        update: &UpdateEventType,
    ) -> Result<EventType, DatabaseError> {
        let event_type = sqlx::query_as::<_, EventType>(
            r#"
            UPDATE event_types SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                duration_minutes = COALESCE($5, duration_minutes),
                buffer_before_minutes = COALESCE($6, buffer_before_minutes),
                buffer_after_minutes = COALESCE($7, buffer_after_minutes),
                minimum_notice_minutes = COALESCE($8, minimum_notice_minutes),
                booking_window = COALESCE($9, booking_window),
                location = COALESCE($10, location),
                price_cents = COALESCE($11, price_cents),
                active = COALESCE($12, active),
                hidden = COALESCE($13, hidden),
                updated_at = now()
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.duration_minutes)
        .bind(update.buffer_before_minutes)
        .bind(update.buffer_after_minutes)
        .bind(update.minimum_notice_minutes)
        .bind(update.booking_window.as_ref().map(Json))
        .bind(update.location.as_ref().map(Json))
        .bind(update.price_cents)
        .bind(update.active)
        .bind(update.hidden)
        .fetch_optional(pool)
        .await?
        .ok_or(DatabaseError::NotFound)?;

        Ok(event_type)
    }
}
