use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::{AvailabilityRule, NewAvailabilityRule};
use crate::db::DatabaseError;

pub struct AvailabilityRepository;

impl AvailabilityRepository {
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        new: &NewAvailabilityRule,
    ) -> Result<AvailabilityRule, DatabaseError> {
        let rule = sqlx::query_as::<_, AvailabilityRule>(
            r#"
            INSERT INTO availability_rules
                (id, owner_id, weekday, date_override, windows, timezone)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(owner_id)
        .bind(new.weekday)
        .bind(new.date_override)
        .bind(Json(&new.windows))
        .bind(&new.timezone)
        .fetch_one(pool)
        .await?;

        Ok(rule)
    }

    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
    ) -> Result<Vec<AvailabilityRule>, DatabaseError> {
        let rules = sqlx::query_as::<_, AvailabilityRule>(
            "SELECT * FROM availability_rules WHERE owner_id = $1 ORDER BY created_at",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(rules)
    }

    /// Rules the slot generator should consider for an owner.
    pub async fn active_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
    ) -> Result<Vec<AvailabilityRule>, DatabaseError> {
        let rules = sqlx::query_as::<_, AvailabilityRule>(
            "SELECT * FROM availability_rules WHERE owner_id = $1 AND active",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(rules)
    }

    pub async fn delete(
        pool: &PgPool,
        owner_id: Uuid,
        id: Uuid,
    ) -> Result<(), DatabaseError> {
        let result =
            sqlx::query("DELETE FROM availability_rules WHERE id = $1 AND owner_id = $2")
                .bind(id)
                .bind(owner_id)
                .execute(pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound);
        }
        Ok(())
    }
}
