use sqlx::PgPool;
use std::sync::Arc;

use crate::config;
use crate::scheduling::rate_limit::RateLimiter;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub env: config::Config,
    pub rate_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(db: PgPool, env: config::Config, rate_limiter: Arc<RateLimiter>) -> Self {
        Self {
            db,
            env,
            rate_limiter,
        }
    }
}
