use axum::{middleware, routing::get, Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    app_state::AppState,
    middleware::tracing::request_tracing,
    modules::{admin::routes::admin_routes, public::routes::public_routes},
};

pub fn create_router(state: AppState) -> Router {
    // The public widget is embedded cross-origin; the admin API sits behind
    // the same-origin gateway and needs no CORS.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(hello))
        .route("/health", get(health_check))
        .nest("/api/public", public_routes().layer(cors))
        .nest("/api/admin", admin_routes())
        .layer(middleware::from_fn(request_tracing))
        .with_state(state)
}

async fn hello() -> &'static str {
    "Shutterbook says hello!\n"
}

async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    let db_result = sqlx::query("SELECT 1").execute(&state.db).await;

    let db_status = match db_result {
        Ok(_) => "healthy",
        Err(e) => {
            tracing::info!("Database health check failed: {}", e);
            "unhealthy"
        }
    };

    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": db_status,
        }
    }))
}
