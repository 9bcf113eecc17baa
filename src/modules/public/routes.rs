use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{create_booking, get_availability};
use crate::app_state::AppState;

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/availability", get(get_availability))
        .route("/bookings", post(create_booking))
}
