use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    cancel_booking, create_availability_rule, create_booking, create_event_type,
    delete_availability_rule, get_event_type, list_availability_rules, list_bookings,
    list_event_types, update_event_type,
};
use crate::app_state::AppState;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/event-types", post(create_event_type).get(list_event_types))
        .route(
            "/event-types/{id}",
            get(get_event_type).patch(update_event_type),
        )
        .route(
            "/availability",
            post(create_availability_rule).get(list_availability_rules),
        )
        .route("/availability/{id}", delete(delete_availability_rule))
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/{id}/cancel", post(cancel_booking))
}
