//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS for development; restrict at the gateway in production.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Event CRUD and workflow
        .route("/events", get(handlers::list_events))
        .route("/events", post(handlers::create_event))
        .route("/events/bulk-delete", post(handlers::bulk_delete_events))
        .route("/events/{event_id}", get(handlers::get_event))
        .route("/events/{event_id}", patch(handlers::update_event))
        // Derived event queries
        .route(
            "/events/{event_id}/expected-attendees",
            get(handlers::expected_attendees),
        )
        .route(
            "/events/{event_id}/attendees/count",
            get(handlers::attendee_count),
        )
        // Role-scoped listings
        .route("/organizer/events", get(handlers::list_organizer_events))
        .route("/student/events", get(handlers::list_student_events))
        .route("/parent/events", get(handlers::list_parent_events))
        .route("/public/events", get(handlers::list_public_events))
        .route("/scanner/events", get(handlers::list_scanner_events))
        // Facilities
        .route("/facilities", get(handlers::list_facilities))
        .route(
            "/facilities/availability",
            post(handlers::check_availability),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;
    use std::sync::Arc;

    #[test]
    fn test_router_creation() {
        let repo =
            Arc::new(LocalRepository::new()) as Arc<dyn crate::db::repository::FullRepository>;
        let state = AppState::new(repo);
        let _router = create_router(state);
    }
}
