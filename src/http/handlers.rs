//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::auth::CallerIdentity;
use super::dto::{
    AttendeeCountResponse, AvailabilityRequest, AvailabilityResponse, BulkDeleteRequest,
    BulkDeleteResponse, CreateEventRequest, EventDetailResponse, EventListResponse,
    ExpectedAttendees, FacilityListResponse, HealthResponse, ListQuery, UpdateEventRequest,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{EventFilters, EventId};
use crate::db::repository::FullRepository;
use crate::services::events::EventPage;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn list_response(page: EventPage, filters: &EventFilters) -> EventListResponse {
    EventListResponse {
        events: page.events,
        total: page.total,
        page: filters.page,
        page_size: filters.page_size,
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let database = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database,
    }))
}

// =============================================================================
// Event CRUD and workflow
// =============================================================================

/// POST /v1/events
pub async fn create_event(
    State(state): State<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<crate::models::Event>), AppError> {
    let event = state.events().create_event(&actor, request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /v1/events/{event_id}
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> HandlerResult<EventDetailResponse> {
    let (event, facility) = state.events().get_event_with_facility(event_id).await?;
    Ok(Json(EventDetailResponse { event, facility }))
}

/// PATCH /v1/events/{event_id}
///
/// Field updates and workflow actions share this endpoint; an `action`
/// in the body drives the lifecycle state machine.
pub async fn update_event(
    State(state): State<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Path(event_id): Path<EventId>,
    Json(request): Json<UpdateEventRequest>,
) -> HandlerResult<crate::models::Event> {
    let event = state.events().update_event(&actor, event_id, request).await?;
    Ok(Json(event))
}

/// GET /v1/events
///
/// Unrestricted listing, administrators only.
pub async fn list_events(
    State(state): State<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Query(query): Query<ListQuery>,
) -> HandlerResult<EventListResponse> {
    let filters = query.into_filters()?;
    let page = state.events().list_events(&actor, &filters).await?;
    Ok(Json(list_response(page, &filters)))
}

/// POST /v1/events/bulk-delete
pub async fn bulk_delete_events(
    State(state): State<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Json(request): Json<BulkDeleteRequest>,
) -> HandlerResult<BulkDeleteResponse> {
    let deleted = state.events().delete_events(&actor, &request.ids).await?;
    Ok(Json(BulkDeleteResponse { deleted }))
}

// =============================================================================
// Derived event queries
// =============================================================================

/// GET /v1/events/{event_id}/expected-attendees
pub async fn expected_attendees(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> HandlerResult<ExpectedAttendees> {
    Ok(Json(state.events().expected_attendees(event_id).await?))
}

/// GET /v1/events/{event_id}/attendees/count
pub async fn attendee_count(
    State(state): State<AppState>,
    Path(event_id): Path<EventId>,
) -> HandlerResult<AttendeeCountResponse> {
    let count = state.events().attendee_count(event_id).await?;
    Ok(Json(AttendeeCountResponse { count }))
}

// =============================================================================
// Role-scoped listings
// =============================================================================

/// GET /v1/organizer/events
pub async fn list_organizer_events(
    State(state): State<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Query(query): Query<ListQuery>,
) -> HandlerResult<EventListResponse> {
    let filters = query.into_filters()?;
    let page = state.events().list_organizer_events(&actor, &filters).await?;
    Ok(Json(list_response(page, &filters)))
}

/// GET /v1/student/events
pub async fn list_student_events(
    State(state): State<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Query(query): Query<ListQuery>,
) -> HandlerResult<EventListResponse> {
    let filters = query.into_filters()?;
    let page = state.events().list_student_events(&actor, &filters).await?;
    Ok(Json(list_response(page, &filters)))
}

/// GET /v1/parent/events
pub async fn list_parent_events(
    State(state): State<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Query(query): Query<ListQuery>,
) -> HandlerResult<EventListResponse> {
    let filters = query.into_filters()?;
    let page = state.events().list_parent_events(&actor, &filters).await?;
    Ok(Json(list_response(page, &filters)))
}

/// GET /v1/public/events
///
/// The one listing that requires no caller identity.
pub async fn list_public_events(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> HandlerResult<EventListResponse> {
    let filters = query.into_filters()?;
    let page = state.events().list_public_events(&filters).await?;
    Ok(Json(list_response(page, &filters)))
}

/// GET /v1/scanner/events
pub async fn list_scanner_events(
    State(state): State<AppState>,
    CallerIdentity(actor): CallerIdentity,
    Query(query): Query<ListQuery>,
) -> HandlerResult<EventListResponse> {
    let filters = query.into_filters()?;
    let page = state.events().list_scanner_events(&actor, &filters).await?;
    Ok(Json(list_response(page, &filters)))
}

// =============================================================================
// Facilities
// =============================================================================

/// GET /v1/facilities
pub async fn list_facilities(State(state): State<AppState>) -> HandlerResult<FacilityListResponse> {
    let facilities = state.events().list_facilities().await?;
    let total = facilities.len();
    Ok(Json(FacilityListResponse { facilities, total }))
}

/// POST /v1/facilities/availability
pub async fn check_availability(
    State(state): State<AppState>,
    Json(request): Json<AvailabilityRequest>,
) -> HandlerResult<AvailabilityResponse> {
    Ok(Json(state.events().check_availability(&request).await?))
}
