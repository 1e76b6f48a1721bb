//! Data Transfer Objects for the HTTP API.
//!
//! Most payloads are the service-layer types themselves, which already
//! derive Serialize/Deserialize; this module adds the thin wrappers and
//! query types the REST surface needs.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::AppError;
use crate::api::{EventFilters, EventId, FacilityId, FacilityInfo, LifecycleStatus, Visibility};
use crate::models::Event;

// Payload types reused directly from the service layer.
pub use crate::services::audience::ExpectedAttendees;
pub use crate::services::availability::{AvailabilityRequest, AvailabilityResponse};
pub use crate::services::events::{CreateEventRequest, UpdateEventRequest};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

/// Paginated event listing response.
#[derive(Debug, Clone, Serialize)]
pub struct EventListResponse {
    pub events: Vec<Event>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
}

/// Event detail with its facility resolved.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetailResponse {
    pub event: Event,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<FacilityInfo>,
}

/// Query parameters accepted by the listing endpoints.
///
/// `status` takes a comma-separated list, e.g. `status=draft,approved`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub facility_id: Option<FacilityId>,
    pub search: Option<String>,
    pub status: Option<String>,
    pub visibility: Option<Visibility>,
}

impl ListQuery {
    pub fn into_filters(self) -> Result<EventFilters, AppError> {
        let mut filters = EventFilters::default();
        if let Some(page) = self.page {
            filters.page = page.max(1);
        }
        if let Some(page_size) = self.page_size {
            filters.page_size = page_size.clamp(1, 100);
        }
        filters.facility_id = self.facility_id;
        filters.search_term = self.search;
        if let Some(status) = &self.status {
            let statuses = status
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(LifecycleStatus::from_str)
                .collect::<Result<Vec<_>, _>>()
                .map_err(AppError::BadRequest)?;
            if !statuses.is_empty() {
                filters.statuses = Some(statuses);
            }
        }
        if let Some(visibility) = self.visibility {
            filters.visibilities = Some(vec![visibility]);
        }
        Ok(filters)
    }
}

/// Request body for the bulk-delete endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<EventId>,
}

/// Response for the bulk-delete endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct BulkDeleteResponse {
    pub deleted: usize,
}

/// Response for the attendee-count endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AttendeeCountResponse {
    pub count: i64,
}

/// Facility listing response.
#[derive(Debug, Clone, Serialize)]
pub struct FacilityListResponse {
    pub facilities: Vec<FacilityInfo>,
    pub total: usize,
}
