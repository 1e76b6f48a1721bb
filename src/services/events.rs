//! Event governance service.
//!
//! Caller-facing operations over the repository contract: create/update
//! with the full validation pipeline, workflow actions, role-scoped
//! listings, bulk delete and availability checks.
//!
//! Validation order for create/update: structural field errors are
//! collected in full first, then the facility reference is checked, then
//! lifecycle/authorization. No operation performs a partial write; the
//! repository is only called once every check has passed.

use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

use crate::api::{EventFilters, EventId, FacilityId, FacilityInfo, UserId};
use crate::db::repository::FullRepository;
use crate::models::{
    Actor, AudienceConfig, Event, LifecycleStatus, RegistrationSettings, SessionConfig,
    Visibility,
};
use crate::services::audience::{self, ExpectedAttendees};
use crate::services::availability::{self, AvailabilityRequest, AvailabilityResponse};
use crate::services::clock::Clock;
use crate::services::error::{FieldError, ServiceError, ServiceResult};
use crate::services::lifecycle::{self, WorkflowAction};
use crate::services::schedule;

const MAX_TITLE_LENGTH: usize = 200;

/// One page of events plus the total match count.
#[derive(Debug, Clone, serde::Serialize)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub total: usize,
}

/// Payload for creating an event. Omitted fields fall back to draft
/// defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub facility_id: Option<FacilityId>,
    #[serde(default)]
    pub audience: Option<AudienceConfig>,
    #[serde(default)]
    pub sessions: Option<SessionConfig>,
    #[serde(default)]
    pub scanner_ids: Option<Vec<UserId>>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub registration: Option<RegistrationSettings>,
}

/// Payload for updating an event.
///
/// Every field is optional: an absent field means "leave unchanged" and is
/// never treated as a change, so re-submitting an event's current state
/// produces no diff. An optional workflow action may ride along; `comment`
/// doubles as the approval comment, rejection comment or cancellation
/// reason.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub facility_id: Option<FacilityId>,
    #[serde(default)]
    pub audience: Option<AudienceConfig>,
    #[serde(default)]
    pub sessions: Option<SessionConfig>,
    #[serde(default)]
    pub scanner_ids: Option<Vec<UserId>>,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(default)]
    pub registration: Option<RegistrationSettings>,
    #[serde(default)]
    pub action: Option<WorkflowAction>,
    #[serde(default)]
    pub comment: Option<String>,
}

impl UpdateEventRequest {
    /// Working copy of `event` with the provided fields applied. Status
    /// and audit trail are carried over untouched; the lifecycle
    /// controller alone mutates them.
    fn merged(&self, event: &Event) -> Event {
        let mut updated = event.clone();
        if let Some(title) = &self.title {
            updated.title = title.clone();
        }
        if let Some(description) = &self.description {
            updated.description = Some(description.clone());
        }
        if let Some(poster_url) = &self.poster_url {
            updated.poster_url = Some(poster_url.clone());
        }
        if let Some(start_date) = self.start_date {
            updated.start_date = Some(start_date);
        }
        if let Some(end_date) = self.end_date {
            updated.end_date = Some(end_date);
        }
        if let Some(facility_id) = self.facility_id {
            updated.facility_id = Some(facility_id);
        }
        if let Some(audience) = &self.audience {
            updated.audience = audience.clone();
        }
        if let Some(sessions) = &self.sessions {
            updated.sessions = sessions.clone();
        }
        if let Some(scanner_ids) = &self.scanner_ids {
            updated.scanner_ids = scanner_ids.clone();
        }
        if let Some(visibility) = self.visibility {
            updated.visibility = visibility;
        }
        if let Some(registration) = &self.registration {
            updated.registration = registration.clone();
        }
        updated
    }

    /// Whether any provided field actually differs from the stored event.
    fn has_field_changes(&self, event: &Event) -> bool {
        self.merged(event) != *event
    }

    /// Whether a provided field belongs to the critical set (dates,
    /// session config, audience config, facility, registration) *and*
    /// differs from the stored value. Changing any of these on an
    /// approved event voids the approval.
    fn changes_critical_fields(&self, event: &Event) -> bool {
        if self.start_date.is_some() && self.start_date != event.start_date {
            return true;
        }
        if self.end_date.is_some() && self.end_date != event.end_date {
            return true;
        }
        if self.facility_id.is_some() && self.facility_id != event.facility_id {
            return true;
        }
        if self
            .audience
            .as_ref()
            .is_some_and(|audience| *audience != event.audience)
        {
            return true;
        }
        if self
            .sessions
            .as_ref()
            .is_some_and(|sessions| *sessions != event.sessions)
        {
            return true;
        }
        if self
            .registration
            .as_ref()
            .is_some_and(|registration| *registration != event.registration)
        {
            return true;
        }
        false
    }
}

/// Service facade over a repository and a clock.
pub struct EventService {
    repository: Arc<dyn FullRepository>,
    clock: Arc<dyn Clock>,
}

impl EventService {
    pub fn new(repository: Arc<dyn FullRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    // ==================== Create / Update / Delete ====================

    /// Create a new draft event owned by the actor.
    pub async fn create_event(
        &self,
        actor: &Actor,
        request: CreateEventRequest,
    ) -> ServiceResult<Event> {
        let mut event = Event::draft(actor.user_id, request.title.clone(), self.clock.now());
        event.description = request.description;
        event.poster_url = request.poster_url;
        event.start_date = request.start_date;
        event.end_date = request.end_date;
        event.facility_id = request.facility_id;
        if let Some(audience) = request.audience {
            event.audience = audience;
        }
        if let Some(sessions) = request.sessions {
            event.sessions = sessions;
        }
        if let Some(scanner_ids) = request.scanner_ids {
            event.scanner_ids = scanner_ids;
        }
        if let Some(visibility) = request.visibility {
            event.visibility = visibility;
        }
        if let Some(registration) = request.registration {
            event.registration = registration;
        }

        let errors = validate_event_fields(&event);
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        self.check_facility_reference(event.facility_id).await?;

        if !actor.role.can_own_events() {
            return Err(ServiceError::business_rule(
                "Only teachers, staff or administrators may create events.",
            ));
        }

        debug!(event_id = %event.id, owner = %actor.user_id, "creating event");
        Ok(self.repository.create(event).await?)
    }

    /// Update an event and/or apply a workflow action to it.
    pub async fn update_event(
        &self,
        actor: &Actor,
        id: EventId,
        request: UpdateEventRequest,
    ) -> ServiceResult<Event> {
        let event = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("event", id))?;

        let mut updated = request.merged(&event);
        let errors = validate_event_fields(&updated);
        if !errors.is_empty() {
            return Err(ServiceError::Validation(errors));
        }
        if request.facility_id.is_some() && request.facility_id != event.facility_id {
            self.check_facility_reference(request.facility_id).await?;
        }

        let has_changes = request.has_field_changes(&event);
        lifecycle::authorize_edit(&event, actor, has_changes, request.action)?;

        let critical_change = request.changes_critical_fields(&event);
        lifecycle::downgrade_on_critical_change(
            &mut updated,
            critical_change,
            request.action,
            self.clock.as_ref(),
        );
        if let Some(action) = request.action {
            lifecycle::apply_action(
                &mut updated,
                action,
                actor,
                request.comment.as_deref(),
                self.clock.as_ref(),
            )?;
        }

        updated.updated_at = self.clock.now();
        Ok(self.repository.update(updated).await?)
    }

    /// Bulk-delete events. Administrators only; this is the single path
    /// that hard-deletes.
    pub async fn delete_events(&self, actor: &Actor, ids: &[EventId]) -> ServiceResult<usize> {
        if !actor.is_admin() {
            return Err(ServiceError::business_rule(
                "Only an administrator may delete events.",
            ));
        }
        Ok(self.repository.delete_many_by_ids(ids).await?)
    }

    // ==================== Lookups and listings ====================

    pub async fn get_event(&self, id: EventId) -> ServiceResult<Event> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("event", id))
    }

    pub async fn get_event_with_facility(
        &self,
        id: EventId,
    ) -> ServiceResult<(Event, Option<FacilityInfo>)> {
        self.repository
            .find_by_id_with_facility(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("event", id))
    }

    /// Unrestricted listing with the caller's filters. Administrators only.
    pub async fn list_events(
        &self,
        actor: &Actor,
        filters: &EventFilters,
    ) -> ServiceResult<EventPage> {
        if !actor.is_admin() {
            return Err(ServiceError::business_rule(
                "Only an administrator may list all events.",
            ));
        }
        let (events, total) = self.repository.find_all(filters).await?;
        Ok(EventPage { events, total })
    }

    /// Events owned by the calling organizer.
    pub async fn list_organizer_events(
        &self,
        actor: &Actor,
        filters: &EventFilters,
    ) -> ServiceResult<EventPage> {
        let mut filters = filters.clone();
        filters.owner_user_id = Some(actor.user_id);
        let (events, total) = self.repository.find_all(&filters).await?;
        Ok(EventPage { events, total })
    }

    /// Published events visible to the calling student, audience-scoped
    /// through their group memberships.
    pub async fn list_student_events(
        &self,
        actor: &Actor,
        filters: &EventFilters,
    ) -> ServiceResult<EventPage> {
        self.list_audience_scoped(actor.user_id, filters, &[Visibility::Student, Visibility::Public])
            .await
    }

    /// Published events visible to any of the calling guardian's children.
    pub async fn list_parent_events(
        &self,
        actor: &Actor,
        filters: &EventFilters,
    ) -> ServiceResult<EventPage> {
        self.list_audience_scoped(actor.user_id, filters, &[Visibility::Student, Visibility::Public])
            .await
    }

    /// Published, publicly visible events. No actor required.
    pub async fn list_public_events(&self, filters: &EventFilters) -> ServiceResult<EventPage> {
        let mut filters = filters.clone();
        filters.statuses = Some(vec![LifecycleStatus::Published]);
        filters.visibilities = Some(vec![Visibility::Public]);
        let (events, total) = self.repository.find_all(&filters).await?;
        Ok(EventPage { events, total })
    }

    /// Events the calling scanner account is assigned to.
    pub async fn list_scanner_events(
        &self,
        actor: &Actor,
        filters: &EventFilters,
    ) -> ServiceResult<EventPage> {
        let (events, total) = self
            .repository
            .find_all_for_scanner(actor.user_id, filters)
            .await?;
        Ok(EventPage { events, total })
    }

    async fn list_audience_scoped(
        &self,
        user_id: UserId,
        filters: &EventFilters,
        visibilities: &[Visibility],
    ) -> ServiceResult<EventPage> {
        let contexts = self
            .repository
            .get_student_contexts_for_user(user_id)
            .await?;

        // Audience membership cannot be filtered at the storage layer, so
        // fetch the full candidate set and page in memory.
        let mut unpaged = filters.clone();
        unpaged.disable_pagination = true;
        unpaged.statuses = Some(vec![LifecycleStatus::Published]);
        unpaged.visibilities = Some(visibilities.to_vec());
        let (candidates, _) = self.repository.find_all(&unpaged).await?;

        let eligible: Vec<Event> = candidates
            .into_iter()
            .filter(|event| {
                contexts
                    .iter()
                    .any(|ctx| audience::is_student_eligible(&event.audience, ctx))
            })
            .collect();

        let total = eligible.len();
        if filters.disable_pagination {
            return Ok(EventPage {
                events: eligible,
                total,
            });
        }
        let page = filters.page.max(1) as usize;
        let page_size = filters.page_size.max(1) as usize;
        let events = eligible
            .into_iter()
            .skip((page - 1) * page_size)
            .take(page_size)
            .collect();
        Ok(EventPage { events, total })
    }

    // ==================== Derived queries ====================

    /// Expected attendee count and audience summary for an event.
    pub async fn expected_attendees(&self, id: EventId) -> ServiceResult<ExpectedAttendees> {
        let event = self.get_event(id).await?;
        Ok(audience::expected_attendees(self.repository.as_ref(), &event.audience).await?)
    }

    /// Recorded attendee count for an event.
    pub async fn attendee_count(&self, id: EventId) -> ServiceResult<i64> {
        Ok(self.repository.count_event_attendees(id).await?)
    }

    /// Venue availability for a proposed booking.
    pub async fn check_availability(
        &self,
        request: &AvailabilityRequest,
    ) -> ServiceResult<AvailabilityResponse> {
        availability::check_availability(self.repository.as_ref(), request).await
    }

    /// All operational facilities.
    pub async fn list_facilities(&self) -> ServiceResult<Vec<FacilityInfo>> {
        Ok(self.repository.get_operational_facilities().await?)
    }

    async fn check_facility_reference(&self, facility_id: Option<FacilityId>) -> ServiceResult<()> {
        if let Some(facility_id) = facility_id {
            if !self.repository.facility_exists(facility_id).await? {
                return Err(ServiceError::not_found("facility", facility_id));
            }
        }
        Ok(())
    }
}

/// Structural validation of an event's fields and configs. Collects every
/// violation; never stops at the first.
fn validate_event_fields(event: &Event) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if event.title.trim().is_empty() {
        errors.push(FieldError::new("title", "Title is required", "required"));
    } else if event.title.chars().count() > MAX_TITLE_LENGTH {
        errors.push(FieldError::new(
            "title",
            format!("Title exceeds {} characters", MAX_TITLE_LENGTH),
            "too_long",
        ));
    }

    if let (Some(start), Some(end)) = (event.start_date, event.end_date) {
        if start > end {
            errors.push(FieldError::new(
                "end_date",
                "End date precedes start date",
                "date_range",
            ));
        }
    }

    if let (Some(opens), Some(closes)) =
        (event.registration.opens_at, event.registration.closes_at)
    {
        if opens >= closes {
            errors.push(FieldError::new(
                "registration.closes_at",
                "Registration must open before it closes",
                "window_order",
            ));
        }
    }
    if let Some(capacity) = event.registration.capacity {
        if capacity <= 0 {
            errors.push(FieldError::new(
                "registration.capacity",
                "Capacity must be a positive number",
                "capacity_positive",
            ));
        }
    }

    errors.extend(audience::validate_config(&event.audience));

    if let Some(finding) = schedule::first_error(&event.sessions) {
        errors.push(FieldError::new(
            format!("sessions[{}]", finding.date),
            finding.message.clone(),
            finding.code,
        ));
    }

    errors
}
