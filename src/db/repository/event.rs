//! Event repository trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::error::RepositoryResult;
use crate::api::{EventBooking, EventFilters, EventId, UserId};
use crate::models::Event;

/// Repository trait for event CRUD and listing queries.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist a new event.
    ///
    /// # Returns
    /// * `Ok(Event)` - The stored event
    /// * `Err(RepositoryError)` - If the operation fails
    async fn create(&self, event: Event) -> RepositoryResult<Event>;

    /// Replace a stored event wholesale.
    ///
    /// # Returns
    /// * `Ok(Event)` - The stored event
    /// * `Err(RepositoryError::NotFound)` - If no event with this id exists
    async fn update(&self, event: Event) -> RepositoryResult<Event>;

    /// Fetch an event by id. `Ok(None)` when absent.
    async fn find_by_id(&self, id: EventId) -> RepositoryResult<Option<Event>>;

    /// Fetch an event together with its facility record, when one is set.
    async fn find_by_id_with_facility(
        &self,
        id: EventId,
    ) -> RepositoryResult<Option<(Event, Option<crate::api::FacilityInfo>)>>;

    /// List events matching the filters.
    ///
    /// # Returns
    /// * `Ok((events, total))` - One page of events plus the total match
    ///   count before pagination
    async fn find_all(&self, filters: &EventFilters) -> RepositoryResult<(Vec<Event>, usize)>;

    /// List events a scanner account is assigned to, with the same filter
    /// semantics as [`find_all`](Self::find_all).
    async fn find_all_for_scanner(
        &self,
        scanner_id: UserId,
        filters: &EventFilters,
    ) -> RepositoryResult<(Vec<Event>, usize)>;

    /// Events whose date range intersects `[start, end]`, excluding
    /// `exclude_id` when given (self-exclusion while editing). Events
    /// without dates never intersect.
    async fn find_events_in_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        exclude_id: Option<EventId>,
    ) -> RepositoryResult<Vec<EventBooking>>;

    /// Number of recorded attendees for an event.
    async fn count_event_attendees(&self, event_id: EventId) -> RepositoryResult<i64>;

    /// Bulk-delete events by id.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of events actually removed
    async fn delete_many_by_ids(&self, ids: &[EventId]) -> RepositoryResult<usize>;
}
