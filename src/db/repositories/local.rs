//! In-memory repository implementation for unit testing and local
//! development.
//!
//! All state lives in `parking_lot` locks; no I/O is performed. Seeding
//! helpers let tests and the dev server build a realistic population
//! (facilities, students, guardian links) without a database.

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::super::repository::{
    EventRepository, FacilityRepository, FullRepository, RepositoryError, RepositoryResult,
    StudentRepository,
};
use crate::api::{
    EventBooking, EventFilters, EventId, FacilityId, FacilityInfo, LevelId, SectionId, StudentId,
    UserId,
};
use crate::models::{Event, StudentContext};

/// A facility row plus its operational flag.
#[derive(Debug, Clone)]
struct FacilityRecord {
    info: FacilityInfo,
    operational: bool,
}

/// An active-roster row.
#[derive(Debug, Clone, Copy)]
pub struct StudentRecord {
    pub id: StudentId,
    pub section_id: SectionId,
    pub level_id: LevelId,
    pub active: bool,
}

impl StudentRecord {
    fn context(&self) -> StudentContext {
        StudentContext {
            student_id: self.id,
            section_id: self.section_id,
            level_id: self.level_id,
        }
    }
}

/// In-memory implementation of [`FullRepository`].
#[derive(Default)]
pub struct LocalRepository {
    events: RwLock<HashMap<EventId, Event>>,
    facilities: RwLock<HashMap<FacilityId, FacilityRecord>>,
    students: RwLock<HashMap<StudentId, StudentRecord>>,
    level_names: RwLock<HashMap<LevelId, String>>,
    /// User account -> linked students (self for a student account,
    /// children for a guardian account).
    user_students: RwLock<HashMap<UserId, Vec<StudentId>>>,
    attendee_counts: RwLock<HashMap<EventId, i64>>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Seeding helpers ====================

    pub fn add_facility(&self, info: FacilityInfo, operational: bool) {
        self.facilities
            .write()
            .insert(info.id, FacilityRecord { info, operational });
    }

    pub fn add_student(&self, record: StudentRecord) {
        self.students.write().insert(record.id, record);
    }

    pub fn set_level_name(&self, id: LevelId, name: impl Into<String>) {
        self.level_names.write().insert(id, name.into());
    }

    /// Link a user account to the students it represents.
    pub fn link_user_students(&self, user_id: UserId, student_ids: Vec<StudentId>) {
        self.user_students.write().insert(user_id, student_ids);
    }

    pub fn set_attendee_count(&self, event_id: EventId, count: i64) {
        self.attendee_counts.write().insert(event_id, count);
    }

    pub fn event_count(&self) -> usize {
        self.events.read().len()
    }

    // ==================== Filtering ====================

    fn matches_filters(event: &Event, filters: &EventFilters) -> bool {
        if let Some(facility_id) = filters.facility_id {
            if event.facility_id != Some(facility_id) {
                return false;
            }
        }
        if let Some(owner) = filters.owner_user_id {
            if event.owner_user_id != owner {
                return false;
            }
        }
        if let Some(statuses) = &filters.statuses {
            if !statuses.contains(&event.status) {
                return false;
            }
        }
        if let Some(visibilities) = &filters.visibilities {
            if !visibilities.contains(&event.visibility) {
                return false;
            }
        }
        if let Some(term) = &filters.search_term {
            let term = term.to_lowercase();
            if !term.is_empty() && !event.title.to_lowercase().contains(&term) {
                return false;
            }
        }
        true
    }

    fn select(&self, filters: &EventFilters, scanner: Option<UserId>) -> (Vec<Event>, usize) {
        let events = self.events.read();
        let mut matched: Vec<Event> = events
            .values()
            .filter(|e| scanner.map_or(true, |s| e.scanner_ids.contains(&s)))
            .filter(|e| Self::matches_filters(e, filters))
            .cloned()
            .collect();
        // Newest first; id as tiebreaker so ordering is deterministic.
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.value().cmp(&b.id.value()))
        });

        let total = matched.len();
        if filters.disable_pagination {
            return (matched, total);
        }

        let page = filters.page.max(1) as usize;
        let page_size = filters.page_size.max(1) as usize;
        let start = (page - 1) * page_size;
        let page_items = matched.into_iter().skip(start).take(page_size).collect();
        (page_items, total)
    }
}

#[async_trait]
impl EventRepository for LocalRepository {
    async fn create(&self, event: Event) -> RepositoryResult<Event> {
        let mut events = self.events.write();
        if events.contains_key(&event.id) {
            return Err(RepositoryError::query(format!(
                "Event already exists: {}",
                event.id
            )));
        }
        events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update(&self, event: Event) -> RepositoryResult<Event> {
        let mut events = self.events.write();
        if !events.contains_key(&event.id) {
            return Err(RepositoryError::not_found("event", event.id));
        }
        events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: EventId) -> RepositoryResult<Option<Event>> {
        Ok(self.events.read().get(&id).cloned())
    }

    async fn find_by_id_with_facility(
        &self,
        id: EventId,
    ) -> RepositoryResult<Option<(Event, Option<FacilityInfo>)>> {
        let Some(event) = self.events.read().get(&id).cloned() else {
            return Ok(None);
        };
        let facility = event.facility_id.and_then(|fid| {
            self.facilities
                .read()
                .get(&fid)
                .map(|record| record.info.clone())
        });
        Ok(Some((event, facility)))
    }

    async fn find_all(&self, filters: &EventFilters) -> RepositoryResult<(Vec<Event>, usize)> {
        Ok(self.select(filters, None))
    }

    async fn find_all_for_scanner(
        &self,
        scanner_id: UserId,
        filters: &EventFilters,
    ) -> RepositoryResult<(Vec<Event>, usize)> {
        Ok(self.select(filters, Some(scanner_id)))
    }

    async fn find_events_in_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        exclude_id: Option<EventId>,
    ) -> RepositoryResult<Vec<EventBooking>> {
        let events = self.events.read();
        let bookings = events
            .values()
            .filter(|e| Some(e.id) != exclude_id)
            .filter(|e| match (e.start_date, e.end_date) {
                (Some(event_start), Some(event_end)) => {
                    event_start <= end && event_end >= start
                }
                (Some(event_start), None) => event_start >= start && event_start <= end,
                _ => false,
            })
            .map(|e| EventBooking {
                id: e.id,
                title: e.title.clone(),
                facility_id: e.facility_id,
                start_date: e.start_date,
                end_date: e.end_date,
                session_config: e.sessions.clone(),
            })
            .collect();
        Ok(bookings)
    }

    async fn count_event_attendees(&self, event_id: EventId) -> RepositoryResult<i64> {
        Ok(self
            .attendee_counts
            .read()
            .get(&event_id)
            .copied()
            .unwrap_or(0))
    }

    async fn delete_many_by_ids(&self, ids: &[EventId]) -> RepositoryResult<usize> {
        let mut events = self.events.write();
        let mut deleted = 0;
        for id in ids {
            if events.remove(id).is_some() {
                deleted += 1;
            }
        }
        Ok(deleted)
    }
}

#[async_trait]
impl FacilityRepository for LocalRepository {
    async fn facility_exists(&self, id: FacilityId) -> RepositoryResult<bool> {
        Ok(self
            .facilities
            .read()
            .get(&id)
            .is_some_and(|record| record.operational))
    }

    async fn get_operational_facilities(&self) -> RepositoryResult<Vec<FacilityInfo>> {
        let mut facilities: Vec<FacilityInfo> = self
            .facilities
            .read()
            .values()
            .filter(|record| record.operational)
            .map(|record| record.info.clone())
            .collect();
        facilities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(facilities)
    }
}

#[async_trait]
impl StudentRepository for LocalRepository {
    async fn count_active_students(&self) -> RepositoryResult<i64> {
        Ok(self.students.read().values().filter(|s| s.active).count() as i64)
    }

    async fn count_students_by_levels(&self, ids: &[LevelId]) -> RepositoryResult<i64> {
        Ok(self
            .students
            .read()
            .values()
            .filter(|s| s.active && ids.contains(&s.level_id))
            .count() as i64)
    }

    async fn count_students_by_sections(&self, ids: &[SectionId]) -> RepositoryResult<i64> {
        Ok(self
            .students
            .read()
            .values()
            .filter(|s| s.active && ids.contains(&s.section_id))
            .count() as i64)
    }

    async fn get_level_names(
        &self,
        ids: &[LevelId],
    ) -> RepositoryResult<HashMap<LevelId, String>> {
        let names = self.level_names.read();
        Ok(ids
            .iter()
            .filter_map(|id| names.get(id).map(|name| (*id, name.clone())))
            .collect())
    }

    async fn get_student_contexts_for_user(
        &self,
        user_id: UserId,
    ) -> RepositoryResult<Vec<StudentContext>> {
        let links = self.user_students.read();
        let students = self.students.read();
        let contexts = links
            .get(&user_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| students.get(id))
                    .filter(|s| s.active)
                    .map(|s| s.context())
                    .collect()
            })
            .unwrap_or_default();
        Ok(contexts)
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
