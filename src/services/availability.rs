//! Venue availability checking.
//!
//! Given a proposed date range and per-date sessions, computes each
//! operational facility's availability against the events already booked
//! in that range. The check and the subsequent booking are not
//! transactionally linked; see DESIGN.md for the accepted race.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::api::{EventBooking, EventId, FacilityId, FacilityInfo};
use crate::db::repository::FullRepository;
use crate::models::{intervals_overlap, DateSessionConfig, Period};
use crate::services::error::{FieldError, ServiceError, ServiceResult};

/// A proposed booking to test against existing events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Requested sessions, one entry per date.
    #[serde(default)]
    pub dates: Vec<DateSessionConfig>,
    /// Self-exclusion when editing an existing event.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_event_id: Option<EventId>,
}

/// Availability classification of one facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueStatus {
    Available,
    Partial,
    Unavailable,
}

/// One overlap between a requested session and an existing booking.
#[derive(Debug, Clone, Serialize)]
pub struct SessionConflict {
    pub date: NaiveDate,
    pub period: Period,
    /// Time range of the competing session.
    pub opens: String,
    pub closes: String,
    pub event_id: EventId,
    pub event_title: String,
}

/// Availability result for one facility. Computed fresh on every query;
/// never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct VenueAvailability {
    pub facility: FacilityInfo,
    pub status: VenueStatus,
    pub conflicts: Vec<SessionConflict>,
    /// Per-slot availability keyed by `date:period`.
    pub slots: HashMap<String, bool>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AvailabilitySummary {
    pub total: usize,
    pub available: usize,
    pub partial: usize,
    pub unavailable: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResponse {
    pub venues: Vec<VenueAvailability>,
    pub summary: AvailabilitySummary,
}

/// Slot key format shared with API consumers.
pub fn slot_key(date: NaiveDate, period: Period) -> String {
    format!("{}:{}", date, period)
}

/// Check every operational facility against the requested sessions.
pub async fn check_availability(
    repo: &dyn FullRepository,
    request: &AvailabilityRequest,
) -> ServiceResult<AvailabilityResponse> {
    if request.start_date > request.end_date {
        return Err(ServiceError::Validation(vec![FieldError::new(
            "end_date",
            "End date precedes start date",
            "date_range",
        )]));
    }

    let facilities = repo.get_operational_facilities().await?;
    let existing = repo
        .find_events_in_date_range(request.start_date, request.end_date, request.exclude_event_id)
        .await?;

    // Group existing bookings by facility once, so the per-facility loop
    // below never rescans the full event list.
    let mut by_facility: HashMap<FacilityId, Vec<&EventBooking>> = HashMap::new();
    for booking in &existing {
        if let Some(facility_id) = booking.facility_id {
            by_facility.entry(facility_id).or_default().push(booking);
        }
    }

    let venues: Vec<VenueAvailability> = facilities
        .into_iter()
        .map(|facility| {
            let bookings = by_facility.get(&facility.id).map_or(&[][..], Vec::as_slice);
            check_facility(facility, bookings, &request.dates)
        })
        .collect();

    let summary = AvailabilitySummary {
        total: venues.len(),
        available: venues
            .iter()
            .filter(|v| v.status == VenueStatus::Available)
            .count(),
        partial: venues
            .iter()
            .filter(|v| v.status == VenueStatus::Partial)
            .count(),
        unavailable: venues
            .iter()
            .filter(|v| v.status == VenueStatus::Unavailable)
            .count(),
    };

    Ok(AvailabilityResponse { venues, summary })
}

fn check_facility(
    facility: FacilityInfo,
    bookings: &[&EventBooking],
    requested: &[DateSessionConfig],
) -> VenueAvailability {
    let mut conflicts = Vec::new();
    let mut slots: HashMap<String, bool> = HashMap::new();

    for date_config in requested {
        for session in date_config.enabled_sessions() {
            let key = slot_key(date_config.date, session.period);
            let mut slot_free = slots.remove(&key).unwrap_or(true);

            let (Some(opens), Some(closes)) = (session.opens_min(), session.closes_min()) else {
                slots.insert(key, slot_free);
                continue;
            };

            for booking in bookings {
                let Some(existing_day) = booking.session_config.sessions_on(date_config.date)
                else {
                    continue;
                };
                for existing in &existing_day.sessions {
                    let (Some(ex_opens), Some(ex_closes)) =
                        (existing.opens_min(), existing.closes_min())
                    else {
                        continue;
                    };
                    if intervals_overlap(opens, closes, ex_opens, ex_closes) {
                        conflicts.push(SessionConflict {
                            date: date_config.date,
                            period: session.period,
                            opens: existing.opens.clone(),
                            closes: existing.closes.clone(),
                            event_id: booking.id,
                            event_title: booking.title.clone(),
                        });
                        slot_free = false;
                    }
                }
            }

            slots.insert(key, slot_free);
        }
    }

    let status = if conflicts.is_empty() {
        VenueStatus::Available
    } else if slots.values().all(|free| !free) {
        VenueStatus::Unavailable
    } else {
        VenueStatus::Partial
    };

    VenueAvailability {
        facility,
        status,
        conflicts,
        slots,
    }
}
