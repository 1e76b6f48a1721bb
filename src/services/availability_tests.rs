#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Utc};

    use crate::api::{FacilityId, FacilityInfo, UserId};
    use crate::db::repositories::LocalRepository;
    use crate::db::repository::EventRepository;
    use crate::models::{
        DateSessionConfig, Direction, Event, Period, Session, SessionConfig,
    };
    use crate::services::availability::{
        check_availability, slot_key, AvailabilityRequest, VenueStatus,
    };

    fn session(id: &str, period: Period, opens: &str, closes: &str) -> Session {
        Session {
            id: id.to_string(),
            name: id.to_string(),
            period,
            direction: Direction::Out,
            opens: opens.to_string(),
            closes: closes.to_string(),
            late_after: None,
        }
    }

    fn day(date: NaiveDate, sessions: Vec<Session>) -> DateSessionConfig {
        DateSessionConfig {
            date,
            enabled_periods: Period::ALL.to_vec(),
            sessions,
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 5).unwrap()
    }

    fn facility(name: &str) -> FacilityInfo {
        FacilityInfo {
            id: FacilityId::generate(),
            name: name.to_string(),
            location: "Main campus".to_string(),
            image_url: None,
            capacity: Some(300),
        }
    }

    async fn seed_booked_event(
        repo: &LocalRepository,
        facility_id: FacilityId,
        sessions: Vec<DateSessionConfig>,
    ) -> Event {
        let mut event = Event::draft(UserId::generate(), "Existing event".to_string(), Utc::now());
        event.facility_id = Some(facility_id);
        event.start_date = sessions.first().map(|d| d.date);
        event.end_date = sessions.last().map(|d| d.date);
        event.sessions = SessionConfig {
            version: 1,
            dates: sessions,
        };
        repo.create(event.clone()).await.unwrap()
    }

    fn request(dates: Vec<DateSessionConfig>) -> AvailabilityRequest {
        AvailabilityRequest {
            start_date: dates.first().map(|d| d.date).unwrap_or_else(date),
            end_date: dates.last().map(|d| d.date).unwrap_or_else(date),
            dates,
            exclude_event_id: None,
        }
    }

    #[tokio::test]
    async fn test_no_bookings_means_available() {
        let repo = LocalRepository::new();
        let hall = facility("Assembly hall");
        repo.add_facility(hall.clone(), true);

        let response = check_availability(
            &repo,
            &request(vec![day(date(), vec![session("s", Period::Morning, "08:00", "10:00")])]),
        )
        .await
        .unwrap();

        assert_eq!(response.venues.len(), 1);
        assert_eq!(response.venues[0].status, VenueStatus::Available);
        assert!(response.venues[0].conflicts.is_empty());
        assert_eq!(response.summary.available, 1);
    }

    #[tokio::test]
    async fn test_overlapping_booking_is_unavailable_when_only_slot() {
        let repo = LocalRepository::new();
        let hall = facility("Assembly hall");
        repo.add_facility(hall.clone(), true);
        seed_booked_event(
            &repo,
            hall.id,
            vec![day(date(), vec![session("theirs", Period::Morning, "08:00", "10:00")])],
        )
        .await;

        let response = check_availability(
            &repo,
            &request(vec![day(date(), vec![session("ours", Period::Morning, "09:30", "11:00")])]),
        )
        .await
        .unwrap();

        let venue = &response.venues[0];
        assert_eq!(venue.status, VenueStatus::Unavailable);
        assert_eq!(venue.conflicts.len(), 1);
        assert_eq!(venue.conflicts[0].opens, "08:00");
        assert_eq!(venue.conflicts[0].event_title, "Existing event");
        assert_eq!(venue.slots.get(&slot_key(date(), Period::Morning)), Some(&false));
    }

    #[tokio::test]
    async fn test_partial_when_one_of_two_slots_conflicts() {
        let repo = LocalRepository::new();
        let hall = facility("Assembly hall");
        repo.add_facility(hall.clone(), true);
        seed_booked_event(
            &repo,
            hall.id,
            vec![day(date(), vec![session("theirs", Period::Morning, "08:00", "10:00")])],
        )
        .await;

        let response = check_availability(
            &repo,
            &request(vec![day(
                date(),
                vec![
                    session("am", Period::Morning, "09:30", "11:00"),
                    session("pm", Period::Afternoon, "14:00", "16:00"),
                ],
            )]),
        )
        .await
        .unwrap();

        let venue = &response.venues[0];
        assert_eq!(venue.status, VenueStatus::Partial);
        assert_eq!(venue.slots.get(&slot_key(date(), Period::Morning)), Some(&false));
        assert_eq!(venue.slots.get(&slot_key(date(), Period::Afternoon)), Some(&true));
    }

    #[tokio::test]
    async fn test_back_to_back_bookings_do_not_conflict() {
        let repo = LocalRepository::new();
        let hall = facility("Assembly hall");
        repo.add_facility(hall.clone(), true);
        seed_booked_event(
            &repo,
            hall.id,
            vec![day(date(), vec![session("theirs", Period::Morning, "08:00", "10:00")])],
        )
        .await;

        let response = check_availability(
            &repo,
            &request(vec![day(date(), vec![session("ours", Period::Morning, "10:00", "12:00")])]),
        )
        .await
        .unwrap();

        assert_eq!(response.venues[0].status, VenueStatus::Available);
    }

    #[tokio::test]
    async fn test_booking_at_other_facility_does_not_conflict() {
        let repo = LocalRepository::new();
        let hall = facility("Assembly hall");
        let gym = facility("Gymnasium");
        repo.add_facility(hall.clone(), true);
        repo.add_facility(gym.clone(), true);
        seed_booked_event(
            &repo,
            gym.id,
            vec![day(date(), vec![session("theirs", Period::Morning, "08:00", "10:00")])],
        )
        .await;

        let response = check_availability(
            &repo,
            &request(vec![day(date(), vec![session("ours", Period::Morning, "08:30", "09:30")])]),
        )
        .await
        .unwrap();

        // Facilities are sorted by name: hall first, then gym.
        let hall_result = response
            .venues
            .iter()
            .find(|v| v.facility.id == hall.id)
            .unwrap();
        let gym_result = response
            .venues
            .iter()
            .find(|v| v.facility.id == gym.id)
            .unwrap();
        assert_eq!(hall_result.status, VenueStatus::Available);
        assert_eq!(gym_result.status, VenueStatus::Unavailable);
    }

    #[tokio::test]
    async fn test_exclude_event_id_skips_own_booking() {
        let repo = LocalRepository::new();
        let hall = facility("Assembly hall");
        repo.add_facility(hall.clone(), true);
        let own = seed_booked_event(
            &repo,
            hall.id,
            vec![day(date(), vec![session("mine", Period::Morning, "08:00", "10:00")])],
        )
        .await;

        let mut req = request(vec![day(
            date(),
            vec![session("mine", Period::Morning, "08:00", "10:00")],
        )]);
        req.exclude_event_id = Some(own.id);

        let response = check_availability(&repo, &req).await.unwrap();
        assert_eq!(response.venues[0].status, VenueStatus::Available);
    }

    #[tokio::test]
    async fn test_non_operational_facilities_are_not_reported() {
        let repo = LocalRepository::new();
        repo.add_facility(facility("Closed wing"), false);
        let response = check_availability(&repo, &request(vec![])).await.unwrap();
        assert!(response.venues.is_empty());
        assert_eq!(response.summary.total, 0);
    }

    #[tokio::test]
    async fn test_inverted_date_range_is_a_validation_error() {
        let repo = LocalRepository::new();
        let mut req = request(vec![]);
        req.start_date = NaiveDate::from_ymd_opt(2026, 10, 6).unwrap();
        req.end_date = NaiveDate::from_ymd_opt(2026, 10, 5).unwrap();
        let err = check_availability(&repo, &req).await.unwrap_err();
        assert!(matches!(
            err,
            crate::services::error::ServiceError::Validation(_)
        ));
    }
}
