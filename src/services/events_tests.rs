#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::sync::Arc;

    use crate::api::{EventFilters, FacilityId, FacilityInfo, LevelId, SectionId, StudentId, UserId};
    use crate::db::repositories::local::{LocalRepository, StudentRecord};
    use crate::db::repository::EventRepository;
    use crate::models::{
        Actor, AudienceConfig, AudienceRule, AudienceTarget, Event, LifecycleStatus, Role,
        Visibility,
    };
    use crate::services::clock::FixedClock;
    use crate::services::error::ServiceError;
    use crate::services::events::{CreateEventRequest, EventService, UpdateEventRequest};
    use crate::services::lifecycle::WorkflowAction;

    struct Harness {
        repo: Arc<LocalRepository>,
        service: EventService,
        owner: Actor,
        admin: Actor,
    }

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 20, 12, 0, 0).unwrap()
    }

    fn harness() -> Harness {
        let repo = Arc::new(LocalRepository::new());
        let service = EventService::new(repo.clone(), Arc::new(FixedClock(now())));
        Harness {
            repo,
            service,
            owner: Actor::new(UserId::generate(), Role::Teacher),
            admin: Actor::new(UserId::generate(), Role::Admin),
        }
    }

    fn create_request(title: &str) -> CreateEventRequest {
        CreateEventRequest {
            title: title.to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 9, 10),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 12),
            ..CreateEventRequest::default()
        }
    }

    async fn seed_event(h: &Harness, status: LifecycleStatus, visibility: Visibility) -> Event {
        let mut event = Event::draft(h.owner.user_id, "Seeded".to_string(), now());
        event.status = status;
        event.visibility = visibility;
        h.repo.create(event).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_produces_owned_draft() {
        let h = harness();
        let event = h
            .service
            .create_event(&h.owner, create_request("Open day"))
            .await
            .unwrap();
        assert_eq!(event.status, LifecycleStatus::Draft);
        assert_eq!(event.owner_user_id, h.owner.user_id);
        assert_eq!(event.created_at, now());
        assert_eq!(h.repo.event_count(), 1);
    }

    #[tokio::test]
    async fn test_create_collects_all_field_errors() {
        let h = harness();
        let mut request = create_request("   ");
        request.start_date = NaiveDate::from_ymd_opt(2026, 9, 12);
        request.end_date = NaiveDate::from_ymd_opt(2026, 9, 10);
        let err = h.service.create_event(&h.owner, request).await.unwrap_err();
        match err {
            ServiceError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.field == "title"));
                assert!(errors.iter().any(|e| e.field == "end_date"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert_eq!(h.repo.event_count(), 0);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_facility() {
        let h = harness();
        let mut request = create_request("Open day");
        request.facility_id = Some(FacilityId::generate());
        let err = h.service.create_event(&h.owner, request).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::NotFound {
                resource: "facility",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_non_owner_roles() {
        let h = harness();
        let student = Actor::new(UserId::generate(), Role::Student);
        let err = h
            .service
            .create_event(&student, create_request("Open day"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BusinessRule(_)));
    }

    #[tokio::test]
    async fn test_empty_update_changes_nothing_but_updated_at() {
        let h = harness();
        let event = h
            .service
            .create_event(&h.owner, create_request("Open day"))
            .await
            .unwrap();
        let updated = h
            .service
            .update_event(&h.owner, event.id, UpdateEventRequest::default())
            .await
            .unwrap();
        assert_eq!(updated.title, event.title);
        assert_eq!(updated.status, event.status);
        assert_eq!(updated.audience, event.audience);
    }

    #[tokio::test]
    async fn test_update_unknown_event_is_not_found() {
        let h = harness();
        let err = h
            .service
            .update_event(&h.owner, crate::api::EventId::generate(), UpdateEventRequest::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { resource: "event", .. }));
    }

    #[tokio::test]
    async fn test_workflow_through_update_requests() {
        let h = harness();
        let event = h
            .service
            .create_event(&h.owner, create_request("Open day"))
            .await
            .unwrap();

        let request = UpdateEventRequest {
            action: Some(WorkflowAction::SubmitForApproval),
            ..UpdateEventRequest::default()
        };
        let event = h
            .service
            .update_event(&h.owner, event.id, request)
            .await
            .unwrap();
        assert_eq!(event.status, LifecycleStatus::PendingApproval);

        let request = UpdateEventRequest {
            action: Some(WorkflowAction::Approve),
            comment: Some("Go ahead".to_string()),
            ..UpdateEventRequest::default()
        };
        let event = h
            .service
            .update_event(&h.admin, event.id, request)
            .await
            .unwrap();
        assert_eq!(event.status, LifecycleStatus::Approved);
        assert_eq!(event.audit.approval_comment.as_deref(), Some("Go ahead"));
    }

    #[tokio::test]
    async fn test_critical_edit_downgrades_approved_event() {
        let h = harness();
        let event = h
            .service
            .create_event(&h.owner, create_request("Open day"))
            .await
            .unwrap();
        let event = h
            .service
            .update_event(
                &h.owner,
                event.id,
                UpdateEventRequest {
                    action: Some(WorkflowAction::SubmitForApproval),
                    ..UpdateEventRequest::default()
                },
            )
            .await
            .unwrap();
        let event = h
            .service
            .update_event(
                &h.admin,
                event.id,
                UpdateEventRequest {
                    action: Some(WorkflowAction::Approve),
                    ..UpdateEventRequest::default()
                },
            )
            .await
            .unwrap();

        // Moving the start date voids the approval.
        let updated = h
            .service
            .update_event(
                &h.admin,
                event.id,
                UpdateEventRequest {
                    start_date: NaiveDate::from_ymd_opt(2026, 9, 11),
                    ..UpdateEventRequest::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, LifecycleStatus::PendingApproval);
        assert!(updated.audit.approved_by.is_none());
    }

    #[tokio::test]
    async fn test_description_edit_keeps_approval() {
        let h = harness();
        let event = h
            .service
            .create_event(&h.owner, create_request("Open day"))
            .await
            .unwrap();
        for (actor, action) in [
            (&h.owner, WorkflowAction::SubmitForApproval),
            (&h.admin, WorkflowAction::Approve),
        ] {
            h.service
                .update_event(
                    actor,
                    event.id,
                    UpdateEventRequest {
                        action: Some(action),
                        ..UpdateEventRequest::default()
                    },
                )
                .await
                .unwrap();
        }

        let updated = h
            .service
            .update_event(
                &h.admin,
                event.id,
                UpdateEventRequest {
                    description: Some("New wording".to_string()),
                    ..UpdateEventRequest::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, LifecycleStatus::Approved);
    }

    #[tokio::test]
    async fn test_delete_is_admin_only() {
        let h = harness();
        let event = h
            .service
            .create_event(&h.owner, create_request("Open day"))
            .await
            .unwrap();

        let err = h
            .service
            .delete_events(&h.owner, &[event.id])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BusinessRule(_)));

        let deleted = h.service.delete_events(&h.admin, &[event.id]).await.unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(h.repo.event_count(), 0);
    }

    #[tokio::test]
    async fn test_organizer_listing_is_owner_scoped() {
        let h = harness();
        h.service
            .create_event(&h.owner, create_request("Mine"))
            .await
            .unwrap();
        let other = Actor::new(UserId::generate(), Role::Staff);
        h.service
            .create_event(&other, create_request("Theirs"))
            .await
            .unwrap();

        let page = h
            .service
            .list_organizer_events(&h.owner, &EventFilters::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.events[0].title, "Mine");
    }

    #[tokio::test]
    async fn test_admin_listing_requires_admin() {
        let h = harness();
        let err = h
            .service
            .list_events(&h.owner, &EventFilters::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BusinessRule(_)));

        h.service
            .create_event(&h.owner, create_request("Open day"))
            .await
            .unwrap();
        let page = h
            .service
            .list_events(&h.admin, &EventFilters::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_public_listing_only_shows_published_public() {
        let h = harness();
        seed_event(&h, LifecycleStatus::Published, Visibility::Public).await;
        seed_event(&h, LifecycleStatus::Published, Visibility::Student).await;
        seed_event(&h, LifecycleStatus::Draft, Visibility::Public).await;

        let page = h
            .service
            .list_public_events(&EventFilters::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.events[0].visibility, Visibility::Public);
    }

    #[tokio::test]
    async fn test_student_listing_is_audience_scoped() {
        let h = harness();
        let level = LevelId::generate();
        let other_level = LevelId::generate();
        let section = SectionId::generate();
        let student_id = StudentId::generate();
        let account = UserId::generate();
        h.repo.add_student(StudentRecord {
            id: student_id,
            section_id: section,
            level_id: level,
            active: true,
        });
        h.repo.link_user_students(account, vec![student_id]);

        let mut visible = Event::draft(h.owner.user_id, "For my grade".to_string(), now());
        visible.status = LifecycleStatus::Published;
        visible.visibility = Visibility::Student;
        visible.audience = AudienceConfig {
            version: 1,
            rules: vec![AudienceRule::include(AudienceTarget::Level {
                level_ids: vec![level],
            })],
        };
        h.repo.create(visible).await.unwrap();

        let mut hidden = Event::draft(h.owner.user_id, "Other grade".to_string(), now());
        hidden.status = LifecycleStatus::Published;
        hidden.visibility = Visibility::Student;
        hidden.audience = AudienceConfig {
            version: 1,
            rules: vec![AudienceRule::include(AudienceTarget::Level {
                level_ids: vec![other_level],
            })],
        };
        h.repo.create(hidden).await.unwrap();

        let student = Actor::new(account, Role::Student);
        let page = h
            .service
            .list_student_events(&student, &EventFilters::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.events[0].title, "For my grade");
    }

    #[tokio::test]
    async fn test_scanner_listing_uses_assignments() {
        let h = harness();
        let scanner = Actor::new(UserId::generate(), Role::Staff);
        let mut request = create_request("Scanned");
        request.scanner_ids = Some(vec![scanner.user_id]);
        h.service.create_event(&h.owner, request).await.unwrap();
        h.service
            .create_event(&h.owner, create_request("Unassigned"))
            .await
            .unwrap();

        let page = h
            .service
            .list_scanner_events(&scanner, &EventFilters::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.events[0].title, "Scanned");
    }

    #[tokio::test]
    async fn test_expected_attendees_for_event() {
        let h = harness();
        h.repo.add_student(StudentRecord {
            id: StudentId::generate(),
            section_id: SectionId::generate(),
            level_id: LevelId::generate(),
            active: true,
        });
        let event = h
            .service
            .create_event(&h.owner, create_request("Open day"))
            .await
            .unwrap();
        let expected = h.service.expected_attendees(event.id).await.unwrap();
        assert_eq!(expected.count, 1);
        assert_eq!(expected.summary, "All students");
    }

    #[tokio::test]
    async fn test_facility_listing_is_operational_only() {
        let h = harness();
        h.repo.add_facility(
            FacilityInfo {
                id: FacilityId::generate(),
                name: "Hall".to_string(),
                location: "North".to_string(),
                image_url: None,
                capacity: None,
            },
            true,
        );
        h.repo.add_facility(
            FacilityInfo {
                id: FacilityId::generate(),
                name: "Closed wing".to_string(),
                location: "South".to_string(),
                image_url: None,
                capacity: None,
            },
            false,
        );
        let facilities = h.service.list_facilities().await.unwrap();
        assert_eq!(facilities.len(), 1);
        assert_eq!(facilities[0].name, "Hall");
    }
}
