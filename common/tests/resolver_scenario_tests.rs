// Integration tests for assignment resolution against a group directory
// Scenarios run over an in-memory snapshot; fetch counting uses a mocked directory

use async_trait::async_trait;
use chrono::NaiveTime;
use common::cache::GroupScheduleCache;
use common::directory::{DirectorySnapshot, GroupDirectory, InMemoryGroupDirectory};
use common::errors::DirectoryError;
use common::models::{
    AssignmentOrigin, Day, GroupListing, GroupSubject, SessionKind, SessionSlot,
    SubjectAssignment,
};
use common::schedule::{AssignmentResolver, ScheduleAssembler, ScheduleSource};
use mockall::mock;
use std::sync::Arc;

mock! {
    pub Directory {}

    #[async_trait]
    impl GroupDirectory for Directory {
        async fn get_groups(&self) -> Result<GroupListing, DirectoryError>;
        async fn get_group_schedule(&self, group_name: &str)
            -> Result<Vec<SessionSlot>, DirectoryError>;
    }
}

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn slot(subject: &str, professor: &str, day: Day, start: (u32, u32), end: (u32, u32)) -> SessionSlot {
    SessionSlot {
        subject: subject.to_string(),
        professor: professor.to_string(),
        day,
        start_time: time(start.0, start.1),
        end_time: time(end.0, end.1),
        rating: 4.2,
        duration_minutes: 90,
        kind: SessionKind::Regular,
        group: None,
        room: Some("A-101".to_string()),
    }
}

fn carries(subject: &str, professor: &str) -> GroupSubject {
    GroupSubject {
        subject: subject.to_string(),
        professor: professor.to_string(),
        rating: 4.2,
        minutes: Some(270),
        origin: None,
    }
}

fn forced(subject: &str, professor: &str, minutes: u32) -> SubjectAssignment {
    SubjectAssignment::new(subject, professor, 9.5, minutes, AssignmentOrigin::Forced)
}

fn inherited(subject: &str, professor: &str, group: &str) -> SubjectAssignment {
    SubjectAssignment::new(
        subject,
        professor,
        8.0,
        90,
        AssignmentOrigin::FromGroup(group.to_string()),
    )
}

fn in_memory(snapshot: DirectorySnapshot) -> Arc<GroupScheduleCache> {
    Arc::new(GroupScheduleCache::new(Arc::new(InMemoryGroupDirectory::new(
        snapshot,
    ))))
}

/// Group X: Calculus by Dr. Lee on Monday. Group Y: Calculus by Dr. Kim on Tuesday.
fn campus_snapshot() -> DirectorySnapshot {
    let mut snapshot = DirectorySnapshot::default();
    snapshot.groups.insert(
        "X".to_string(),
        vec![carries("Calculus", "Dr. Lee"), carries("Databases", "Dr. Ortiz")],
    );
    snapshot
        .groups
        .insert("Y".to_string(), vec![carries("Calculus", "Dr. Kim")]);
    snapshot.schedules.insert(
        "X".to_string(),
        vec![
            slot("Calculus", "Dr. Lee", Day::Monday, (8, 0), (9, 30)),
            slot("Databases", "Dr. Ortiz", Day::Wednesday, (14, 0), (15, 30)),
        ],
    );
    snapshot.schedules.insert(
        "Y".to_string(),
        vec![slot("Calculus", "Dr. Kim", Day::Tuesday, (10, 0), (11, 30))],
    );
    snapshot
}

#[tokio::test]
async fn test_exact_professor_match() {
    let resolver = AssignmentResolver::new(in_memory(campus_snapshot()));

    let sessions = resolver
        .resolve(&[forced("Calculus", "Dr. Lee", 90)])
        .await
        .expect("schedule resolved");

    assert_eq!(sessions.len(), 1);
    let session = &sessions[0];
    assert_eq!(session.day, Day::Monday);
    assert_eq!(session.start_time, time(8, 0));
    assert_eq!(session.end_time, time(9, 30));
    assert_eq!(session.kind, SessionKind::Forced);
    assert_eq!(session.rating, 9.5);
    assert_eq!(session.room.as_deref(), Some("A-101"));
}

#[tokio::test]
async fn test_template_fallback_adopts_pinned_professor() {
    let mut snapshot = DirectorySnapshot::default();
    snapshot
        .groups
        .insert("Y".to_string(), vec![carries("Calculus", "Dr. Kim")]);
    snapshot.schedules.insert(
        "Y".to_string(),
        vec![slot("Calculus", "Dr. Kim", Day::Tuesday, (10, 0), (11, 30))],
    );
    let resolver = AssignmentResolver::new(in_memory(snapshot));

    let sessions = resolver
        .resolve(&[forced("Calculus", "Dr. Lee", 90)])
        .await
        .expect("schedule resolved");

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].day, Day::Tuesday);
    assert_eq!(sessions[0].start_time, time(10, 0));
    assert_eq!(sessions[0].end_time, time(11, 30));
    assert_eq!(sessions[0].professor, "Dr. Lee");
    assert_eq!(sessions[0].kind, SessionKind::Forced);
}

#[tokio::test]
async fn test_synthetic_fallback_for_unknown_subject() {
    let resolver = AssignmentResolver::new(in_memory(campus_snapshot()));

    let sessions = resolver
        .resolve(&[forced("Quantum Field Theory", "Dr. Dirac", 270)])
        .await
        .expect("synthetic schedule");

    let placed: Vec<_> = sessions
        .iter()
        .map(|s| (s.day.clone(), s.start_time, s.end_time))
        .collect();
    assert_eq!(
        placed,
        vec![
            (Day::Monday, time(8, 0), time(9, 30)),
            (Day::Wednesday, time(10, 0), time(11, 30)),
            (Day::Friday, time(14, 0), time(15, 30)),
        ]
    );
    assert!(sessions.iter().all(|s| s.professor == "Dr. Dirac"));
    assert!(sessions.iter().all(|s| s.rating == 9.5));
}

#[tokio::test]
async fn test_automatic_assignment_never_consults_directory() {
    // No expectations: any directory call fails the test
    let directory = MockDirectory::new();
    let resolver = AssignmentResolver::new(Arc::new(GroupScheduleCache::new(Arc::new(directory))));

    let automatic = SubjectAssignment::new(
        "Calculus",
        "Dr. Lee",
        9.0,
        90,
        AssignmentOrigin::Automatic,
    );

    assert!(resolver.resolve_assignment(&automatic).await.is_empty());
    assert!(resolver.resolve(&[automatic]).await.is_none());
}

#[tokio::test]
async fn test_failed_group_fetch_does_not_drop_other_assignments() {
    let mut directory = MockDirectory::new();
    directory
        .expect_get_group_schedule()
        .withf(|name| name == "Broken")
        .times(1)
        .returning(|_| Err(DirectoryError::RequestFailed("connection reset".to_string())));
    directory
        .expect_get_group_schedule()
        .withf(|name| name == "X")
        .times(1)
        .returning(|_| {
            Ok(vec![slot("Calculus", "Dr. Lee", Day::Thursday, (16, 0), (17, 30))])
        });

    let resolver = AssignmentResolver::new(Arc::new(GroupScheduleCache::new(Arc::new(directory))));
    let sessions = resolver
        .resolve(&[
            inherited("Physics", "Dr. Ruiz", "Broken"),
            inherited("Calculus", "Dr. Lee", "X"),
        ])
        .await
        .expect("surviving assignment resolved");

    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].subject, "Calculus");
    assert_eq!(sessions[0].kind, SessionKind::Regular);
}

#[tokio::test]
async fn test_group_schedule_fetched_once() {
    let mut directory = MockDirectory::new();
    directory
        .expect_get_group_schedule()
        .withf(|name| name == "X")
        .times(1)
        .returning(|_| {
            Ok(vec![
                slot("Calculus", "Dr. Lee", Day::Friday, (8, 0), (9, 30)),
                slot("Databases", "Dr. Ortiz", Day::Monday, (10, 0), (11, 30)),
            ])
        });

    let cache = Arc::new(GroupScheduleCache::new(Arc::new(directory)));
    let resolver = AssignmentResolver::new(Arc::clone(&cache));

    let sessions = resolver
        .resolve(&[
            inherited("Calculus", "Dr. Lee", "X"),
            inherited("Databases", "Dr. Ortiz", "X"),
        ])
        .await
        .expect("schedule resolved");

    // Canonical order: Monday before Friday
    assert_eq!(sessions[0].subject, "Databases");
    assert_eq!(sessions[1].subject, "Calculus");

    let again = resolver.resolve(&[inherited("Calculus", "Dr. Lee", "X")]).await;
    assert_eq!(again.map(|s| s.len()), Some(1));
    assert_eq!(cache.stats().await.cached_groups, 1);
}

#[tokio::test]
async fn test_failed_fetch_is_retried() {
    let mut directory = MockDirectory::new();
    directory
        .expect_get_group_schedule()
        .withf(|name| name == "Flaky")
        .times(2)
        .returning(|_| {
            Err(DirectoryError::Status {
                code: 503,
                body: "busy".to_string(),
            })
        });

    let cache = GroupScheduleCache::new(Arc::new(directory));
    assert!(cache.get("Flaky").await.is_none());
    assert!(cache.get("Flaky").await.is_none());
    assert_eq!(cache.stats().await.cached_groups, 0);
}

#[tokio::test]
async fn test_exact_search_skips_failed_group_and_stops_at_first_match() {
    let mut directory = MockDirectory::new();
    directory.expect_get_groups().times(1).returning(|| {
        let mut listing = GroupListing::new();
        for group in ["A", "B", "C"] {
            listing.insert(group.to_string(), vec![carries("Calculus", "Dr. Lee")]);
        }
        Ok(listing)
    });
    // A is the target group and the first candidate; failures are not cached
    directory
        .expect_get_group_schedule()
        .withf(|name| name == "A")
        .times(2)
        .returning(|_| Err(DirectoryError::RequestFailed("connection refused".to_string())));
    directory
        .expect_get_group_schedule()
        .withf(|name| name == "B")
        .times(1)
        .returning(|_| {
            Ok(vec![
                slot("Calculus", "Dr. Lee", Day::Thursday, (10, 0), (11, 30)),
                slot("Calculus", "Dr. Lee", Day::Monday, (8, 0), (9, 30)),
            ])
        });
    directory
        .expect_get_group_schedule()
        .withf(|name| name == "C")
        .never();

    let resolver = AssignmentResolver::new(Arc::new(GroupScheduleCache::new(Arc::new(directory))));
    let sessions = resolver
        .resolve(&[forced("Calculus", "Dr. Lee", 90)])
        .await
        .expect("schedule resolved");

    let days: Vec<_> = sessions.iter().map(|s| s.day.clone()).collect();
    assert_eq!(days, vec![Day::Monday, Day::Thursday]);
    assert!(sessions.iter().all(|s| s.kind == SessionKind::Forced));
}

#[tokio::test]
async fn test_listing_fetched_once_across_forced_assignments() {
    let mut directory = MockDirectory::new();
    directory.expect_get_groups().times(1).returning(|| {
        let mut listing = GroupListing::new();
        listing.insert("Y".to_string(), vec![carries("Calculus", "Dr. Kim")]);
        Ok(listing)
    });
    directory
        .expect_get_group_schedule()
        .withf(|name| name == "Y")
        .times(1)
        .returning(|_| Ok(vec![slot("Calculus", "Dr. Kim", Day::Tuesday, (10, 0), (11, 30))]));

    let resolver = AssignmentResolver::new(Arc::new(GroupScheduleCache::new(Arc::new(directory))));
    let sessions = resolver
        .resolve(&[
            forced("Calculus", "Dr. Lee", 90),
            forced("Calculus", "Dr. Kim", 90),
        ])
        .await
        .expect("schedule resolved");

    assert_eq!(sessions.len(), 2);
    assert!(sessions.iter().all(|s| s.day == Day::Tuesday));
}

#[tokio::test]
async fn test_remembered_group_becomes_template() {
    let cache = in_memory(campus_snapshot());
    cache
        .remember_group_subjects("W", vec![carries("Compilers", "Dr. Aho")])
        .await;

    let listing = cache.get_all_groups().await.expect("listing");
    assert!(listing.contains_key("W"));
    assert!(listing.contains_key("X"));
    assert!(listing.contains_key("Y"));

    let resolver = AssignmentResolver::new(cache);
    let compilers = forced("Compilers", "Dr. Ullman", 90);
    assert_eq!(resolver.target_group(&compilers).await.as_deref(), Some("W"));

    // W has no schedule yet, so the synthetic fallback applies
    let sessions = resolver.resolve_assignment(&compilers).await;
    assert_eq!(sessions.len(), 2);
    assert!(sessions.iter().all(|s| s.kind == SessionKind::Forced));
}

#[tokio::test]
async fn test_assembler_prefers_directory_schedule() {
    let assembler = ScheduleAssembler::new(in_memory(campus_snapshot()));

    let assembled = assembler
        .schedule_for_group("X", &[forced("Calculus", "Dr. Lee", 90)])
        .await;

    assert_eq!(assembled.source, ScheduleSource::Directory);
    assert_eq!(assembled.sessions.len(), 2);
    assert_eq!(assembled.sessions[0].day, Day::Monday);
}

#[tokio::test]
async fn test_assembler_resolves_from_origin_groups() {
    let assembler = ScheduleAssembler::new(in_memory(campus_snapshot()));

    let assembled = assembler
        .schedule_for_group("Z", &[inherited("Calculus", "Dr. Kim", "Y")])
        .await;

    assert_eq!(assembled.source, ScheduleSource::Resolved);
    assert_eq!(assembled.sessions.len(), 1);
    assert_eq!(assembled.sessions[0].day, Day::Tuesday);
}

#[tokio::test]
async fn test_assembler_falls_back_in_order() {
    let assembler = ScheduleAssembler::new(in_memory(campus_snapshot()));

    let assembled = assembler
        .schedule_for_group(
            "Z",
            &[
                inherited("Calculus", "Dr. Nobody", "Y"),
                forced("Ethics", "Dr. Moore", 270),
            ],
        )
        .await;

    assert_eq!(assembled.source, ScheduleSource::Resolved);
    assert!(assembled.sessions.iter().all(|s| s.subject == "Ethics"));

    let synthetic = assembler
        .schedule_for_group("Z", &[forced("Ethics", "Dr. Moore", 270)])
        .await;
    assert_eq!(synthetic.source, ScheduleSource::Synthetic);
    assert_eq!(synthetic.sessions.len(), 3);
}
