mod common;

use std::sync::Arc;

use common::{
    ClosedPersistence, CountingCatalog, FlakyPersistence, answer_all, three_domain_definition,
    two_domain_definition,
};
use vigil_core::models::session::RecordStatus;
use vigil_session::assessor::Assessor;
use vigil_session::catalog::{BuiltinCatalog, StaticCatalog};
use vigil_session::error::SessionError;
use vigil_session::persistence::MemoryPersistence;
use vigil_session::session::{Session, SessionStatus};

fn assessor_with(persistence: Arc<FlakyPersistence>) -> (Assessor, Arc<CountingCatalog>) {
    let catalog = Arc::new(CountingCatalog::new(vec![
        two_domain_definition(),
        three_domain_definition(),
    ]));
    (Assessor::new(catalog.clone(), persistence), catalog)
}

#[tokio::test]
async fn select_answer_submit_round_trip() {
    let persistence = Arc::new(FlakyPersistence::new(0));
    let (assessor, _) = assessor_with(persistence.clone());

    let mut session = Session::new("offender-17");
    assessor.select(&mut session, "pair").await.unwrap();
    assert_eq!(session.status(), SessionStatus::InProgress);

    answer_all(&mut session, &[("x", "10"), ("y", "3")]);
    let result = assessor.submit(&mut session).await.unwrap();
    assert_eq!(result.total_score, 13);
    assert_eq!(result.risk_level, "High");
    assert_eq!(session.status(), SessionStatus::Completed);

    let record = persistence
        .memory()
        .record(session.record_id().unwrap())
        .await
        .unwrap();
    assert_eq!(record.subject_ref, "offender-17");
    assert_eq!(record.instrument_name, "Pair");
    assert_eq!(record.status, RecordStatus::Submitted);
    assert_eq!(record.final_risk_level.as_deref(), Some("High"));
    assert_eq!(record.total_score, Some(13));
}

#[tokio::test]
async fn unknown_instrument_is_unavailable() {
    let (assessor, _) = assessor_with(Arc::new(FlakyPersistence::new(0)));
    let mut session = Session::new("s");

    let err = assessor.select(&mut session, "nope").await.unwrap_err();
    assert!(matches!(err, SessionError::InstrumentUnavailable { .. }));
    assert_eq!(session.status(), SessionStatus::Selecting);
}

#[tokio::test]
async fn inactive_instrument_is_unavailable() {
    let mut def = two_domain_definition();
    def.active = false;
    let assessor = Assessor::new(
        Arc::new(StaticCatalog::new(vec![def])),
        Arc::new(MemoryPersistence::new()),
    );
    let mut session = Session::new("s");

    let err = assessor.select(&mut session, "pair").await.unwrap_err();
    assert!(matches!(err, SessionError::InstrumentUnavailable { .. }));
    assert_eq!(session.status(), SessionStatus::Selecting);
    assert!(assessor.list_instruments().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_instrument_aborts_open() {
    let mut def = two_domain_definition();
    def.domains[1].items.clear();
    let persistence = Arc::new(MemoryPersistence::new());
    let assessor = Assessor::new(Arc::new(StaticCatalog::new(vec![def])), persistence.clone());
    let mut session = Session::new("s");

    let err = assessor.select(&mut session, "pair").await.unwrap_err();
    assert!(matches!(err, SessionError::MalformedInstrument { .. }));
    assert_eq!(session.status(), SessionStatus::Selecting);
    assert!(persistence.records().await.is_empty());
}

#[tokio::test]
async fn persistence_open_failure_leaves_selecting() {
    let assessor = Assessor::new(
        Arc::new(StaticCatalog::new(vec![two_domain_definition()])),
        Arc::new(ClosedPersistence),
    );
    let mut session = Session::new("s");

    let err = assessor.select(&mut session, "pair").await.unwrap_err();
    assert!(matches!(err, SessionError::Persistence(_)));
    assert_eq!(session.status(), SessionStatus::Selecting);
}

#[tokio::test]
async fn incomplete_submit_never_reaches_persistence() {
    let persistence = Arc::new(FlakyPersistence::new(0));
    let (assessor, _) = assessor_with(persistence.clone());
    let mut session = Session::new("s");
    assessor.select(&mut session, "pair").await.unwrap();
    answer_all(&mut session, &[("x", "10")]);

    let err = assessor.submit(&mut session).await.unwrap_err();
    assert!(matches!(err, SessionError::IncompleteAssessment { .. }));
    assert_eq!(session.status(), SessionStatus::InProgress);
    assert_eq!(persistence.submit_count(), 0);
}

#[tokio::test]
async fn rejected_submission_can_be_retried() {
    let persistence = Arc::new(FlakyPersistence::new(1));
    let (assessor, _) = assessor_with(persistence.clone());
    let mut session = Session::new("s");
    assessor.select(&mut session, "pair").await.unwrap();
    answer_all(&mut session, &[("x", "5"), ("y", "0")]);

    let err = assessor.submit(&mut session).await.unwrap_err();
    assert!(matches!(err, SessionError::Persistence(_)));
    assert_eq!(session.status(), SessionStatus::InProgress);
    assert_eq!(session.answers().unwrap().len(), 2);
    assert!(session.result().is_none());
    assert!(!session.is_submitting());

    let result = assessor.submit(&mut session).await.unwrap();
    assert_eq!(result.total_score, 5);
    assert_eq!(result.risk_level, "Low");
    assert_eq!(persistence.submit_count(), 2);
}

#[tokio::test]
async fn resubmission_is_rejected_without_contacting_persistence() {
    let persistence = Arc::new(FlakyPersistence::new(0));
    let (assessor, _) = assessor_with(persistence.clone());
    let mut session = Session::new("s");
    assessor.select(&mut session, "pair").await.unwrap();
    answer_all(&mut session, &[("x", "10"), ("y", "3")]);
    assessor.submit(&mut session).await.unwrap();

    let err = assessor.submit(&mut session).await.unwrap_err();
    assert!(matches!(err, SessionError::AlreadySubmitted));
    assert_eq!(persistence.submit_count(), 1);
    assert_eq!(session.result().unwrap().total_score, 13);
}

#[tokio::test]
async fn instruments_are_cached_and_shared() {
    let (assessor, catalog) = assessor_with(Arc::new(FlakyPersistence::new(0)));
    let mut a = Session::new("a");
    let mut b = Session::new("b");
    assessor.select(&mut a, "screen").await.unwrap();
    assessor.select(&mut b, "screen").await.unwrap();

    assert_eq!(catalog.get_count(), 1);
    assert!(Arc::ptr_eq(a.instrument().unwrap(), b.instrument().unwrap()));
    assert_ne!(a.record_id(), b.record_id());

    assessor.invalidate("screen").await;
    assessor.instrument("screen").await.unwrap();
    assert_eq!(catalog.get_count(), 2);
}

#[tokio::test]
async fn split_api_discards_result_for_replaced_session() {
    let persistence = Arc::new(FlakyPersistence::new(0));
    let (assessor, _) = assessor_with(persistence.clone());
    let mut session = Session::new("s");

    let request = session.begin_open().unwrap();
    let in_flight = assessor.fetch(&request, "screen");

    // The view is closed and reopened before the load resolves.
    session.reset();
    let resolved = in_flight.await.unwrap();
    let err = assessor.open_record(&session, resolved).await.unwrap_err();
    assert!(matches!(err, SessionError::StaleResponse));
    assert_eq!(session.status(), SessionStatus::Selecting);
    assert!(persistence.memory().records().await.is_empty());

    assessor.select(&mut session, "pair").await.unwrap();
    assert_eq!(session.instrument().unwrap().id(), "pair");
    assert_eq!(persistence.memory().records().await.len(), 1);
}

#[tokio::test]
async fn acknowledged_submission_completes_despite_later_edit() {
    let persistence = Arc::new(FlakyPersistence::new(0));
    let (assessor, _) = assessor_with(persistence.clone());
    let mut session = Session::new("s");
    assessor.select(&mut session, "pair").await.unwrap();
    answer_all(&mut session, &[("x", "10"), ("y", "3")]);

    let pending = session.begin_submit().unwrap();
    let receipt = assessor.deliver(pending).await.unwrap();
    assert!(matches!(
        session.record_answer("x", "0"),
        Err(SessionError::SubmissionPending)
    ));

    let result = session.complete(receipt).unwrap().clone();
    assert_eq!(session.status(), SessionStatus::Completed);
    assert_eq!(session.live_score().unwrap(), result);

    let record = persistence
        .memory()
        .record(session.record_id().unwrap())
        .await
        .unwrap();
    assert_eq!(record.status, RecordStatus::Submitted);
    assert_eq!(record.total_score, Some(result.total_score));
    assert_eq!(record.final_risk_level, Some(result.risk_level));
}

#[tokio::test]
async fn builtin_catalog_serves_bundled_instruments() {
    let assessor = Assessor::new(Arc::new(BuiltinCatalog), Arc::new(MemoryPersistence::new()));
    let listed = assessor.list_instruments().await.unwrap();
    assert!(listed.iter().any(|s| s.id == "pretrial_screen"));

    let mut session = Session::new("s");
    assessor.select(&mut session, "pretrial_screen").await.unwrap();
    assert_eq!(session.domain_statuses().len(), 3);
}
