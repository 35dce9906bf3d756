//! Session registry: expiry sweep, single-shot paths, durable staging

use intake_core::{
    ActivityName, Author, CommitCoordinator, DocumentKind, IntakeConfig, IntakeError,
    SanctionRecord, SessionManager, SessionState,
};
use intake_staging::{FsStagingStore, MemoryStagingStore, StagingStore};
use intake_test_utils::{RecordingPublisher, RecordingRepository};
use std::sync::Arc;

struct Harness {
    manager: SessionManager,
    publisher: RecordingPublisher,
    repository: RecordingRepository,
}

fn harness_with(store: Arc<dyn StagingStore>, config: IntakeConfig) -> Harness {
    let publisher = RecordingPublisher::new();
    let repository = RecordingRepository::new();
    let coordinator = Arc::new(CommitCoordinator::new(
        Arc::new(publisher.clone()),
        Arc::new(repository.clone()),
    ));
    Harness {
        manager: SessionManager::new(store, coordinator, config),
        publisher,
        repository,
    }
}

fn activity(name: &str) -> ActivityName {
    ActivityName::new(name).unwrap()
}

fn author() -> Author {
    Author::new("100", "Giulia")
}

#[tokio::test]
async fn idle_sessions_are_swept_and_reaped() -> anyhow::Result<()> {
    let h = harness_with(
        Arc::new(MemoryStagingStore::new()),
        IntakeConfig::new().with_session_ttl_secs(0),
    );
    let session = h.manager.open(activity("Bar Roma"), "100").await?;
    session
        .attach(DocumentKind::Cpi, "stale".into(), "ctx".into())
        .await?;
    assert_eq!(h.manager.session_count(), 1);

    // TTL of zero: the session is immediately idle
    assert_eq!(h.manager.expire_idle().await, 1);
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(h.manager.session_count(), 0);

    // The staged item is gone with the session
    let err = session
        .attach(DocumentKind::Other, "late".into(), "ctx".into())
        .await
        .unwrap_err();
    assert!(matches!(err, IntakeError::SessionNotFound));
    let fresh = h.manager.open(activity("Bar Roma"), "100").await?;
    assert_eq!(fresh.current_count(), 0);
    Ok(())
}

#[tokio::test]
async fn active_sessions_survive_the_sweep() -> anyhow::Result<()> {
    let h = harness_with(
        Arc::new(MemoryStagingStore::new()),
        IntakeConfig::new(), // default 180 s TTL
    );
    let session = h.manager.open(activity("Bar Roma"), "100").await?;
    session
        .attach(DocumentKind::Cpi, "live".into(), "ctx".into())
        .await?;

    assert_eq!(h.manager.expire_idle().await, 0);
    assert_eq!(session.state(), SessionState::Open);
    assert_eq!(session.current_count(), 1);
    Ok(())
}

#[tokio::test]
async fn background_sweep_discards_idle_sessions() -> anyhow::Result<()> {
    let h = harness_with(
        Arc::new(MemoryStagingStore::new()),
        IntakeConfig::new().with_session_ttl_secs(0),
    );
    let manager = Arc::new(h.manager);
    let session = manager.open(activity("Bar Roma"), "100").await?;

    let sweep = manager.spawn_expiry_sweep(std::time::Duration::from_millis(5));
    let mut tries = 0;
    while session.state() != SessionState::Closed {
        assert!(tries < 1000, "sweep never discarded the idle session");
        tries += 1;
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    }
    sweep.abort();

    assert_eq!(manager.session_count(), 0);
    Ok(())
}

#[tokio::test]
async fn single_shot_upload_bypasses_staging() -> anyhow::Result<()> {
    let h = harness_with(Arc::new(MemoryStagingStore::new()), IntakeConfig::new());

    let receipt = h
        .manager
        .submit_single(
            activity("Bar Roma"),
            &author(),
            DocumentKind::Cpi,
            "inspection body".into(),
            "annual visit".into(),
        )
        .await?;
    assert_eq!(receipt.items_committed, 1);
    assert_eq!(h.publisher.publish_count(), 1);
    assert_eq!(h.repository.saved_batches()[0][0].context, "annual visit");

    // No session was opened for the pair
    assert_eq!(h.manager.session_count(), 0);
    Ok(())
}

#[tokio::test]
async fn single_shot_rejects_blank_content() {
    let h = harness_with(Arc::new(MemoryStagingStore::new()), IntakeConfig::new());

    let err = h
        .manager
        .submit_single(
            activity("Bar Roma"),
            &author(),
            DocumentKind::Cpi,
            "  ".into(),
            "ctx".into(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, IntakeError::Validation(_)));
    assert_eq!(h.publisher.publish_count(), 0);
}

#[tokio::test]
async fn sanction_publishes_and_persists_once() -> anyhow::Result<()> {
    let h = harness_with(Arc::new(MemoryStagingStore::new()), IntakeConfig::new());

    let record = SanctionRecord::new(activity("Club Nettuno"), "noise", "3 day closure", &author());
    h.manager.record_sanction(record).await?;

    assert_eq!(h.publisher.publish_count(), 1);
    let published = h.publisher.published();
    assert_eq!(published[0].documents.len(), 1);
    assert!(published[0].documents[0].attachment.is_none());

    let sanctions = h.repository.sanctions();
    assert_eq!(sanctions.len(), 1);
    assert_eq!(sanctions[0].reason, "noise");
    Ok(())
}

#[tokio::test]
async fn durable_staging_resumes_after_restart() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;

    {
        let h = harness_with(
            Arc::new(FsStagingStore::new(tmp.path())),
            IntakeConfig::new(),
        );
        let session = h.manager.open(activity("Bar Roma"), "100").await?;
        session
            .attach(DocumentKind::Cpi, "before restart".into(), "ctx".into())
            .await?;
        // Process "dies" here: the manager is dropped without a commit
    }

    let h = harness_with(
        Arc::new(FsStagingStore::new(tmp.path())),
        IntakeConfig::new(),
    );
    let session = h.manager.open(activity("Bar Roma"), "100").await?;
    assert_eq!(session.current_count(), 1);

    let receipt = session.commit(&author()).await?;
    assert_eq!(receipt.items_committed, 1);
    assert_eq!(h.repository.saved_batches()[0][0].content, b"before restart");

    // Commit reclaimed the staging directory
    assert!(!tmp.path().join(session.key().as_str()).exists());
    Ok(())
}
