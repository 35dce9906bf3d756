//! Busy guard: one commit in flight per session

use intake_core::{
    ActivityName, Author, CommitCoordinator, DocumentKind, IntakeConfig, IntakeError,
    SessionManager, SessionState,
};
use intake_staging::MemoryStagingStore;
use intake_test_utils::{RecordingPublisher, RecordingRepository};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn second_commit_during_slow_persistence_is_busy() -> anyhow::Result<()> {
    let publisher = RecordingPublisher::new();
    let repository = RecordingRepository::new();
    let coordinator = Arc::new(CommitCoordinator::new(
        Arc::new(publisher.clone()),
        Arc::new(repository.clone()),
    ));
    let manager = SessionManager::new(
        Arc::new(MemoryStagingStore::new()),
        coordinator,
        IntakeConfig::new(),
    );

    let session = manager
        .open(ActivityName::new("Bar Roma")?, "100")
        .await?;
    session
        .attach(DocumentKind::Cpi, "body".into(), "ctx".into())
        .await?;

    // Hold the first commit inside the persistence phase
    let gate = repository.gate_saves();
    let first = {
        let session = Arc::clone(&session);
        let author = Author::new("100", "Giulia");
        tokio::spawn(async move { session.commit(&author).await })
    };

    let mut tries = 0;
    while session.state() != SessionState::Committing {
        assert!(tries < 1000, "first commit never reached persistence");
        tries += 1;
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    // A concurrent commit is rejected, not interleaved
    let err = session
        .commit(&Author::new("100", "Giulia"))
        .await
        .unwrap_err();
    assert!(matches!(err, IntakeError::Busy));

    // Attaching mid-commit is rejected the same way
    let err = session
        .attach(DocumentKind::Other, "late".into(), "ctx".into())
        .await
        .unwrap_err();
    assert!(matches!(err, IntakeError::Busy));

    // Release the gate; the first commit completes alone
    gate.add_permits(1);
    let receipt = first.await??;
    assert_eq!(receipt.items_committed, 1);

    // No double publish, no double persist
    assert_eq!(publisher.publish_count(), 1);
    assert_eq!(repository.save_count(), 1);
    assert_eq!(session.state(), SessionState::Closed);
    Ok(())
}
