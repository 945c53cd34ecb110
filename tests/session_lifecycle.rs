//! Shared browser lifecycle: lazy launch, reuse, deferred close, recovery

use video_link_extractor::{CloseOutcome, ExtractError, SessionManager, SessionPhase};

mod common;
use common::*;

#[tokio::test]
async fn test_browser_is_launched_lazily_and_reused() {
    let launcher = FakeLauncher::new();
    let manager = SessionManager::new(launcher.clone());

    assert_eq!(manager.phase().await, SessionPhase::Absent);
    assert_eq!(launcher.state().launches, 0);

    for _ in 0..3 {
        let lease = manager.open_page().await.unwrap();
        lease.release().await;
    }

    assert_eq!(manager.launch_count().await, 1);
    assert_eq!(manager.phase().await, SessionPhase::Ready);
    let state = launcher.state();
    assert_eq!(state.pages_opened, 3);
    assert_eq!(state.pages_closed, 3);
}

#[tokio::test]
async fn test_close_without_session_is_noop() {
    let launcher = FakeLauncher::new();
    let manager = SessionManager::new(launcher.clone());

    assert_eq!(manager.close_session().await, CloseOutcome::AlreadyAbsent);
    assert_eq!(manager.close_session().await, CloseOutcome::AlreadyAbsent);
    assert!(launcher.state().sessions_closed.is_empty());
}

#[tokio::test]
async fn test_close_twice_closes_once() {
    let launcher = FakeLauncher::new();
    let manager = SessionManager::new(launcher.clone());
    manager.open_page().await.unwrap().release().await;

    assert_eq!(manager.close_session().await, CloseOutcome::Closed);
    assert_eq!(manager.close_session().await, CloseOutcome::AlreadyAbsent);

    assert_eq!(launcher.state().sessions_closed, vec![1]);
    assert_eq!(manager.phase().await, SessionPhase::Absent);
}

#[tokio::test]
async fn test_close_is_deferred_while_page_open() {
    let launcher = FakeLauncher::new();
    let manager = SessionManager::new(launcher.clone());

    let lease = manager.open_page().await.unwrap();
    assert_eq!(
        manager.close_session().await,
        CloseOutcome::Deferred { open_pages: 1 }
    );
    assert_eq!(manager.phase().await, SessionPhase::Closing);
    assert!(launcher.state().sessions_closed.is_empty());

    lease.release().await;

    assert_eq!(launcher.state().sessions_closed, vec![1]);
    assert_eq!(manager.phase().await, SessionPhase::Absent);
    assert_eq!(manager.open_pages().await, 0);
}

#[tokio::test]
async fn test_page_opened_during_pending_close_delays_it() {
    let launcher = FakeLauncher::new();
    let manager = SessionManager::new(launcher.clone());

    let first = manager.open_page().await.unwrap();
    assert!(matches!(
        manager.close_session().await,
        CloseOutcome::Deferred { .. }
    ));

    let second = manager.open_page().await.unwrap();
    assert_eq!(manager.launch_count().await, 1);

    first.release().await;
    assert!(launcher.state().sessions_closed.is_empty());

    second.release().await;
    assert_eq!(launcher.state().sessions_closed, vec![1]);
}

#[tokio::test]
async fn test_next_request_after_close_relaunches() {
    let launcher = FakeLauncher::new();
    let manager = SessionManager::new(launcher.clone());

    manager.open_page().await.unwrap().release().await;
    manager.close_session().await;
    manager.open_page().await.unwrap().release().await;

    assert_eq!(manager.launch_count().await, 2);
    assert_eq!(manager.phase().await, SessionPhase::Ready);
}

#[tokio::test]
async fn test_launch_failure_leaves_session_absent() {
    let launcher = FakeLauncher::new().failing_launch("no usable browser");
    let manager = SessionManager::new(launcher.clone());

    let err = match manager.open_page().await {
        Ok(_) => panic!("launch should fail"),
        Err(e) => e,
    };
    assert!(matches!(err, ExtractError::Environment(ref m) if m.contains("no usable browser")));
    assert_eq!(manager.phase().await, SessionPhase::Absent);
    assert_eq!(manager.open_pages().await, 0);

    launcher.state().launch_error = None;
    manager.open_page().await.unwrap().release().await;
    assert_eq!(manager.launch_count().await, 1);
}

#[tokio::test]
async fn test_dead_browser_is_replaced() {
    let launcher = FakeLauncher::new();
    let manager = SessionManager::new(launcher.clone());

    manager.open_page().await.unwrap().release().await;
    launcher.kill_current_browser();
    manager.open_page().await.unwrap().release().await;

    assert_eq!(manager.launch_count().await, 2);
    assert_eq!(launcher.state().sessions_closed, vec![1]);
}

#[tokio::test]
async fn test_unhealthy_browser_outlives_its_open_pages() {
    let launcher = FakeLauncher::new();
    let manager = SessionManager::new(launcher.clone());

    let first = manager.open_page().await.unwrap();
    launcher.kill_current_browser();
    let second = manager.open_page().await.unwrap();

    assert_eq!(manager.launch_count().await, 2);
    assert!(launcher.state().sessions_closed.is_empty());
    assert_eq!(manager.open_pages().await, 2);

    first.release().await;
    assert_eq!(launcher.state().sessions_closed, vec![1]);
    assert_eq!(manager.open_pages().await, 1);

    assert_eq!(
        manager.close_session().await,
        CloseOutcome::Deferred { open_pages: 1 }
    );
    second.release().await;
    assert_eq!(launcher.state().sessions_closed, vec![1, 2]);
    assert_eq!(manager.open_pages().await, 0);
    assert_eq!(manager.phase().await, SessionPhase::Absent);
}

#[tokio::test]
async fn test_shutdown_closes_retired_browsers() {
    let launcher = FakeLauncher::new();
    let manager = SessionManager::new(launcher.clone());

    let first = manager.open_page().await.unwrap();
    launcher.kill_current_browser();
    let second = manager.open_page().await.unwrap();

    manager.shutdown().await;
    assert_eq!(launcher.state().sessions_closed, vec![2, 1]);

    first.release().await;
    second.release().await;
    assert_eq!(launcher.state().sessions_closed, vec![2, 1]);
    assert_eq!(manager.open_pages().await, 0);
}

#[tokio::test]
async fn test_dropped_lease_still_closes_page() {
    let launcher = FakeLauncher::new();
    let manager = SessionManager::new(launcher.clone());

    let lease = manager.open_page().await.unwrap();
    drop(lease);
    settle().await;

    assert_eq!(launcher.state().pages_closed, 1);
    assert_eq!(manager.open_pages().await, 0);
}

#[tokio::test]
async fn test_shutdown_closes_even_with_open_pages() {
    let launcher = FakeLauncher::new();
    let manager = SessionManager::new(launcher.clone());

    let lease = manager.open_page().await.unwrap();
    manager.shutdown().await;

    assert_eq!(launcher.state().sessions_closed, vec![1]);
    assert_eq!(manager.phase().await, SessionPhase::Absent);

    lease.release().await;
    assert_eq!(launcher.state().sessions_closed, vec![1]);
}
