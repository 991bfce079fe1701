//! Concurrent requests against the single running task rule.

use super::helpers::{Tracker, create_in, tracker, user};
use rstest::rstest;
use std::sync::Arc;
use timekeeper::tracking::services::ErrorKind;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_leave_one_running_task(tracker: Tracker) {
    let owner = user();
    let project = tracker.project(owner, "Atlas").await;
    let tracker = Arc::new(tracker);

    let attempts: Vec<_> = (0..8)
        .map(|_| {
            let tracker = Arc::clone(&tracker);
            let request = create_in(owner, &project);
            tokio::spawn(async move { tracker.lifecycle.create_task(request).await })
        })
        .collect();

    let mut started = 0;
    for attempt in attempts {
        match attempt.await.expect("task should not panic") {
            Ok(_) => started += 1,
            Err(err) => assert_eq!(err.kind(), ErrorKind::Conflict),
        }
    }
    assert_eq!(started, 1);

    let running: Vec<_> = tracker
        .lifecycle
        .list_tasks(owner)
        .await
        .expect("listing should succeed")
        .into_iter()
        .filter(|task| task.is_running())
        .collect();
    assert_eq!(running.len(), 1);
}
