//! Concurrent writes against the `PostgreSQL` store.

use crate::postgres::helpers::{
    CleanupGuard, database_name, ensure_template, setup_store, stored_project, test_runtime, user,
};
use crate::test_helpers::ManualClock;
use pg_embedded_setup_unpriv::{TestCluster, test_support::shared_test_cluster};
use rstest::rstest;
use timekeeper::tracking::{
    domain::Task,
    ports::{RepositoryError, TaskRepository},
};

const CONCURRENT_CREATES: usize = 4;

#[rstest]
#[case::restart(true)]
#[case::toggle(false)]
fn outdated_transition_cannot_reopen_a_closed_task(
    shared_test_cluster: &'static TestCluster,
    #[case] restart: bool,
) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("stale_update");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let store = setup_store(shared_test_cluster, &db_name, 1).expect("store setup");
    let clock = ManualClock::new();

    test_runtime().block_on(async {
        let owner = user();
        let project = stored_project(&store, owner, "Atlas", &clock).await;
        let task = Task::new(project.id(), None, &clock).expect("valid task");
        store
            .store_task(owner, &task)
            .await
            .expect("task insert should succeed");

        let read_by_close = store
            .find_owned_task(owner, task.id())
            .await
            .expect("task lookup should succeed")
            .expect("task exists");
        let read_by_other = read_by_close.clone();
        clock.advance(30);

        let mut closed = read_by_close.clone();
        closed.close(&clock).expect("open task closes");
        store
            .update_task(owner, &read_by_close, &closed)
            .await
            .expect("close should persist");

        let mut reopened = read_by_other.clone();
        if restart {
            reopened.restart(&clock).expect("open copy restarts");
        } else {
            reopened.toggle_pause(&clock).expect("open copy toggles");
        }
        assert!(matches!(
            store.update_task(owner, &read_by_other, &reopened).await,
            Err(RepositoryError::StaleTask(id)) if id == task.id()
        ));

        let stored = store
            .find_owned_task(owner, task.id())
            .await
            .expect("task lookup should succeed");
        assert_eq!(stored, Some(closed));
    });
}

#[rstest]
fn concurrent_creates_leave_one_running_task(shared_test_cluster: &'static TestCluster) {
    ensure_template(shared_test_cluster).expect("template setup");
    let db_name = database_name("concurrent_create");
    let _guard = CleanupGuard::new(shared_test_cluster, db_name.clone());
    let pool_size = u32::try_from(CONCURRENT_CREATES).expect("pool size fits u32");
    let store = setup_store(shared_test_cluster, &db_name, pool_size).expect("store setup");
    let clock = ManualClock::new();

    test_runtime().block_on(async {
        let owner = user();
        let project = stored_project(&store, owner, "Atlas", &clock).await;

        let handles: Vec<_> = (0..CONCURRENT_CREATES)
            .map(|_| {
                let writer = store.clone();
                let task = Task::new(project.id(), None, &clock).expect("valid task");
                tokio::spawn(async move { writer.store_task(owner, &task).await })
            })
            .collect();

        let mut stored = 0_usize;
        for handle in handles {
            match handle.await.expect("insert task should not panic") {
                Ok(()) => stored += 1,
                Err(RepositoryError::RunningTaskExists { .. } | RepositoryError::Contention(_)) => {}
                Err(other) => panic!("unexpected insert error: {other}"),
            }
        }
        assert_eq!(stored, 1, "exactly one concurrent create should win");

        let running: Vec<Task> = store
            .list_owned_tasks(owner)
            .await
            .expect("task listing should succeed")
            .into_iter()
            .filter(Task::is_running)
            .collect();
        assert_eq!(running.len(), 1);
    });
}
