//! Project creation and roll-up flows through the service layer.

use super::helpers::{Tracker, create_in, tracker, user};
use rstest::rstest;
use timekeeper::tracking::services::{ContinueTaskRequest, ErrorKind};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_project_name_is_rejected_for_any_user(tracker: Tracker) {
    tracker.project(user(), "Shared").await;

    let err = tracker
        .catalog
        .create_project(user(), " Shared ")
        .await
        .expect_err("names are globally unique");
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overview_flattens_one_level_of_continuations(tracker: Tracker) {
    let owner = user();
    let project = tracker.project(owner, "Atlas").await;

    let root = tracker
        .lifecycle
        .create_task(create_in(owner, &project).with_name("Plan"))
        .await
        .expect("task creation should succeed");
    tracker.clock.advance(3_600);
    tracker
        .lifecycle
        .close_task(owner, root.id())
        .await
        .expect("close should succeed");

    let child = tracker
        .lifecycle
        .continue_task(ContinueTaskRequest::new(owner).with_task_id(root.id().to_string()))
        .await
        .expect("continue should succeed");
    tracker.clock.advance(60);
    tracker
        .lifecycle
        .close_task(owner, child.id())
        .await
        .expect("close should succeed");

    let grandchild = tracker
        .lifecycle
        .continue_task(ContinueTaskRequest::new(owner).with_task_id(child.id().to_string()))
        .await
        .expect("continue should succeed");
    tracker.clock.advance(1);
    tracker
        .lifecycle
        .close_task(owner, grandchild.id())
        .await
        .expect("close should succeed");

    tracker
        .lifecycle
        .create_task(create_in(owner, &project).with_name("Ship").with_duration("02:00:00"))
        .await
        .expect("task with duration should be created");

    let overviews = tracker
        .catalog
        .list_projects(owner)
        .await
        .expect("listing should succeed");
    assert_eq!(overviews.len(), 1);
    let overview = &overviews[0];

    assert_eq!(
        overview.total_spend_time().to_string(),
        "2 hrs 16 mins 6 secs"
    );
    let summaries: Vec<(String, String)> = overview
        .task_summaries()
        .iter()
        .map(|summary| (summary.name.clone(), summary.spend_time.to_string()))
        .collect();
    assert_eq!(
        summaries,
        vec![
            ("Plan".to_owned(), "1 hrs 1 mins 0 secs".to_owned()),
            ("Ship".to_owned(), "1 hrs 15 mins 5 secs".to_owned()),
        ]
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn projects_are_listed_only_for_their_owner(tracker: Tracker) {
    let (owner, other) = (user(), user());
    tracker.project(owner, "Mine").await;
    tracker.project(other, "Theirs").await;

    let names: Vec<String> = tracker
        .catalog
        .list_projects(owner)
        .await
        .expect("listing should succeed")
        .iter()
        .map(|overview| overview.project().name().to_string())
        .collect();
    assert_eq!(names, vec!["Mine".to_owned()]);
}
