//! When steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use rstest_bdd_macros::when;
use timekeeper::tracking::services::{ContinueTaskRequest, CreateTaskRequest};

#[when("{seconds:i64} seconds pass")]
fn seconds_pass(world: &mut TaskLifecycleWorld, seconds: i64) {
    world.clock.advance(seconds);
}

#[when("the task is paused or resumed")]
fn pause_or_resume(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.lifecycle.pause_or_resume_task(world.owner, task_id));
    world.record(result);
    Ok(())
}

#[when("the task is closed")]
fn close(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let task_id = world.task()?.id();
    let result = run_async(world.lifecycle.close_task(world.owner, task_id));
    world.record(result);
    Ok(())
}

#[when("the task is continued")]
fn continue_task(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let request =
        ContinueTaskRequest::new(world.owner).with_task_id(world.task()?.id().to_string());
    let result = run_async(world.lifecycle.continue_task(request));
    world.record(result);
    Ok(())
}

#[when("another task is created")]
fn another_task(world: &mut TaskLifecycleWorld) -> Result<(), eyre::Report> {
    let request = CreateTaskRequest::new(world.owner)
        .with_project_id(world.project()?.id().to_string())
        .with_name("Another");
    let result = run_async(world.lifecycle.create_task(request));
    world.last_result = Some(result);
    Ok(())
}
