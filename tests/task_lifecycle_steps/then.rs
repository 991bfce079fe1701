//! Then steps for task lifecycle BDD scenarios.

use super::world::{TaskLifecycleWorld, run_async};
use rstest_bdd_macros::then;
use timekeeper::tracking::{domain::TaskState, services::ErrorKind};

#[then(r#"the task state is "{state}""#)]
fn task_state_is(world: &TaskLifecycleWorld, state: String) -> Result<(), eyre::Report> {
    let expected = TaskState::try_from(state.as_str())
        .map_err(|err| eyre::eyre!("invalid expected state in scenario: {err}"))?;
    let task = world.task()?;

    if task.state() != expected {
        return Err(eyre::eyre!(
            "expected state {}, found {}",
            expected.as_str(),
            task.state().as_str()
        ));
    }
    Ok(())
}

#[then(r#"the task spend time is "{spend}""#)]
fn task_spend_time_is(world: &TaskLifecycleWorld, spend: String) -> Result<(), eyre::Report> {
    let actual = world.task()?.spend_time(&*world.clock).to_string();
    if actual != spend {
        return Err(eyre::eyre!("expected spend time {spend}, found {actual}"));
    }
    Ok(())
}

fn expect_failure(world: &TaskLifecycleWorld, kind: ErrorKind) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing operation result"))?;

    match result {
        Err(err) if err.kind() == kind => Ok(()),
        other => Err(eyre::eyre!("expected {kind:?} failure, got {other:?}")),
    }
}

#[then("the request fails with a conflict")]
fn fails_with_conflict(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    expect_failure(world, ErrorKind::Conflict)
}

#[then("the request fails with a validation error")]
fn fails_with_validation(world: &TaskLifecycleWorld) -> Result<(), eyre::Report> {
    expect_failure(world, ErrorKind::Validation)
}

#[then(r#"the project spend time is "{spend}""#)]
fn project_spend_time_is(world: &TaskLifecycleWorld, spend: String) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let overviews = run_async(world.catalog.list_projects(world.owner))?;
    let overview = overviews
        .iter()
        .find(|overview| overview.project().id() == project_id)
        .ok_or_else(|| eyre::eyre!("project missing from listing"))?;

    let actual = overview.total_spend_time().to_string();
    if actual != spend {
        return Err(eyre::eyre!("expected project total {spend}, found {actual}"));
    }
    Ok(())
}

#[then(r#"the project lists "{name}" with "{spend}""#)]
fn project_lists_summary(
    world: &TaskLifecycleWorld,
    name: String,
    spend: String,
) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id();
    let overviews = run_async(world.catalog.list_projects(world.owner))?;
    let found = overviews
        .iter()
        .filter(|overview| overview.project().id() == project_id)
        .flat_map(|overview| overview.task_summaries())
        .any(|summary| summary.name == name && summary.spend_time.to_string() == spend);

    if !found {
        return Err(eyre::eyre!("no summary {name} with {spend} in project listing"));
    }
    Ok(())
}
