//! Then steps for task workflow BDD scenarios.

use super::world::{TaskWorkflowWorld, success_data};
use eyre::eyre;
use rstest_bdd_macros::then;
use serde_json::{Value, json};
use taskqueue::workflow::services::WorkflowErrorKind;

#[then(r#"task "{title}" has status "{status}""#)]
fn task_has_status(
    world: &TaskWorkflowWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let task = world.read_task(&title)?;
    let found = task.get("status").and_then(Value::as_str);
    if found != Some(status.as_str()) {
        return Err(eyre!("expected task {title} to be '{status}', found {found:?}"));
    }
    Ok(())
}

#[then(r#"task "{title}" is not approved"#)]
fn task_is_not_approved(world: &TaskWorkflowWorld, title: String) -> Result<(), eyre::Report> {
    let task = world.read_task(&title)?;
    if task.get("approved") != Some(&json!(false)) {
        return Err(eyre!("expected task {title} to be unapproved: {task}"));
    }
    Ok(())
}

#[then("the call succeeds")]
fn call_succeeds(world: &TaskWorkflowWorld) -> Result<(), eyre::Report> {
    let response = world.last_response()?;
    if !response.success {
        return Err(eyre!("expected success, got {response:?}"));
    }
    Ok(())
}

#[then(r#"the call fails with kind "{kind}""#)]
fn call_fails_with_kind(world: &TaskWorkflowWorld, kind: String) -> Result<(), eyre::Report> {
    let response = world.last_response()?;
    let found = response.kind.map(WorkflowErrorKind::as_str);
    if response.success || found != Some(kind.as_str()) {
        return Err(eyre!("expected failure of kind {kind}, got {response:?}"));
    }
    Ok(())
}

#[then(r#"task "{title}" is reported as blocking"#)]
fn task_reported_as_blocking(world: &TaskWorkflowWorld, title: String) -> Result<(), eyre::Report> {
    let target = world.task_target(&title)?;
    let task_id = target
        .get("taskId")
        .ok_or_else(|| eyre!("missing task id for {title}"))?;
    let response = world.last_response()?;
    let blocking = response
        .details
        .as_ref()
        .and_then(|details| details.get("blockingTasks"))
        .and_then(Value::as_array)
        .ok_or_else(|| eyre!("failure without blocking tasks: {response:?}"))?;
    let ids: Vec<&Value> = blocking.iter().filter_map(|task| task.get("id")).collect();
    if ids != [task_id] {
        return Err(eyre!("expected only {task_id} to block, got {ids:?}"));
    }
    Ok(())
}

#[then("the project is completed")]
fn project_is_completed(world: &TaskWorkflowWorld) -> Result<(), eyre::Report> {
    let payload = json!({
        "tool": "project",
        "params": { "action": "read", "arguments": { "projectId": world.project_id()? } }
    });
    let project = success_data(world.dispatcher.handle(&payload))?;
    if project.get("completed") != Some(&json!(true)) {
        return Err(eyre!("expected a completed project: {project}"));
    }
    Ok(())
}
