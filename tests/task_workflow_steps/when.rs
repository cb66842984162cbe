//! When steps for task workflow BDD scenarios.

use super::world::TaskWorkflowWorld;
use rstest_bdd_macros::when;
use serde_json::{Value, json};

fn with_fields(mut target: Value, fields: &[(&str, &str)]) -> Value {
    if let Some(arguments) = target.as_object_mut() {
        for (key, value) in fields {
            arguments.insert((*key).to_owned(), json!(value));
        }
    }
    target
}

#[when(r#"task "{title}" is moved to "{status}""#)]
fn task_moved_to(
    world: &mut TaskWorkflowWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let arguments = with_fields(world.task_target(&title)?, &[("status", &status)]);
    world.call("task", "update", &arguments);
    Ok(())
}

#[when(r#"task "{title}" is completed in one step with details "{details}""#)]
fn task_completed_in_one_step(
    world: &mut TaskWorkflowWorld,
    title: String,
    details: String,
) -> Result<(), eyre::Report> {
    let arguments = with_fields(
        world.task_target(&title)?,
        &[("status", "done"), ("completedDetails", &details)],
    );
    world.call("task", "update", &arguments);
    Ok(())
}

#[when(r#"the reviewer approves task "{title}""#)]
fn reviewer_approves(world: &mut TaskWorkflowWorld, title: String) -> Result<(), eyre::Report> {
    let target = world.task_target(&title)?;
    world.call("task", "approve", &target);
    Ok(())
}

#[when("the project is finalized")]
fn project_finalized(world: &mut TaskWorkflowWorld) -> Result<(), eyre::Report> {
    let arguments = json!({ "projectId": world.project_id()? });
    world.call("project", "finalize", &arguments);
    Ok(())
}
