//! Given steps for task workflow BDD scenarios.

use super::world::{TaskWorkflowWorld, success_data};
use eyre::{WrapErr, eyre};
use rstest_bdd_macros::given;
use serde_json::{Value, json};

#[given(r#"a project "{prompt}" with tasks "{first}" and "{second}""#)]
fn project_with_two_tasks(
    world: &mut TaskWorkflowWorld,
    prompt: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let arguments = json!({
        "initialPrompt": prompt,
        "tasks": [
            { "title": first, "description": format!("Work on {first}") },
            { "title": second, "description": format!("Work on {second}") }
        ]
    });
    let created = success_data(world.call("project", "create", &arguments))
        .wrap_err("create scenario project")?;

    let project_id = created
        .get("projectId")
        .and_then(Value::as_str)
        .ok_or_else(|| eyre!("create response without projectId: {created}"))?;
    let task_ids: Vec<String> = created
        .get("taskIds")
        .and_then(Value::as_array)
        .ok_or_else(|| eyre!("create response without taskIds: {created}"))?
        .iter()
        .filter_map(|id| id.as_str().map(ToOwned::to_owned))
        .collect();
    let [first_id, second_id] = <[String; 2]>::try_from(task_ids)
        .map_err(|ids| eyre!("expected two task ids, got {ids:?}"))?;

    world.project_id = Some(project_id.to_owned());
    world.task_ids.insert(first, first_id);
    world.task_ids.insert(second, second_id);
    Ok(())
}

#[given(r#"task "{title}" has been completed and approved"#)]
fn task_completed_and_approved(
    world: &mut TaskWorkflowWorld,
    title: String,
) -> Result<(), eyre::Report> {
    let target = world.task_target(&title)?;
    let mut started = target.clone();
    let mut finished = target.clone();
    if let (Some(start_args), Some(finish_args)) =
        (started.as_object_mut(), finished.as_object_mut())
    {
        start_args.insert("status".to_owned(), json!("in progress"));
        finish_args.insert("status".to_owned(), json!("done"));
        finish_args.insert("completedDetails".to_owned(), json!("Finished"));
    }

    success_data(world.call("task", "update", &started)).wrap_err("start scenario task")?;
    success_data(world.call("task", "update", &finished)).wrap_err("finish scenario task")?;
    success_data(world.call("task", "approve", &target)).wrap_err("approve scenario task")?;
    Ok(())
}
