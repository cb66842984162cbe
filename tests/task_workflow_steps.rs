//! Behaviour tests for the task workflow driven through tool calls.

#[path = "task_workflow_steps/mod.rs"]
mod task_workflow_steps_defs;

use rstest_bdd_macros::scenario;
use task_workflow_steps_defs::world::{TaskWorkflowWorld, world};

#[scenario(
    path = "tests/features/task_workflow.feature",
    name = "New tasks start unapproved and not started"
)]
fn new_tasks_start_unapproved(world: TaskWorkflowWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_workflow.feature",
    name = "Marking a task done requires completion details"
)]
fn done_requires_details(world: TaskWorkflowWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_workflow.feature",
    name = "Skipping straight to done is rejected"
)]
fn skipping_to_done_is_rejected(world: TaskWorkflowWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_workflow.feature",
    name = "Only done tasks can be approved"
)]
fn only_done_tasks_can_be_approved(world: TaskWorkflowWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_workflow.feature",
    name = "Finalization waits for every task"
)]
fn finalization_waits_for_every_task(world: TaskWorkflowWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/task_workflow.feature",
    name = "A finalized project is frozen"
)]
fn finalized_project_is_frozen(world: TaskWorkflowWorld) {
    let _ = world;
}
