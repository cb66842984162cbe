//! Unit tests for the task status transition table.

use crate::workflow::domain::{ParseTaskStatusError, TaskStatus};
use rstest::rstest;

#[rstest]
#[case(TaskStatus::NotStarted, TaskStatus::NotStarted, false)]
#[case(TaskStatus::NotStarted, TaskStatus::InProgress, true)]
#[case(TaskStatus::NotStarted, TaskStatus::Done, false)]
#[case(TaskStatus::InProgress, TaskStatus::NotStarted, true)]
#[case(TaskStatus::InProgress, TaskStatus::InProgress, false)]
#[case(TaskStatus::InProgress, TaskStatus::Done, true)]
#[case(TaskStatus::Done, TaskStatus::NotStarted, false)]
#[case(TaskStatus::Done, TaskStatus::InProgress, true)]
#[case(TaskStatus::Done, TaskStatus::Done, false)]
fn can_transition_to_returns_expected(
    #[case] from: TaskStatus,
    #[case] to: TaskStatus,
    #[case] expected: bool,
) {
    assert_eq!(from.can_transition_to(to), expected);
}

#[rstest]
fn every_status_has_an_outgoing_edge() {
    for from in TaskStatus::ALL {
        assert!(
            TaskStatus::ALL.iter().any(|to| from.can_transition_to(*to)),
            "{from} should not be terminal"
        );
    }
}

#[rstest]
#[case("not started", TaskStatus::NotStarted)]
#[case("in progress", TaskStatus::InProgress)]
#[case("done", TaskStatus::Done)]
#[case("  Done ", TaskStatus::Done)]
#[case("IN PROGRESS", TaskStatus::InProgress)]
fn parses_status_strings(#[case] input: &str, #[case] expected: TaskStatus) {
    assert_eq!(TaskStatus::try_from(input), Ok(expected));
}

#[rstest]
#[case("finished")]
#[case("in_progress")]
#[case("")]
fn rejects_unknown_status_strings(#[case] input: &str) {
    assert_eq!(
        TaskStatus::try_from(input),
        Err(ParseTaskStatusError(input.to_owned()))
    );
}

#[rstest]
fn status_serializes_with_spaced_names() -> eyre::Result<()> {
    let encoded = serde_json::to_string(&TaskStatus::ALL)?;
    eyre::ensure!(
        encoded == r#"["not started","in progress","done"]"#,
        "unexpected encoding: {encoded}"
    );
    Ok(())
}
