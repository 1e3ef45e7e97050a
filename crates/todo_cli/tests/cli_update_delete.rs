use std::process::{Command, Output};

// Each invocation starts from an empty in-memory store, so every id is unknown.
fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_todo"))
        .args(args)
        .env("TODO_CONFIG_PATH", "/nonexistent/todo-config.json")
        .output()
        .expect("failed to run todo")
}

fn assert_not_found(output: &Output, id: u64) {
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&format!("ERROR: not_found - Task with ID {id} not found")));
}

#[test]
fn update_command_reports_missing_task() {
    let output = run(&["update", "999", "--title", "x"]);
    assert_not_found(&output, 999);
}

#[test]
fn update_command_requires_a_field() {
    let output = run(&["update", "1"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("must specify --title and/or --description"));
}

#[test]
fn update_command_rejects_non_numeric_id() {
    let output = run(&["update", "abc", "--title", "x"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[test]
fn delete_command_reports_missing_task() {
    let output = run(&["delete", "999"]);
    assert_not_found(&output, 999);
}

#[test]
fn complete_command_reports_missing_task() {
    let output = run(&["complete", "999"]);
    assert_not_found(&output, 999);
}

#[test]
fn incomplete_command_reports_missing_task() {
    let output = run(&["incomplete", "3"]);
    assert_not_found(&output, 3);
}
