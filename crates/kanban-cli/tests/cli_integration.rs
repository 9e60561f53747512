use assert_cmd::Command;
use kanban_persistence::InMemoryStore;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::sync::Arc;
use tempfile::tempdir;

/// Start an in-memory API server on an ephemeral port for the rest of the
/// test process and return its base URL.
fn start_server() -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            kanban_api::serve_with_shutdown(
                listener,
                Arc::new(InMemoryStore::new()),
                false,
                std::future::pending(),
            )
            .await
            .unwrap();
        });
    });
    format!("http://{}", rx.recv().unwrap())
}

fn kanban(api_url: &str) -> Command {
    let mut cmd = Command::cargo_bin("kanban").unwrap();
    cmd.env_remove("KANBAN_DEBUG_LOG")
        .env_remove("RUST_LOG")
        .args(["--api-url", api_url]);
    cmd
}

fn parse_json_output(output: &[u8]) -> Value {
    serde_json::from_str(&String::from_utf8_lossy(output)).expect("Failed to parse JSON output")
}

fn run_ok(api_url: &str, args: &[&str]) -> Value {
    let output = kanban(api_url)
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = parse_json_output(&output);
    assert!(json["success"].as_bool().unwrap());
    json
}

fn run_err(api_url: &str, args: &[&str]) -> Value {
    let output = kanban(api_url)
        .args(args)
        .assert()
        .failure()
        .code(1)
        .get_output()
        .stderr
        .clone();
    let stderr = String::from_utf8_lossy(&output);
    let last_line = stderr.lines().last().expect("stderr is empty");
    let json: Value = serde_json::from_str(last_line).expect("Failed to parse JSON error");
    assert_eq!(json["success"], false);
    json
}

fn extract_id(json: &Value) -> String {
    json["data"]["id"].as_str().unwrap().to_string()
}

mod board_tests {
    use super::*;

    #[test]
    fn test_board_create_and_list() {
        let api = start_server();
        let created = run_ok(&api, &["board", "create", "--name", "Sprint 1"]);
        assert_eq!(created["data"]["name"], "Sprint 1");
        assert!(created["api_version"].is_string());

        let listed = run_ok(&api, &["board", "list"]);
        assert_eq!(listed["data"]["count"], 1);
        assert_eq!(listed["data"]["items"][0]["taskCount"], 0);
    }

    #[test]
    fn test_board_update_and_clear_description() {
        let api = start_server();
        let created = run_ok(
            &api,
            &["board", "create", "--name", "Sprint 1", "--description", "first"],
        );
        let id = extract_id(&created);

        let renamed = run_ok(&api, &["board", "update", "--id", &id, "--name", "Sprint 2"]);
        assert_eq!(renamed["data"]["name"], "Sprint 2");
        assert_eq!(renamed["data"]["description"], "first");

        let cleared = run_ok(
            &api,
            &["board", "update", "--id", &id, "--name", "Sprint 2", "--clear-description"],
        );
        assert_eq!(cleared["data"]["description"], Value::Null);
    }

    #[test]
    fn test_board_validation_error() {
        let api = start_server();
        let err = run_err(&api, &["board", "create", "--name", "   "]);
        assert_eq!(err["error"], "Board name is required");
    }

    #[test]
    fn test_board_delete_cascades() {
        let api = start_server();
        let board_id = extract_id(&run_ok(&api, &["board", "create", "--name", "Doomed"]));
        run_ok(&api, &["task", "create", "--board", &board_id, "--title", "goes too"]);

        let deleted = run_ok(&api, &["board", "delete", "--id", &board_id]);
        assert_eq!(deleted["data"]["deleted"], board_id.as_str());

        let tasks = run_ok(&api, &["task", "list", "--board", &board_id]);
        assert_eq!(tasks["data"]["count"], 0);

        let err = run_err(&api, &["board", "get", "--id", &board_id]);
        assert_eq!(err["error"], "Board not found");
    }
}

mod task_tests {
    use super::*;

    #[test]
    fn test_sprint_scenario_move_to_done() {
        let api = start_server();
        let board_id = extract_id(&run_ok(&api, &["board", "create", "--name", "Sprint 1"]));

        let created = run_ok(
            &api,
            &["task", "create", "--board", &board_id, "--title", "Draft release notes"],
        );
        assert_eq!(created["data"]["status"], "TODO");
        assert_eq!(created["data"]["priority"], "MEDIUM");
        let task_id = extract_id(&created);

        let moved = run_ok(&api, &["task", "move", "--id", &task_id, "--column", "done"]);
        assert_eq!(moved["data"]["outcome"], "moved");
        assert_eq!(moved["data"]["normalized"], false);
        assert_eq!(moved["data"]["previous_status"], "TODO");
        assert_eq!(moved["data"]["task"]["status"], "DONE");

        let fetched = run_ok(&api, &["task", "get", "--id", &task_id]);
        assert_eq!(fetched["data"]["status"], "DONE");
        assert_eq!(fetched["data"]["title"], "Draft release notes");
        assert_eq!(fetched["data"]["board"]["name"], "Sprint 1");
    }

    #[test]
    fn test_move_to_unknown_column_falls_back_to_todo() {
        let api = start_server();
        let board_id = extract_id(&run_ok(&api, &["board", "create", "--name", "Sprint 1"]));
        let task_id = extract_id(&run_ok(
            &api,
            &[
                "task", "create", "--board", &board_id, "--title", "X", "--status", "DONE",
            ],
        ));

        let moved = run_ok(&api, &["task", "move", "--id", &task_id, "--column", "backlog"]);
        assert_eq!(moved["data"]["normalized"], true);
        assert_eq!(moved["data"]["task"]["status"], "TODO");
    }

    #[test]
    fn test_move_accepts_uppercase_id() {
        let api = start_server();
        let board_id = extract_id(&run_ok(&api, &["board", "create", "--name", "Sprint 1"]));
        let task_id = extract_id(&run_ok(
            &api,
            &["task", "create", "--board", &board_id, "--title", "X"],
        ));

        let upper = task_id.to_uppercase();
        let moved = run_ok(&api, &["task", "move", "--id", &upper, "--column", "DONE"]);
        assert_eq!(moved["data"]["outcome"], "moved");
        assert_eq!(moved["data"]["task"]["id"], task_id.as_str());
        assert_eq!(moved["data"]["task"]["status"], "DONE");
    }

    #[test]
    fn test_id_with_path_characters_stays_on_its_route() {
        let api = start_server();
        let board_id = extract_id(&run_ok(&api, &["board", "create", "--name", "Sprint 1"]));
        let crafted = format!("board/{}", board_id);
        let err = run_err(&api, &["task", "get", "--id", &crafted]);
        assert_eq!(err["error"], "Task not found");
    }

    #[test]
    fn test_move_to_current_column_is_unchanged() {
        let api = start_server();
        let board_id = extract_id(&run_ok(&api, &["board", "create", "--name", "Sprint 1"]));
        let task_id = extract_id(&run_ok(
            &api,
            &["task", "create", "--board", &board_id, "--title", "X"],
        ));

        let moved = run_ok(&api, &["task", "move", "--id", &task_id, "--column", "TODO"]);
        assert_eq!(moved["data"]["outcome"], "unchanged");
    }

    #[test]
    fn test_task_create_errors() {
        let api = start_server();
        let err = run_err(
            &api,
            &["task", "create", "--board", "nonexistent", "--title", "X"],
        );
        assert_eq!(err["error"], "Board not found");

        let board_id = extract_id(&run_ok(&api, &["board", "create", "--name", "Sprint 1"]));
        let err = run_err(&api, &["task", "create", "--board", &board_id, "--title", ""]);
        assert_eq!(err["error"], "Task title is required");

        let err = run_err(
            &api,
            &[
                "task", "create", "--board", &board_id, "--title", "X", "--status", "ARCHIVED",
            ],
        );
        assert_eq!(err["error"], "Invalid status value");
    }

    #[test]
    fn test_task_update_keeps_unspecified_fields() {
        let api = start_server();
        let board_id = extract_id(&run_ok(&api, &["board", "create", "--name", "Sprint 1"]));
        let task_id = extract_id(&run_ok(
            &api,
            &[
                "task",
                "create",
                "--board",
                &board_id,
                "--title",
                "Draft release notes",
                "--priority",
                "HIGH",
                "--due-date",
                "2026-11-01",
            ],
        ));

        let updated = run_ok(
            &api,
            &["task", "update", "--id", &task_id, "--status", "IN_PROGRESS"],
        );
        assert_eq!(updated["data"]["status"], "IN_PROGRESS");
        assert_eq!(updated["data"]["priority"], "HIGH");
        assert_eq!(updated["data"]["title"], "Draft release notes");

        let cleared = run_ok(&api, &["task", "update", "--id", &task_id, "--clear-due-date"]);
        assert_eq!(cleared["data"]["dueDate"], Value::Null);
    }

    #[test]
    fn test_task_delete() {
        let api = start_server();
        let board_id = extract_id(&run_ok(&api, &["board", "create", "--name", "Sprint 1"]));
        let task_id = extract_id(&run_ok(
            &api,
            &["task", "create", "--board", &board_id, "--title", "X"],
        ));

        run_ok(&api, &["task", "delete", "--id", &task_id]);
        let err = run_err(&api, &["task", "delete", "--id", &task_id]);
        assert_eq!(err["error"], "Task not found");
    }
}

mod config_tests {
    use super::*;

    #[test]
    fn test_unreachable_api_reports_generic_error() {
        let err = run_err("http://127.0.0.1:9", &["board", "list"]);
        assert_eq!(err["error"], "Failed to fetch boards");
    }

    #[test]
    fn test_api_url_from_config_file() {
        let api = start_server();
        let dir = tempdir().unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, format!("[client]\napi_url = \"{}\"\n", api)).unwrap();

        Command::cargo_bin("kanban")
            .unwrap()
            .env_remove("KANBAN_API_URL")
            .args(["--config", config.to_str().unwrap(), "board", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"success\":true"));
    }

    #[test]
    fn test_help_lists_commands() {
        Command::cargo_bin("kanban")
            .unwrap()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("serve"))
            .stdout(predicate::str::contains("board"))
            .stdout(predicate::str::contains("task"));
    }
}
