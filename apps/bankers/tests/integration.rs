//! Integration tests for the bankers CLI

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const TEXTBOOK_JSON: &str = r#"{
    "num_processes": 5,
    "num_resources": 3,
    "allocation": [[0, 1, 0], [2, 0, 0], [3, 0, 2], [2, 1, 1], [0, 0, 2]],
    "maximum": [[7, 5, 3], [3, 2, 2], [9, 0, 2], [2, 2, 2], [4, 3, 3]],
    "available": [3, 3, 2]
}"#;

/// Command isolated from the user's config and dataset file
fn bankers(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_bankers"));
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("BANKERS_DATASETS", home.join("banker_data.json"))
        .env_remove("BANKERS_OUTPUT")
        .env_remove("BANKERS_COLOR")
        .env_remove("BANKERS_ROUND_POLICY")
        .env_remove("BANKERS_STEP_DELAY_MS")
        .env_remove("RUST_LOG");
    cmd
}

fn json_stdout(output: &Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_cli_version() {
    let home = TempDir::new().unwrap();
    let output = bankers(home.path()).arg("--version").output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("bankers"));
}

#[test]
fn test_cli_help() {
    let home = TempDir::new().unwrap();
    let output = bankers(home.path()).arg("--help").output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("check"));
    assert!(stdout.contains("play"));
    assert!(stdout.contains("dataset"));
}

#[test]
fn test_check_textbook_json() {
    let home = TempDir::new().unwrap();
    let output = bankers(home.path())
        .args(["--json", "check"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let json = json_stdout(&output);
    assert_eq!(json["kind"], "evaluation");
    assert_eq!(json["result"]["policy"], "one_per_round");
    assert_eq!(json["result"]["verdict"]["safe"], true);
    assert_eq!(
        json["result"]["verdict"]["sequence"],
        serde_json::json!([1, 3, 0, 2, 4])
    );
    assert_eq!(json["result"]["steps"][0]["work_after"], serde_json::json!([5, 3, 2]));
}

#[test]
fn test_check_sweep_policy() {
    let home = TempDir::new().unwrap();
    let output = bankers(home.path())
        .args(["--json", "check", "--policy", "sweep"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        json_stdout(&output)["result"]["verdict"]["sequence"],
        serde_json::json!([1, 3, 4, 0, 2])
    );
}

#[test]
fn test_check_verify_order() {
    let home = TempDir::new().unwrap();
    let accepted = bankers(home.path())
        .args(["--json", "check", "--verify", "P1 P3 P4 P0 P2"])
        .output()
        .unwrap();
    assert_eq!(accepted.status.code(), Some(0));
    let json = json_stdout(&accepted);
    assert_eq!(json["kind"], "verification");
    assert_eq!(json["result"]["valid"], true);

    let rejected = bankers(home.path())
        .args(["--json", "check", "--verify", "0,1,2,3,4"])
        .output()
        .unwrap();
    assert_eq!(rejected.status.code(), Some(2));
    assert_eq!(
        json_stdout(&rejected)["result"]["code"],
        "sequence.not_coverable"
    );
}

#[test]
fn test_unsafe_file_exits_with_two() {
    let home = TempDir::new().unwrap();
    let file = write_file(
        home.path(),
        "stalled.json",
        &TEXTBOOK_JSON.replace("\"available\": [3, 3, 2]", "\"available\": [0, 0, 0]"),
    );

    let output = bankers(home.path())
        .args(["--color", "never", "check", "--file"])
        .arg(&file)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[UNSAFE]"));
    assert!(stdout.contains("P0, P1, P2, P3, P4"));
}

#[test]
fn test_infeasible_file_is_an_error() {
    let home = TempDir::new().unwrap();
    let file = write_file(
        home.path(),
        "bad.json",
        r#"{"num_processes": 1, "num_resources": 1,
            "allocation": [[3]], "maximum": [[2]], "available": [0]}"#,
    );

    let output = bankers(home.path())
        .args(["--json", "check", "--file"])
        .arg(&file)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(json_stdout(&output)["code"], "validation.infeasible_claim");
}

#[test]
fn test_dataset_lifecycle() {
    let home = TempDir::new().unwrap();
    let file = write_file(home.path(), "textbook.json", TEXTBOOK_JSON);

    let import = bankers(home.path())
        .args(["dataset", "import", "lab"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(import.status.success(), "{}", String::from_utf8_lossy(&import.stderr));
    assert!(home.path().join("banker_data.json").exists());

    let reimport = bankers(home.path())
        .args(["--color", "never", "dataset", "import", "lab"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(reimport.status.success());
    assert!(String::from_utf8_lossy(&reimport.stderr)
        .contains("Warning: Replaced existing dataset 'lab'"));

    let list = bankers(home.path())
        .args(["--json", "dataset", "list"])
        .output()
        .unwrap();
    let json = json_stdout(&list);
    assert_eq!(json["kind"], "dataset_list");
    assert_eq!(json["result"]["datasets"][0]["name"], "lab");
    assert_eq!(json["result"]["datasets"][0]["processes"], 5);

    let check = bankers(home.path())
        .args(["--json", "check", "--dataset", "lab"])
        .output()
        .unwrap();
    assert_eq!(check.status.code(), Some(0));
    assert_eq!(json_stdout(&check)["result"]["source"], "lab");

    let remove = bankers(home.path())
        .args(["dataset", "remove", "lab"])
        .output()
        .unwrap();
    assert!(remove.status.success());

    let show = bankers(home.path())
        .args(["--json", "dataset", "show", "lab"])
        .output()
        .unwrap();
    assert_eq!(show.status.code(), Some(1));
    assert_eq!(json_stdout(&show)["code"], "storage.dataset_not_found");
}

#[test]
fn test_play_streams_steps_to_stderr() {
    let home = TempDir::new().unwrap();
    let output = bankers(home.path())
        .args(["--color", "never", "play", "--no-animate"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Step 1 (round 1): P1 can finish, releases [2, 0, 0] -> Work [5, 3, 2]"));
    assert!(stderr.contains("Step 5"));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[SAFE] safe sequence: P1 -> P3 -> P0 -> P2 -> P4"));
}

#[test]
fn test_enter_and_save() {
    let home = TempDir::new().unwrap();
    let mut child = bankers(home.path())
        .args(["--json", "enter", "--save", "typed"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"1\n1\nabc\n0\n5\n5\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(0));
    let json = json_stdout(&output);
    assert_eq!(json["result"]["source"], "typed");
    assert_eq!(json["result"]["verdict"]["sequence"], serde_json::json!([0]));
    assert!(String::from_utf8_lossy(&output.stderr).contains("'abc' is not an integer"));

    let list = bankers(home.path())
        .args(["--json", "dataset", "list"])
        .output()
        .unwrap();
    assert_eq!(json_stdout(&list)["result"]["datasets"][0]["name"], "typed");
}

#[test]
fn test_enter_eof_fails() {
    let home = TempDir::new().unwrap();
    let output = bankers(home.path())
        .arg("enter")
        .stdin(Stdio::null())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Input error"));
}
