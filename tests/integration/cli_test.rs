use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DEFAULT_GROUP: &str = "默认分组";

fn deskdo(dir: &Path) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("deskdo").unwrap();
    cmd.arg("--data-dir").arg(dir).env_remove("DESKDO_DIR");
    cmd
}

fn json(dir: &Path, args: &[&str]) -> Value {
    let output = deskdo(dir).arg("--json").args(args).output().unwrap();
    assert!(
        output.status.success(),
        "{:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn add(dir: &Path, text: &str, group: Option<&str>) -> String {
    let mut args = vec!["add", text];
    if let Some(group) = group {
        args.extend(["-g", group]);
    }
    json(dir, &args)["id"].as_str().unwrap().to_string()
}

fn texts(list: &Value) -> Vec<String> {
    list["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["text"].as_str().unwrap().to_string())
        .collect()
}

fn stored(dir: &Path, file: &str) -> Value {
    serde_json::from_str(&fs::read_to_string(dir.join(file)).unwrap()).unwrap()
}

#[test]
fn add_and_list() {
    let dir = TempDir::new().unwrap();
    deskdo(dir.path())
        .args(["add", "buy milk"])
        .assert()
        .success()
        .stdout(predicates::str::contains(DEFAULT_GROUP));

    deskdo(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("buy milk"))
        .stdout(predicates::str::contains("total: 1 | pending: 1 | completed: 0"));

    assert!(dir.path().join("todo_data.json").exists());
    assert!(dir.path().join("todo_config.json").exists());
}

#[test]
fn empty_list() {
    let dir = TempDir::new().unwrap();
    deskdo(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicates::str::contains("No tasks"));
}

#[test]
fn blank_text_is_rejected() {
    let dir = TempDir::new().unwrap();
    deskdo(dir.path()).args(["add", "   "]).assert().failure();
    assert!(!dir.path().join("todo_data.json").exists());
}

#[test]
fn stored_document_keeps_unicode_verbatim() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), "买牛奶", None);

    let raw = fs::read_to_string(dir.path().join("todo_data.json")).unwrap();
    assert!(raw.contains("买牛奶"));
    assert!(raw.contains(DEFAULT_GROUP));
    assert!(!raw.contains("\\u"));
}

#[test]
fn done_toggles_and_hidden_completed_tasks() {
    let dir = TempDir::new().unwrap();
    let a = add(dir.path(), "a", None);
    add(dir.path(), "b", None);

    let task = json(dir.path(), &["done", &a[..8]]);
    assert_eq!(task["completed"], true);

    deskdo(dir.path())
        .args(["config", "set", "show-completed", "false"])
        .assert()
        .success();

    let list = json(dir.path(), &["list"]);
    assert_eq!(texts(&list), vec!["b"]);
    assert_eq!(list["stats"]["completed"], 1);

    let list = json(dir.path(), &["list", "--all"]);
    assert_eq!(texts(&list), vec!["a", "b"]);

    let task = json(dir.path(), &["done", &a]);
    assert_eq!(task["completed"], false);
}

#[test]
fn short_prefix_is_rejected() {
    let dir = TempDir::new().unwrap();
    let a = add(dir.path(), "a", None);
    deskdo(dir.path())
        .args(["done", &a[..2]])
        .assert()
        .failure()
        .stderr(predicates::str::contains("error"));
}

#[test]
fn edit_and_remove() {
    let dir = TempDir::new().unwrap();
    let a = add(dir.path(), "a", None);
    let b = add(dir.path(), "b", None);
    add(dir.path(), "c", None);

    deskdo(dir.path())
        .args(["edit", &b, "line one\nline two"])
        .assert()
        .success();
    deskdo(dir.path()).args(["edit", &b, "  "]).assert().failure();
    deskdo(dir.path()).args(["rm", &a]).assert().success();

    let list = json(dir.path(), &["list"]);
    assert_eq!(texts(&list), vec!["line one\nline two", "c"]);
    let orders: Vec<u64> = list["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["order"].as_u64().unwrap())
        .collect();
    assert_eq!(orders, vec![0, 1]);
}

#[test]
fn move_and_reorder_within_group() {
    let dir = TempDir::new().unwrap();
    let a = add(dir.path(), "a", None);
    let b = add(dir.path(), "b", None);
    let c = add(dir.path(), "c", None);

    let moved = json(dir.path(), &["up", &a]);
    assert_eq!(moved["moved"], false);

    json(dir.path(), &["down", &a]);
    assert_eq!(texts(&json(dir.path(), &["list"])), vec!["b", "a", "c"]);

    json(dir.path(), &["reorder", &c, &a, &b]);
    assert_eq!(texts(&json(dir.path(), &["list"])), vec!["c", "a", "b"]);

    // incomplete id set
    deskdo(dir.path())
        .args(["reorder", &c, &a])
        .assert()
        .failure();
    assert_eq!(texts(&json(dir.path(), &["list"])), vec!["c", "a", "b"]);
}

#[test]
fn rename_group_moves_tasks_and_follows_current() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), "default task", None);
    deskdo(dir.path()).args(["group", "add", "工作"]).assert().success();
    add(dir.path(), "w1", None);
    add(dir.path(), "w2", None);

    let renamed = json(dir.path(), &["group", "rename", "工作", "项目"]);
    assert_eq!(renamed["tasks_moved"], 2);

    let list = json(dir.path(), &["list"]);
    assert_eq!(list["group"], "项目");
    assert_eq!(texts(&list), vec!["w1", "w2"]);

    let config = stored(dir.path(), "todo_config.json");
    assert_eq!(config["groups"], serde_json::json!([DEFAULT_GROUP, "项目"]));
    assert_eq!(config["current_group"], "项目");
}

#[test]
fn delete_group_appends_tasks_to_default() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), "d1", None);
    add(dir.path(), "d2", None);
    deskdo(dir.path()).args(["group", "add", "Errands"]).assert().success();
    add(dir.path(), "e1", None);
    add(dir.path(), "e2", None);

    deskdo(dir.path())
        .args(["group", "delete", "Errands"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Moved 2 tasks"));

    let list = json(dir.path(), &["list"]);
    assert_eq!(list["group"], DEFAULT_GROUP);
    assert_eq!(texts(&list), vec!["d1", "d2", "e1", "e2"]);

    let groups = json(dir.path(), &["group", "list"]);
    assert_eq!(groups.as_array().unwrap().len(), 1);
}

#[test]
fn default_group_cannot_be_renamed_or_deleted() {
    let dir = TempDir::new().unwrap();
    deskdo(dir.path())
        .args(["group", "rename", DEFAULT_GROUP, "Inbox"])
        .assert()
        .failure();
    deskdo(dir.path())
        .args(["group", "delete", DEFAULT_GROUP])
        .assert()
        .failure();
}

#[test]
fn duplicate_and_unknown_groups_fail() {
    let dir = TempDir::new().unwrap();
    deskdo(dir.path()).args(["group", "add", "Home"]).assert().success();
    deskdo(dir.path()).args(["group", "add", " Home "]).assert().failure();
    deskdo(dir.path()).args(["group", "switch", "Nowhere"]).assert().failure();
    deskdo(dir.path())
        .args(["add", "x", "-g", "Nowhere"])
        .assert()
        .failure();
}

#[test]
fn legacy_document_is_upgraded() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("todo_data.json"),
        r#"[
  {"id": 1, "text": "first", "completed": false, "created_at": "2023-05-01 09:00:00"},
  {"id": 2, "text": "second", "completed": true, "created_at": "2023-05-01 09:05:00"}
]"#,
    )
    .unwrap();

    let list = json(dir.path(), &["list"]);
    assert_eq!(texts(&list), vec!["first", "second"]);
    assert_eq!(list["tasks"][0]["group"], DEFAULT_GROUP);
    assert_eq!(list["tasks"][1]["order"], 1);

    // legacy numeric ids resolve exactly
    json(dir.path(), &["done", "2"]);
    let doc = stored(dir.path(), "todo_data.json");
    assert_eq!(doc[1]["completed"], false);
    assert_eq!(doc[1]["group"], DEFAULT_GROUP);
    assert_eq!(doc[0]["created_at"], "2023-05-01 09:00:00");
}

#[test]
fn corrupt_task_document_starts_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("todo_data.json"), "not json").unwrap();

    let list = json(dir.path(), &["list"]);
    assert_eq!(list["stats"]["total"], 0);
}

#[test]
fn auto_hide_is_reset_on_startup() {
    let dir = TempDir::new().unwrap();
    deskdo(dir.path())
        .args(["config", "set", "auto-hide", "true"])
        .assert()
        .success();
    assert_eq!(stored(dir.path(), "todo_config.json")["auto_hide_enabled"], true);

    let config = json(dir.path(), &["config", "show"]);
    assert_eq!(config["auto_hide_enabled"], false);
    assert_eq!(stored(dir.path(), "todo_config.json")["auto_hide_enabled"], false);
}

#[test]
fn unknown_preference_fails() {
    let dir = TempDir::new().unwrap();
    deskdo(dir.path())
        .args(["config", "set", "font-size", "true"])
        .assert()
        .failure();
    deskdo(dir.path())
        .args(["config", "set", "show-completed", "maybe"])
        .assert()
        .failure();
}

#[test]
fn close_choice_is_remembered() {
    let dir = TempDir::new().unwrap();
    assert_eq!(json(dir.path(), &["close"])["action"], "ask");

    let chosen = json(dir.path(), &["close", "--to-tray"]);
    assert_eq!(chosen["action"], "hide_to_tray");
    assert_eq!(json(dir.path(), &["close"])["action"], "ask");

    json(dir.path(), &["close", "--quit", "--remember"]);
    assert_eq!(json(dir.path(), &["close"])["action"], "quit");
}
