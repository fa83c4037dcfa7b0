use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Helper struct to manage test environment
struct TestEnv {
    _temp_dir: TempDir,
    work_dir: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let work_dir = temp_dir.path().to_path_buf();

        Self {
            _temp_dir: temp_dir,
            work_dir,
        }
    }

    fn initialized() -> Self {
        let env = Self::new();
        env.run(&["init"]).expect("Init failed");
        env
    }

    /// Run a pantry command and return stdout, or stderr on failure
    fn run(&self, args: &[&str]) -> Result<String, String> {
        self.run_in(&self.work_dir, args)
    }

    /// Like `run`, but from another directory (e.g. a second project)
    fn run_in(&self, dir: &Path, args: &[&str]) -> Result<String, String> {
        let output = Command::new(env!("CARGO_BIN_EXE_pt"))
            .args(args)
            .current_dir(dir)
            .env_remove("PANTRY_LOG")
            .output()
            .expect("Failed to execute pt");

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        } else {
            Err(String::from_utf8_lossy(&output.stderr).to_string())
        }
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let output = self.run(args).expect("Command failed");
        serde_json::from_str(&output).expect("Output should be valid JSON")
    }

    fn pantry_dir(&self) -> PathBuf {
        self.work_dir.join(".pantry")
    }

    fn create_list(&self, name: &str) -> String {
        let list = self.run_json(&["list", "create", name, "--json"]);
        list["id"].as_str().unwrap().to_string()
    }

    fn add_item(&self, list_id: &str, name: &str, extra: &[&str]) -> String {
        let mut args = vec!["item", "add", list_id, name, "--json"];
        args.extend_from_slice(extra);
        let result = self.run_json(&args);
        result["item"]["id"].as_str().unwrap().to_string()
    }
}

/// Extract the ID from a line like "Created list: XXXXXXXX"
fn id_after(output: &str, marker: &str) -> String {
    output
        .lines()
        .find(|line| line.contains(marker))
        .and_then(|line| line.split_whitespace().nth(2))
        .expect("Could not extract ID")
        .to_string()
}

#[test]
fn test_init_creates_pantry_directory() {
    let env = TestEnv::new();
    assert!(!env.pantry_dir().exists());

    let output = env.run(&["init"]).expect("Init command failed");
    assert!(output.contains("Initialized pantry"));
    assert!(env.pantry_dir().is_dir());
    assert!(env.pantry_dir().join("config.toml").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let env = TestEnv::initialized();
    let output = env.run(&["init"]).expect("Second init failed");
    assert!(output.contains("already initialized"));
}

#[test]
fn test_init_stealth_in_git_repo() {
    let env = TestEnv::new();
    std::fs::create_dir(env.work_dir.join(".git")).unwrap();

    env.run(&["init", "--stealth"]).expect("Init failed");
    let gitignore = std::fs::read_to_string(env.work_dir.join(".gitignore")).unwrap();
    assert!(gitignore.lines().any(|l| l == ".pantry"));
}

#[test]
fn test_commands_fail_without_init() {
    let env = TestEnv::new();

    let result = env.run(&["list", "ls"]);
    assert!(result.is_err(), "Commands should fail without init");
    assert!(result.unwrap_err().contains("not initialized"));
}

#[test]
fn test_create_and_show_lists() {
    let env = TestEnv::initialized();

    let output = env.run(&["list", "ls"]).expect("List failed");
    assert!(output.contains("No lists found"));

    let output = env
        .run(&["list", "create", "Weekly shop"])
        .expect("Create list failed");
    let list_id = id_after(&output, "Created list:");
    assert_eq!(list_id.len(), 8, "List ID should be 8 characters");

    let output = env.run(&["list", "ls"]).expect("List failed");
    assert!(output.contains(&list_id));
    assert!(output.contains("Weekly shop"));
    assert!(output.contains("[open]"));
}

#[test]
fn test_add_and_list_items() {
    let env = TestEnv::initialized();
    let list_id = env.create_list("Weekly");

    let output = env
        .run(&[
            "item", "add", &list_id, "Milk", "--quantity", "2", "--unit", "l", "--category",
            "dairy",
        ])
        .expect("Add item failed");
    let item_id = id_after(&output, "Added item:");
    assert!(output.contains("Milk (2 l)"));

    let output = env
        .run(&["item", "ls", &list_id])
        .expect("List items failed");
    assert!(output.contains(&item_id));
    assert!(output.contains("[needed]"));
    assert!(output.contains("#dairy"));
}

#[test]
fn test_add_warns_about_similar_item() {
    let env = TestEnv::initialized();
    let list_id = env.create_list("Weekly");
    let first = env.add_item(&list_id, "Tomatoes", &[]);

    let output = env
        .run(&["item", "add", &list_id, "tomatos"])
        .expect("Add item failed");
    assert!(output.contains("Similar item already on list: Tomatoes"));
    assert!(output.contains(&first));
}

#[test]
fn test_item_lifecycle_completes_list() {
    let env = TestEnv::initialized();
    let list_id = env.create_list("Quick run");
    let bread = env.add_item(&list_id, "Bread", &[]);
    let jam = env.add_item(&list_id, "Jam", &[]);

    env.run(&["item", "buy", &bread]).expect("Buy failed");
    let output = env.run(&["item", "skip", &jam]).expect("Skip failed");
    assert!(output.contains("List complete:"));

    let status = env.run_json(&["status", "--list", &list_id, "--json"]);
    assert_eq!(status["state"], "completed");
    assert_eq!(status["counts"]["bought"], 1);
    assert_eq!(status["counts"]["skipped"], 1);

    let output = env.run(&["item", "restore", &jam]).expect("Restore failed");
    assert!(output.contains("reopened"));

    let item = env.run_json(&["status", "--item", &jam, "--json"]);
    assert_eq!(item["state"], "needed");
}

#[test]
fn test_invalid_transition_reports_state() {
    let env = TestEnv::initialized();
    let list_id = env.create_list("Weekly");
    let item_id = env.add_item(&list_id, "Eggs", &[]);

    env.run(&["item", "buy", &item_id]).expect("Buy failed");
    let err = env.run(&["item", "buy", &item_id]).unwrap_err();
    assert!(err.contains("Current state: bought"));
}

#[test]
fn test_unknown_item_suggests_similar_id() {
    let env = TestEnv::initialized();
    let list_id = env.create_list("Weekly");
    let item_id = env.add_item(&list_id, "Eggs", &[]);

    let mut typo = item_id.clone();
    typo.pop();
    typo.push('-');

    let err = env.run(&["item", "buy", &typo]).unwrap_err();
    assert!(err.contains(&format!("Item not found: {typo}")));
    assert!(err.contains(&format!("Did you mean: {item_id}")));
}

#[test]
fn test_notes_shown_in_status() {
    let env = TestEnv::initialized();
    let list_id = env.create_list("Weekly");
    let item_id = env.add_item(&list_id, "Coffee", &[]);

    env.run(&["item", "note", &item_id, "Whole beans, not ground"])
        .expect("Note failed");

    let output = env
        .run(&["status", "--item", &item_id])
        .expect("Status failed");
    assert!(output.contains("Whole beans, not ground"));

    let output = env
        .run(&["status", "--item", &item_id, "--concise"])
        .expect("Status failed");
    assert!(!output.contains("Whole beans"));

    let output = env
        .run(&["item", "ls", &list_id, "--verbose"])
        .expect("List failed");
    assert!(output.contains("Notes: (1)"));
}

#[test]
fn test_match_ranks_closest_items() {
    let env = TestEnv::initialized();
    let list_id = env.create_list("Fruit");
    let apple = env.add_item(&list_id, "Apple", &[]);
    env.add_item(&list_id, "Orange", &[]);
    let appl = env.add_item(&list_id, "Appl", &[]);

    let result = env.run_json(&["match", "aple", "--top", "2", "--json"]);
    let ids: Vec<&str> = result["matches"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![apple.as_str(), appl.as_str()]);
    assert_eq!(result["matches"][0]["distance"], 1);
}

#[test]
fn test_match_limits() {
    let env = TestEnv::initialized();
    let list_id = env.create_list("Fruit");
    for name in ["Apple", "Apricot", "Banana", "Cherry"] {
        env.add_item(&list_id, name, &[]);
    }

    let result = env.run_json(&["match", "apple", "--list", &list_id, "--json"]);
    assert_eq!(result["matches"].as_array().unwrap().len(), 3);

    let output = env.run(&["match", "apple", "--top", "-1"]).expect("Match failed");
    assert!(output.contains("No matches"));

    let output = env.run(&["match", "apple", "--top", "0"]).expect("Match failed");
    assert!(output.contains("No matches"));
}

#[test]
fn test_match_from_candidate_file() {
    let env = TestEnv::initialized();
    let path = env.work_dir.join("candidates.json");
    std::fs::write(
        &path,
        r#"[{"id":"1","name":"Apple"},{"id":"2","name":"Orange"},{"id":"3","name":"Appl"}]"#,
    )
    .unwrap();

    let result = env.run_json(&[
        "match",
        "aple",
        "--from",
        path.to_str().unwrap(),
        "--top",
        "2",
        "--json",
    ]);
    assert_eq!(result["matches"][0]["id"], "1");
    assert_eq!(result["matches"][1]["id"], "3");

    std::fs::write(&path, r#"[{"id":"1"}]"#).unwrap();
    let err = env
        .run(&["match", "aple", "--from", path.to_str().unwrap()])
        .unwrap_err();
    assert!(err.contains("Invalid candidate list"));
}

#[test]
fn test_summary_groups_by_category() {
    let env = TestEnv::initialized();
    let list_id = env.create_list("Weekly");
    env.add_item(&list_id, "Milk", &["--category", "dairy", "-q", "2", "-u", "l"]);
    env.add_item(&list_id, "Apples", &["--category", "produce", "-q", "6"]);
    env.add_item(&list_id, "Yoghurt", &["--category", "dairy", "-q", "1", "-u", "l"]);
    env.add_item(&list_id, "Salt", &[]);

    let summary = env.run_json(&["summary", "--list", &list_id, "--json"]);
    let groups = summary["groups"].as_array().unwrap();
    let keys: Vec<&str> = groups.iter().map(|g| g["key"].as_str().unwrap()).collect();
    assert_eq!(keys, vec!["dairy", "produce", "uncategorized"]);
    assert_eq!(groups[0]["count"], 2);
    assert_eq!(groups[0]["quantities"][0]["unit"], "l");
    assert_eq!(groups[0]["quantities"][0]["total"], 3.0);

    let summary = env.run_json(&["summary", "--by", "state", "--json"]);
    assert_eq!(summary["groups"][0]["key"], "needed");
    assert_eq!(summary["groups"][0]["count"], 4);
}

#[test]
fn test_summary_uses_configured_grouping() {
    let env = TestEnv::initialized();
    std::fs::write(
        env.pantry_dir().join("config.toml"),
        "[summary]\ngroup_by = \"name\"\n",
    )
    .unwrap();
    let list_id = env.create_list("Weekly");
    env.add_item(&list_id, "Milk", &[]);
    env.add_item(&list_id, "MILK", &[]);

    let summary = env.run_json(&["summary", "--json"]);
    assert_eq!(summary["group_by"], "name");
    assert_eq!(summary["groups"].as_array().unwrap().len(), 1);
    assert_eq!(summary["groups"][0]["count"], 2);
}

#[test]
fn test_export_csv() {
    let env = TestEnv::initialized();
    let list_id = env.create_list("Weekly");
    env.add_item(&list_id, "Milk", &["-q", "2", "-u", "l", "-c", "dairy"]);
    env.add_item(&list_id, "Bread", &[]);

    let output = env.run(&["export", &list_id]).expect("Export failed");
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "name,quantity,unit,category,state,list");
    assert_eq!(lines[1], "Milk,2,l,dairy,needed,Weekly");
    assert_eq!(lines[2], "Bread,1,,,needed,Weekly");

    let path = env.work_dir.join("weekly.csv");
    let output = env
        .run(&["export", &list_id, "--output", path.to_str().unwrap()])
        .expect("Export failed");
    assert!(output.contains("Exported 2 item(s)"));
    assert_eq!(std::fs::read_to_string(path).unwrap().lines().count(), 3);
}

#[test]
fn test_redirect_shares_another_pantry() {
    let shared = TestEnv::initialized();
    let list_id = shared.create_list("Shared");

    let env = TestEnv::initialized();
    std::fs::write(
        env.pantry_dir().join("redirect"),
        shared.pantry_dir().to_str().unwrap(),
    )
    .unwrap();

    let output = env.run(&["list", "ls"]).expect("List failed");
    assert!(output.contains(&list_id));
}

#[test]
fn test_relative_redirect_resolves_from_project_root() {
    let env = TestEnv::new();
    let shared = env.work_dir.join("shared");
    let project = env.work_dir.join("project");
    std::fs::create_dir(&shared).unwrap();
    std::fs::create_dir(&project).unwrap();

    env.run_in(&shared, &["init"]).expect("Init failed");
    env.run_in(&project, &["init"]).expect("Init failed");
    let output = env
        .run_in(&shared, &["list", "create", "Shared"])
        .expect("Create failed");
    let shared_list = id_after(&output, "Created list:");

    std::fs::write(project.join(".pantry/redirect"), "../shared/.pantry\n").unwrap();

    let output = env.run_in(&project, &["list", "ls"]).expect("List failed");
    assert!(output.contains(&shared_list));

    // Writes land in the shared store too.
    let output = env
        .run_in(&project, &["list", "create", "From project"])
        .expect("Create failed");
    let project_list = id_after(&output, "Created list:");
    assert!(shared.join(".pantry").join(&project_list).is_dir());
    assert!(!project.join(".pantry").join(&project_list).exists());
}

#[test]
fn test_redirect_to_missing_directory_uses_local_lists() {
    let env = TestEnv::initialized();
    let local_list = env.create_list("Local");
    std::fs::write(env.pantry_dir().join("redirect"), "missing/.pantry").unwrap();

    let output = env.run(&["list", "ls"]).expect("List failed");
    assert!(output.contains(&local_list));

    let new_list = env.create_list("Still local");
    assert!(env.pantry_dir().join(&new_list).is_dir());
}

#[test]
fn test_transitions_and_notes_print_json() {
    let env = TestEnv::initialized();
    let list_id = env.create_list("Weekly");
    let item_id = env.add_item(&list_id, "Eggs", &[]);

    let bought = env.run_json(&["item", "buy", &item_id, "--json"]);
    assert_eq!(bought["item"]["id"], item_id.as_str());
    assert_eq!(bought["item"]["state"], "bought");
    assert_eq!(bought["list_state"], "completed");

    let restored = env.run_json(&["item", "restore", &item_id, "--json"]);
    assert_eq!(restored["item"]["state"], "needed");
    assert_eq!(restored["list_state"], "open");

    let skipped = env.run_json(&["item", "skip", &item_id, "--json"]);
    assert_eq!(skipped["item"]["state"], "skipped");

    let noted = env.run_json(&["item", "note", &item_id, "free range", "--json"]);
    assert_eq!(noted["notes"][0]["text"], "free range");
}

#[test]
fn test_json_output_is_clean_with_logging_enabled() {
    let env = TestEnv::initialized();
    let list_id = env.create_list("Weekly");

    let output = Command::new(env!("CARGO_BIN_EXE_pt"))
        .args(["item", "add", &list_id, "Milk", "--json"])
        .current_dir(&env.work_dir)
        .env("PANTRY_LOG", "debug")
        .output()
        .expect("Failed to execute pt");

    assert!(output.status.success());
    let parsed: Value = serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(parsed["item"]["name"], "Milk");
}
