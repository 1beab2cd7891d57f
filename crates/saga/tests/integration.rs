//! End-to-end CLI integration tests for the `saga` binary.
//!
//! Each test creates its own temporary directory, initializes a catalog,
//! and exercises the `saga` binary as a subprocess via `assert_cmd`.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a `Command` targeting the cargo-built `saga` binary, isolated from
/// the caller's environment.
fn saga(tmp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("saga").unwrap();
    cmd.current_dir(tmp.path())
        .env_remove("SAGA_DIR")
        .env_remove("SAGA_LOG")
        .env("NO_COLOR", "1");
    cmd
}

/// Initialize a fresh catalog in a temp directory and return the handle.
fn init_catalog() -> TempDir {
    let tmp = TempDir::new().unwrap();
    saga(&tmp).args(["init", "--quiet"]).assert().success();
    tmp
}

fn add_entry(tmp: &TempDir, entry_type: &str, name: &str, page: u32) {
    saga(tmp)
        .args(["entry", "add", entry_type, name, "--book", "Core", "--page"])
        .arg(page.to_string())
        .assert()
        .success();
}

fn depend(tmp: &TempDir, args: &[&str]) {
    saga(tmp)
        .args(["dependency", "add"])
        .args(args)
        .assert()
        .success();
}

fn stdout_lines(tmp: &TempDir, args: &[&str]) -> Vec<String> {
    let output = saga(tmp).args(args).output().unwrap();
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Force Sensitivity needs Dexterity 13, Use the Force (which needs Wisdom)
/// and one of two talents.
fn force_catalog() -> TempDir {
    let tmp = init_catalog();
    add_entry(&tmp, "Feat", "Force Sensitivity", 85);
    add_entry(&tmp, "Ability", "Dexterity", 10);
    add_entry(&tmp, "Skill", "Use the Force", 72);
    add_entry(&tmp, "Ability", "Wisdom", 11);
    add_entry(&tmp, "Talent", "Adept Negotiator", 101);
    add_entry(&tmp, "Talent", "Force Perception", 102);

    depend(
        &tmp,
        &["Force Sensitivity", "-t", "Feat", "--item", "Ability:Dexterity", "--limit", "13"],
    );
    depend(&tmp, &["Force Sensitivity", "--item", "Skill:Use the Force"]);
    depend(&tmp, &["Use the Force", "--item", "Ability:Wisdom"]);
    depend(
        &tmp,
        &[
            "Force Sensitivity",
            "--item",
            "Talent:Adept Negotiator",
            "--item",
            "Talent:Force Perception",
        ],
    );
    tmp
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_data_dir_and_seeds() {
    let tmp = TempDir::new().unwrap();
    saga(&tmp)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("saga initialized"));

    let data_dir = tmp.path().join(".saga");
    assert!(data_dir.join("config.yaml").is_file());
    assert!(data_dir.join("saga.db").is_file());

    let types = stdout_lines(&tmp, &["types"]);
    assert_eq!(types.len(), 12);
    assert_eq!(types[0], "Ability");
    assert!(types.contains(&"Talent".to_string()));
}

#[test]
fn init_twice_requires_force() {
    let tmp = init_catalog();
    saga(&tmp)
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("[ERROR]"))
        .stderr(predicate::str::contains("--force"));

    saga(&tmp).args(["init", "--force", "-q"]).assert().success();
}

#[test]
fn init_without_seed_has_no_books() {
    let tmp = TempDir::new().unwrap();
    saga(&tmp).args(["init", "--no-seed", "-q"]).assert().success();
    saga(&tmp)
        .args(["book", "list"])
        .assert()
        .success()
        .stderr(predicate::str::contains("no matching books"));
}

#[test]
fn db_flag_points_at_data_dir() {
    let tmp = TempDir::new().unwrap();
    let campaign = tmp.path().join("campaign");
    saga(&tmp)
        .args(["init", "-q", "--db"])
        .arg(&campaign)
        .assert()
        .success();
    assert!(campaign.join(".saga").join("saga.db").is_file());

    saga(&tmp)
        .args(["types", "--db"])
        .arg(&campaign)
        .assert()
        .success()
        .stdout(predicate::str::contains("Feat"));
}

#[test]
fn commands_outside_catalog_fail() {
    let tmp = TempDir::new().unwrap();
    saga(&tmp)
        .arg("types")
        .assert()
        .failure()
        .stderr(predicate::str::contains("saga init"));
}

#[test]
fn catalog_found_from_subdirectory() {
    let tmp = init_catalog();
    let nested = tmp.path().join("notes").join("session-1");
    std::fs::create_dir_all(&nested).unwrap();

    let mut cmd = Command::cargo_bin("saga").unwrap();
    cmd.current_dir(&nested)
        .env_remove("SAGA_DIR")
        .env("NO_COLOR", "1")
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("Species"));
}

// ---------------------------------------------------------------------------
// entry
// ---------------------------------------------------------------------------

#[test]
fn entry_add_prints_row() {
    let tmp = init_catalog();
    saga(&tmp)
        .args(["entry", "add", "Skill", "Pilot", "-b", "Core", "-p", "71"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Name"))
        .stdout(predicate::str::contains("Pilot"))
        .stdout(predicate::str::contains("Core Rulebook"));
}

#[test]
fn entry_add_json() {
    let tmp = init_catalog();
    let output = saga(&tmp)
        .args(["entry", "add", "Skill", "Pilot", "-b", "Core", "-p", "71", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["name"], "Pilot");
    assert_eq!(json["type"], "Skill");
    assert_eq!(json["page"], 71);
}

#[test]
fn entry_add_rejects_bad_input() {
    let tmp = init_catalog();
    saga(&tmp)
        .args(["entry", "add", "Skill", "Pilot", "-b", "Core", "-p", "0"])
        .assert()
        .failure();

    saga(&tmp)
        .args(["entry", "add", "Skill", "Pilot", "-b", "Nope", "-p", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[WARNING]"));

    saga(&tmp)
        .args(["entry", "add", "Spell", "Pilot", "-b", "Core", "-p", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[WARNING]"));
}

#[test]
fn entry_duplicate_is_rejected() {
    let tmp = init_catalog();
    add_entry(&tmp, "Skill", "Pilot", 71);
    saga(&tmp)
        .args(["entry", "add", "Skill", "pilot", "-b", "Core", "-p", "71"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn entry_set_and_info() {
    let tmp = init_catalog();
    add_entry(&tmp, "Skill", "Pilot", 71);

    saga(&tmp)
        .args(["entry", "set", "Skill", "Pilot", "--page", "72", "--descr", "Fly starships."])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pilot (Skill, Core Rulebook p.72)"))
        .stdout(predicate::str::contains("Fly starships."));

    saga(&tmp)
        .args(["entry", "info", "skill", "pilot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pilot (Skill, Core Rulebook p.72)"));

    saga(&tmp)
        .args(["entry", "set", "Skill", "Pilot", "--descr", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fly starships.").not());
}

#[test]
fn missing_entry_is_a_note() {
    let tmp = init_catalog();
    saga(&tmp)
        .args(["entry", "info", "Skill", "Nothing"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[NOTE]"))
        .stderr(predicate::str::contains("Skill:Nothing"));
}

#[test]
fn entry_find_lists_matches() {
    let tmp = force_catalog();
    let lines = stdout_lines(&tmp, &["entry", "find", "force"]);
    // header, separator and three rows
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("Name"));
    assert!(lines.iter().any(|l| l.starts_with("Use the Force")));

    let lines = stdout_lines(&tmp, &["entry", "find", "force", "-t", "Talent"]);
    assert_eq!(lines.len(), 3);
    assert!(lines[2].starts_with("Force Perception"));

    saga(&tmp)
        .args(["entry", "find", "zzz"])
        .assert()
        .success()
        .stderr(predicate::str::contains("no matching entries"));
}

#[test]
fn entry_find_in_descriptions() {
    let tmp = init_catalog();
    add_entry(&tmp, "Skill", "Pilot", 71);
    saga(&tmp)
        .args(["entry", "set", "Skill", "Pilot", "-d", "Fly starships."])
        .assert()
        .success();

    assert!(stdout_lines(&tmp, &["entry", "find", "starship"]).is_empty());
    let lines = stdout_lines(&tmp, &["entry", "find", "starship", "-d"]);
    assert_eq!(lines.len(), 3);
}

#[test]
fn entry_delete_removes_edges() {
    let tmp = force_catalog();
    saga(&tmp)
        .args(["entry", "delete", "Skill", "Use the Force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted Skill:Use the Force"));

    let lines = stdout_lines(&tmp, &["entry", "depends", "Feat", "Force Sensitivity"]);
    assert!(lines.iter().all(|l| !l.contains("Use the Force")));
    assert!(lines.iter().all(|l| !l.contains("Wisdom")));
}

// ---------------------------------------------------------------------------
// dependencies
// ---------------------------------------------------------------------------

#[test]
fn depends_renders_reference_tree() {
    let tmp = force_catalog();
    let lines = stdout_lines(&tmp, &["entry", "depends", "Feat", "Force Sensitivity", "-v"]);
    assert_eq!(
        lines,
        [
            "Force Sensitivity (Feat, Core Rulebook p.85)",
            " ├── Dexterity 13+ (Ability, Core Rulebook p.10)",
            " ├── Use the Force (Skill, Core Rulebook p.72)",
            " │    └── Wisdom (Ability, Core Rulebook p.11)",
            " └── Adept Negotiator (Talent, Core Rulebook p.101) | Force Perception (Talent, Core Rulebook p.102)",
        ]
    );
}

#[test]
fn depends_renders_plain_tree() {
    let tmp = force_catalog();
    let lines = stdout_lines(&tmp, &["entry", "depends", "Feat", "Force Sensitivity"]);
    assert_eq!(
        lines,
        [
            "Force Sensitivity (Feat)",
            " ├── Dexterity 13+ (Ability)",
            " ├── Use the Force (Skill)",
            " │    └── Wisdom (Ability)",
            " └── Adept Negotiator (Talent) | Force Perception (Talent)",
        ]
    );
}

#[test]
fn depends_json_has_lines() {
    let tmp = force_catalog();
    let output = saga(&tmp)
        .args(["entry", "depends", "Feat", "Force Sensitivity", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let lines = json["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "Force Sensitivity (Feat)");
}

#[test]
fn configured_separator_is_used() {
    let tmp = force_catalog();
    std::fs::write(
        tmp.path().join(".saga").join("config.yaml"),
        "render:\n  separator: \" or \"\n",
    )
    .unwrap();

    let lines = stdout_lines(&tmp, &["entry", "depends", "Feat", "Force Sensitivity"]);
    assert_eq!(lines[4], " └── Adept Negotiator (Talent) or Force Perception (Talent)");
}

#[test]
fn dependency_amount_is_rendered() {
    let tmp = init_catalog();
    add_entry(&tmp, "Class", "Jedi Knight", 40);
    add_entry(&tmp, "Class", "Jedi", 39);
    depend(&tmp, &["Jedi Knight", "--item", "Class:Jedi", "--amount", "2"]);

    let lines = stdout_lines(&tmp, &["entry", "depends", "Class", "Jedi Knight"]);
    assert_eq!(lines[1], " └── 2 from Jedi (Class)");
}

#[test]
fn ambiguous_name_is_a_caution() {
    let tmp = init_catalog();
    add_entry(&tmp, "Skill", "Pilot", 71);
    add_entry(&tmp, "Feat", "Pilot", 88);
    add_entry(&tmp, "Ability", "Dexterity", 10);

    saga(&tmp)
        .args(["dependency", "add", "Pilot", "--item", "Ability:Dexterity"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[CAUTION]"))
        .stderr(predicate::str::contains("found 2 entries"));

    depend(&tmp, &["Pilot", "-t", "Feat", "--item", "Ability:Dexterity"]);
}

#[test]
fn cycle_is_rejected() {
    let tmp = force_catalog();
    saga(&tmp)
        .args(["dependency", "add", "Wisdom", "--item", "Feat:Force Sensitivity"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[WARNING]"))
        .stderr(predicate::str::contains("cycle"));
}

#[test]
fn unresolved_item_aborts_dependency_add() {
    let tmp = force_catalog();
    saga(&tmp)
        .args([
            "dependency",
            "add",
            "Wisdom",
            "--item",
            "Skill:Nothing",
            "--item",
            "Talent:Adept Negotiator",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("[NOTE]"));

    let lines = stdout_lines(&tmp, &["entry", "depends", "Ability", "Wisdom"]);
    assert_eq!(lines, ["Wisdom (Ability)"]);

    saga(&tmp)
        .args(["dependency", "add", "Wisdom", "--item", ":Nothing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[WARNING]"));
}

#[test]
fn dependency_delete_some_then_all() {
    let tmp = force_catalog();
    saga(&tmp)
        .args([
            "dependency",
            "delete",
            "Feat",
            "Force Sensitivity",
            "--item",
            "Skill:Use the Force",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 dependencies."));

    saga(&tmp)
        .args(["dep", "delete", "Feat", "Force Sensitivity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 3 dependencies."));

    let lines = stdout_lines(&tmp, &["entry", "depends", "Feat", "Force Sensitivity"]);
    assert_eq!(lines, ["Force Sensitivity (Feat)"]);
}

#[test]
fn dependency_delete_with_only_unknown_items_removes_nothing() {
    let tmp = force_catalog();
    saga(&tmp)
        .args(["dep", "delete", "Feat", "Force Sensitivity", "--item", "Skill:Nothing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 0 dependencies."));
}

// ---------------------------------------------------------------------------
// trees
// ---------------------------------------------------------------------------

fn jedi_tree() -> TempDir {
    let tmp = force_catalog();
    add_entry(&tmp, "Class", "Jedi", 39);
    saga(&tmp)
        .args([
            "tree",
            "add",
            "Jedi",
            "--item",
            "Talent:Force Perception",
            "--item",
            "Talent:Adept Negotiator",
            "--item",
            "Talent:Nothing",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 members added"))
        .stderr(predicate::str::contains("[NOTE]"));
    tmp
}

#[test]
fn tree_list_orders_members_by_name() {
    let tmp = jedi_tree();
    let lines = stdout_lines(&tmp, &["tree", "list", "Jedi"]);
    assert_eq!(
        lines,
        [
            "Jedi (Class)",
            " ├── Adept Negotiator (Talent)",
            " └── Force Perception (Talent)",
        ]
    );

    let lines = stdout_lines(&tmp, &["tree", "list", "Jedi", "-t", "Class", "-v"]);
    assert_eq!(lines[1], " ├── Adept Negotiator (Talent, Core Rulebook p.101)");
}

#[test]
fn tree_list_depth() {
    let tmp = jedi_tree();
    add_entry(&tmp, "Class", "Soldier", 41);
    saga(&tmp)
        .args(["tree", "add", "Soldier", "--item", "Class:Jedi"])
        .assert()
        .success();

    assert_eq!(stdout_lines(&tmp, &["tree", "list", "Soldier"]).len(), 4);
    assert_eq!(stdout_lines(&tmp, &["tree", "list", "Soldier", "--depth", "1"]).len(), 2);
    assert_eq!(
        stdout_lines(&tmp, &["tree", "list", "Soldier", "--depth", "0"]),
        ["Soldier (Class)"]
    );
}

#[test]
fn tree_delete_members() {
    let tmp = jedi_tree();
    saga(&tmp)
        .args(["tree", "delete", "Class", "Jedi", "--item", "Talent:Adept Negotiator"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 members."));

    saga(&tmp)
        .args(["tree", "delete", "Class", "Jedi"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 members."));

    assert_eq!(stdout_lines(&tmp, &["tree", "list", "Jedi"]), ["Jedi (Class)"]);
}

// ---------------------------------------------------------------------------
// books, completion
// ---------------------------------------------------------------------------

#[test]
fn book_list_filters() {
    let tmp = init_catalog();
    let lines = stdout_lines(&tmp, &["book", "list"]);
    assert_eq!(lines.len(), 16);
    assert!(lines[0].starts_with("Abbr."));
    assert!(lines[2].starts_with("Core"));

    let output = saga(&tmp)
        .args(["book", "list", "threats", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let books: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let books = books.as_array().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0]["abbreviation"], "Threats");
}

#[test]
fn json_errors_carry_severity() {
    let tmp = init_catalog();
    let output = saga(&tmp)
        .args(["entry", "info", "Skill", "Nothing", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let err: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["severity"], "note");
}

#[test]
fn completion_generates_script() {
    let tmp = TempDir::new().unwrap();
    saga(&tmp)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("saga"));
}
