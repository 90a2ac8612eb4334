use predicates::prelude::*;
mod test_env;
use test_env::*;

#[test]
fn test_board_lifecycle() {
    let temp_dir = setup_with_admin();

    let board = json_output(&temp_dir, &["boards", "add", "  Sales  "]);
    assert_eq!(board["name"], "Sales");
    assert_eq!(board["is_active"], true);
    let id = board["id"].as_i64().unwrap().to_string();

    let renamed = json_output(&temp_dir, &["boards", "rename", &id, "Enterprise Sales"]);
    assert_eq!(renamed["name"], "Enterprise Sales");

    crm_cmd(&temp_dir)
        .args(["boards", "deactivate", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Board deactivated successfully"));

    crm_cmd(&temp_dir)
        .args(["boards", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No boards found."));

    crm_cmd(&temp_dir)
        .args(["boards", "list", "--inactive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Enterprise Sales"));

    let reactivated = json_output(&temp_dir, &["boards", "status", &id, "active"]);
    assert_eq!(reactivated["is_active"], true);
}

#[test]
fn test_board_name_too_short() {
    let temp_dir = setup_with_admin();

    crm_cmd(&temp_dir)
        .args(["boards", "add", "x"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("at least 2 characters"));
}

#[test]
fn test_show_missing_board() {
    let temp_dir = setup_with_admin();

    crm_cmd(&temp_dir)
        .args(["boards", "show", "7"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Board 7 not found"));
}

#[test]
fn test_invalid_id_rejected_by_parser() {
    let temp_dir = setup_with_admin();

    crm_cmd(&temp_dir)
        .args(["boards", "show", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ID must be a number"));
}
