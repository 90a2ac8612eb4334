use predicates::prelude::*;
mod test_env;
use test_env::*;

#[test]
fn test_commands_require_known_user() {
    let temp_dir = setup_test_env();

    crm_cmd(&temp_dir)
        .args(["boards", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown user 'admin@crm.com'"));
}

#[test]
fn test_init_only_once() {
    let temp_dir = setup_with_admin();

    crm_cmd(&temp_dir)
        .args(["init", "--name", "Second", "--email", "second@crm.com", "--mobile", "(11) 99999-9999"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Users already exist"));
}

#[test]
fn test_non_admin_is_forbidden() {
    let temp_dir = setup_with_admin();
    crm_cmd(&temp_dir)
        .args(["users", "add", "--name", "Seller", "--email", "seller@crm.com", "--mobile", "(11) 98888-7777"])
        .assert()
        .success();

    crm_cmd(&temp_dir)
        .args(["--as", "seller@crm.com", "boards", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Only administrators"));
}

#[test]
fn test_env_user_overrides_rc() {
    let temp_dir = setup_with_admin();

    crm_cmd(&temp_dir)
        .env("CRM_USER", "ghost@crm.com")
        .args(["boards", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown user 'ghost@crm.com'"));
}

#[test]
fn test_init_needs_no_acting_user() {
    let temp_dir = setup_test_env();
    std::fs::write(
        temp_dir.path().join("rc"),
        format!("data.location={}\n", db_path(&temp_dir).display()),
    )
    .unwrap();

    crm_cmd(&temp_dir)
        .args(["init", "--name", "Administrator", "--email", ADMIN_EMAIL, "--mobile", "(11) 99999-9999"])
        .assert()
        .success();

    crm_cmd(&temp_dir)
        .args(["stages", "list", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No acting user"));

    crm_cmd(&temp_dir)
        .args(["--as", ADMIN_EMAIL, "boards", "list"])
        .assert()
        .success();
}
