use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{init_sauna_day, ok, rb, setup_test_db};

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("init_creates_schema");

    rb().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("initialization completed"));

    rb().args(["--db", &db_path, "db", "--check"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"));

    rb().args(["--db", &db_path, "log", "--print", "--op", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));
}

#[test]
fn test_generate_four_hourly_slots() {
    let db_path = setup_test_db("generate_four_hourly_slots");
    init_sauna_day(&db_path);

    rb().args(["--db", &db_path, "slots", "list", "--date", "2025-09-01"])
        .assert()
        .success()
        .stdout(contains("06:00-07:00"))
        .stdout(contains("07:00-08:00"))
        .stdout(contains("08:00-09:00"))
        .stdout(contains("09:00-10:00"))
        .stdout(contains("10:00-11:00").not())
        .stdout(contains("0/5"));
}

#[test]
fn test_regenerate_same_date_is_skipped() {
    let db_path = setup_test_db("regenerate_same_date");
    init_sauna_day(&db_path);

    rb().args([
        "--db",
        &db_path,
        "slots",
        "generate",
        "--branch",
        "main",
        "--benefit",
        "sauna",
        "--date",
        "2025-09-01",
    ])
    .assert()
    .success()
    .stdout(contains("already has 4 sauna slot(s)"));

    rb().args(["--db", &db_path, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("(4 active)"));
}

#[test]
fn test_generate_range_with_weekday_filter() {
    let db_path = setup_test_db("generate_range_weekdays");
    init_sauna_day(&db_path);

    // 2025-09-08 is a Monday; mon-fri gives five dates of four slots each
    rb().args([
        "--db",
        &db_path,
        "slots",
        "generate",
        "--branch",
        "main",
        "--benefit",
        "sauna",
        "--from",
        "2025-09-08",
        "--to",
        "2025-09-14",
        "--days",
        "mon-fri",
    ])
    .assert()
    .success()
    .stdout(contains("5/5 date(s)"))
    .stdout(contains("20 slot(s) created"));

    rb().args(["--db", &db_path, "slots", "list", "--date", "2025-09-13"])
        .assert()
        .success()
        .stdout(contains("No slots"));
}

#[test]
fn test_generate_without_settings_fails() {
    let db_path = setup_test_db("generate_without_settings");

    rb().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();
    ok(&db_path, &["benefit", "add", "--code", "pool", "--name", "Pool"]);

    rb().args([
        "--db",
        &db_path,
        "slots",
        "generate",
        "--branch",
        "north",
        "--benefit",
        "pool",
        "--date",
        "2025-09-01",
    ])
    .assert()
    .failure()
    .stderr(contains("No benefit settings"));
}

#[test]
fn test_invalid_window_is_rejected() {
    let db_path = setup_test_db("invalid_window");
    init_sauna_day(&db_path);

    rb().args([
        "--db",
        &db_path,
        "settings",
        "set",
        "--branch",
        "main",
        "--benefit",
        "sauna",
        "--open",
        "12:00",
        "--close",
        "11:00",
    ])
    .assert()
    .failure()
    .stderr(contains("Invalid benefit settings"));
}

#[test]
fn test_deactivated_slot_cannot_be_booked() {
    let db_path = setup_test_db("deactivated_slot");
    init_sauna_day(&db_path);
    common::add_member(&db_path, "m-1");

    ok(&db_path, &["slots", "deactivate", "--id", "2"]);

    rb().args(["--db", &db_path, "book", "--slot", "2", "--member", "m-1"])
        .assert()
        .failure()
        .stderr(contains("is not active"));

    ok(&db_path, &["slots", "deactivate", "--id", "2", "--undo"]);
    ok(&db_path, &["book", "--slot", "2", "--member", "m-1"]);
}
