use predicates::str::contains;
use std::fs;

mod common;
use common::{add_member, init_sauna_day, ok, rb, setup_test_db, temp_out};

fn booked_db(name: &str) -> String {
    let db_path = setup_test_db(name);
    init_sauna_day(&db_path);
    add_member(&db_path, "m-1");
    add_member(&db_path, "m-2");
    ok(&db_path, &["book", "--slot", "1", "--member", "m-1"]);
    ok(&db_path, &["book", "--slot", "2", "--member", "m-2", "--force"]);
    db_path
}

#[test]
fn test_export_csv() {
    let db_path = booked_db("export_csv");
    let out = temp_out("export_bookings", "csv");

    rb().args([
        "--db", &db_path, "export", "--format", "csv", "--file", &out, "--range", "2025-09",
    ])
    .assert()
    .success()
    .stdout(contains("Exported 2 booking(s)"));

    let content = fs::read_to_string(&out).expect("read csv");
    let mut lines = content.lines();
    let header = lines.next().expect("header");
    assert!(header.contains("booking_id"));
    assert!(header.contains("member_id"));
    assert!(content.contains("m-1"));
    assert!(content.contains("06:00"));
    assert_eq!(lines.count(), 2);
}

#[test]
fn test_export_json_and_overwrite_guard() {
    let db_path = booked_db("export_json");
    let out = temp_out("export_bookings", "json");

    ok(
        &db_path,
        &[
            "export", "--format", "json", "--file", &out, "--range", "2025-09-01",
        ],
    );

    let content = fs::read_to_string(&out).expect("read json");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    let rows = parsed.as_array().expect("array");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["member_id"], "m-2");
    assert_eq!(rows[1]["forced"], true);
    assert_eq!(rows[0]["status"], "booked");

    rb().args([
        "--db", &db_path, "export", "--format", "json", "--file", &out, "--range", "2025-09-01",
    ])
    .assert()
    .failure()
    .stderr(contains("already exists"));

    ok(
        &db_path,
        &[
            "export", "--format", "json", "--file", &out, "--range", "2025-10", "--force",
        ],
    );
    let content = fs::read_to_string(&out).expect("read json");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert!(parsed.as_array().expect("array").is_empty());
}

#[test]
fn test_backup_compressed() {
    let db_path = booked_db("backup_compressed");
    let out = temp_out("backup_rbenefits", "zip");

    rb().args(["--db", &db_path, "backup", "--file", &out, "--compress"])
        .assert()
        .success()
        .stdout(contains("Backup written"));

    assert!(fs::metadata(&out).expect("zip exists").len() > 0);
}
