#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rb() -> Command {
    cargo_bin_cmd!("rbenefits")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rbenefits.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Run a command against `db_path` and assert it succeeds.
pub fn ok(db_path: &str, args: &[&str]) {
    rb().arg("--db").arg(db_path).args(args).assert().success();
}

/// Initialize a DB with a `sauna` benefit (capacity 5, 06:00-10:00 hourly,
/// branch `main`) and the four slots of 2025-09-01 (ids 1..=4).
pub fn init_sauna_day(db_path: &str) {
    rb().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    ok(db_path, &["benefit", "add", "--code", "sauna", "--name", "Sauna"]);
    ok(
        db_path,
        &[
            "settings",
            "set",
            "--branch",
            "main",
            "--benefit",
            "sauna",
            "--capacity",
            "5",
            "--slot-minutes",
            "60",
            "--open",
            "06:00",
            "--close",
            "10:00",
            "--days",
            "all",
        ],
    );
    ok(
        db_path,
        &[
            "slots",
            "generate",
            "--branch",
            "main",
            "--benefit",
            "sauna",
            "--date",
            "2025-09-01",
        ],
    );
}

/// Register an open-ended active membership starting 2025-01-01.
pub fn add_member(db_path: &str, member: &str) {
    ok(
        db_path,
        &[
            "membership",
            "add",
            "--member",
            member,
            "--plan",
            "premium",
            "--start",
            "2025-01-01",
        ],
    );
}
