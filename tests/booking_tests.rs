use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

mod common;
use common::{add_member, init_sauna_day, ok, rb, setup_test_db};

#[test]
fn test_capacity_is_enforced_and_force_add_overrides() {
    let db_path = setup_test_db("capacity_force_add");
    init_sauna_day(&db_path);

    for i in 1..=6 {
        add_member(&db_path, &format!("m-{}", i));
    }

    for i in 1..=5 {
        let member = format!("m-{}", i);
        rb().args(["--db", &db_path, "book", "--slot", "1", "--member", &member])
            .assert()
            .success()
            .stdout(contains(format!("[{}/5]", i)));
    }

    rb().args(["--db", &db_path, "book", "--slot", "1", "--member", "m-6"])
        .assert()
        .failure()
        .stderr(contains("Slot #1 is full (5/5)"));

    rb().args([
        "--db",
        &db_path,
        "book",
        "--slot",
        "1",
        "--member",
        "m-6",
        "--force",
        "--notes",
        "VIP guest",
    ])
    .assert()
    .success()
    .stdout(contains("(forced)"))
    .stdout(contains("[6/5]"))
    .stdout(contains("over capacity by 1"));

    rb().args(["--db", &db_path, "slots", "list", "--date", "2025-09-01"])
        .assert()
        .success()
        .stdout(contains("6/5"));

    rb().args(["--db", &db_path, "log", "--print", "--op", "force_add"])
        .assert()
        .success()
        .stdout(contains("m-6 force-added to slot #1"))
        .stdout(contains("VIP guest"));
}

#[test]
fn test_duplicate_booking_is_rejected() {
    let db_path = setup_test_db("duplicate_booking");
    init_sauna_day(&db_path);
    add_member(&db_path, "m-1");

    ok(&db_path, &["book", "--slot", "1", "--member", "m-1"]);

    rb().args(["--db", &db_path, "book", "--slot", "1", "--member", "m-1"])
        .assert()
        .failure()
        .stderr(contains("already holds booking #1"));
}

#[test]
fn test_member_without_membership_is_not_eligible() {
    let db_path = setup_test_db("not_eligible");
    init_sauna_day(&db_path);

    rb().args(["--db", &db_path, "book", "--slot", "1", "--member", "walk-in"])
        .assert()
        .failure()
        .stderr(contains("Not eligible"));

    // concierge can still add the guest
    rb().args([
        "--db", &db_path, "book", "--slot", "1", "--member", "walk-in", "--force",
    ])
    .assert()
    .success()
    .stdout(contains("over capacity").not());
}

#[test]
fn test_cancel_frees_the_seat() {
    let db_path = setup_test_db("cancel_frees_seat");
    init_sauna_day(&db_path);
    add_member(&db_path, "m-1");

    ok(&db_path, &["book", "--slot", "3", "--member", "m-1"]);

    rb().args(["--db", &db_path, "cancel", "--booking", "1"])
        .assert()
        .success()
        .stdout(contains("cancelled"));

    rb().args(["--db", &db_path, "bookings", "--slot", "3"])
        .assert()
        .success()
        .stdout(contains("cancelled"));

    rb().args(["--db", &db_path, "slots", "list", "--date", "2025-09-01"])
        .assert()
        .success()
        .stdout(contains("1/5").not());

    // cancelled is terminal
    rb().args(["--db", &db_path, "cancel", "--booking", "1"])
        .assert()
        .failure()
        .stderr(contains("cannot move from 'cancelled'"));

    // and the member may book again
    ok(&db_path, &["book", "--slot", "3", "--member", "m-1"]);
}

#[test]
fn test_attendance_is_recorded_once() {
    let db_path = setup_test_db("attendance_once");
    init_sauna_day(&db_path);
    add_member(&db_path, "m-1");
    add_member(&db_path, "m-2");

    ok(&db_path, &["book", "--slot", "1", "--member", "m-1"]);
    ok(&db_path, &["book", "--slot", "1", "--member", "m-2"]);

    rb().args(["--db", &db_path, "attend", "--booking", "1"])
        .assert()
        .success()
        .stdout(contains("marked attended"));

    rb().args(["--db", &db_path, "attend", "--booking", "2", "--no-show"])
        .assert()
        .success()
        .stdout(contains("marked no_show"));

    rb().args(["--db", &db_path, "attend", "--booking", "1"])
        .assert()
        .failure()
        .stderr(contains("cannot move from 'attended'"));

    rb().args(["--db", &db_path, "bookings", "--date", "2025-09-01"])
        .assert()
        .success()
        .stdout(contains("m-1"))
        .stdout(contains("m-2"));
}

#[test]
fn test_usage_respects_allotment() {
    let db_path = setup_test_db("usage_allotment");
    init_sauna_day(&db_path);
    add_member(&db_path, "m-1");

    ok(
        &db_path,
        &[
            "membership",
            "allot",
            "--membership",
            "1",
            "--benefit",
            "sauna",
            "--allowance",
            "1",
            "--period",
            "week",
        ],
    );

    ok(&db_path, &["book", "--slot", "1", "--member", "m-1"]);

    rb().args(["--db", &db_path, "attend", "--booking", "1", "--usage"])
        .assert()
        .success()
        .stdout(contains("Usage recorded: 1/1 sauna this week"));

    // same ISO week as 2025-09-01
    rb().args([
        "--db",
        &db_path,
        "usage",
        "--membership",
        "1",
        "--benefit",
        "sauna",
        "--date",
        "2025-09-03",
    ])
    .assert()
    .failure()
    .stderr(contains("Allotment exhausted"));

    rb().args([
        "--db",
        &db_path,
        "usage",
        "--membership",
        "1",
        "--benefit",
        "sauna",
        "--date",
        "2025-09-08",
    ])
    .assert()
    .success()
    .stdout(contains("1/1 this week"));

    rb().args(["--db", &db_path, "membership", "list", "--member", "m-1"])
        .assert()
        .success()
        .stdout(contains("sauna 1/week"));
}
