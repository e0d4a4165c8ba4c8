#![forbid(unsafe_code)]
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn write_inputs(dir: &std::path::Path) -> (String, String) {
    let courses = dir.join("enrollments.csv");
    let rooms = dir.join("rooms.csv");
    fs::write(
        &courses,
        "student_id,course_code\n1,CSE101\n2,CSE101\n1,MAT101\n3,PHY101\n",
    )
    .unwrap();
    fs::write(&rooms, "classroom_id,capacity\nA101,30\nB201,10\n").unwrap();
    (
        courses.to_string_lossy().into_owned(),
        rooms.to_string_lossy().into_owned(),
    )
}

#[test]
fn generate_then_audit_and_metrics() {
    let dir = tempdir().unwrap();
    let (courses, rooms) = write_inputs(dir.path());
    let out_json = dir.path().join("schedule.json");
    let out_csv = dir.path().join("schedule.csv");

    Command::cargo_bin("examplan-cli")
        .unwrap()
        .args([
            "generate",
            "--courses",
            &courses,
            "--rooms",
            &rooms,
            "--start",
            "2025-06-02",
            "--end",
            "2025-06-03",
            "--seed",
            "4",
            "--out-json",
            out_json.to_str().unwrap(),
            "--out-csv",
            out_csv.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("CSE101"))
        .stdout(predicate::str::contains("OK: no conflicts"));

    assert!(fs::read_to_string(&out_csv).unwrap().contains("MAT101"));

    Command::cargo_bin("examplan-cli")
        .unwrap()
        .args([
            "audit",
            "--schedule",
            out_json.to_str().unwrap(),
            "--courses",
            &courses,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK: no conflicts"));

    Command::cargo_bin("examplan-cli")
        .unwrap()
        .args([
            "metrics",
            "--schedule",
            out_json.to_str().unwrap(),
            "--courses",
            &courses,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("exams: 3"));
}

#[test]
fn generate_fails_on_impossible_period() {
    let dir = tempdir().unwrap();
    let (courses, rooms) = write_inputs(dir.path());

    Command::cargo_bin("examplan-cli")
        .unwrap()
        .args([
            "generate",
            "--courses",
            &courses,
            "--rooms",
            &rooms,
            "--start",
            "2025-06-02",
            "--end",
            "2025-06-02",
            "--min-slot",
            "1",
            "--max-slot",
            "1",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("capacity infeasible"));
}
