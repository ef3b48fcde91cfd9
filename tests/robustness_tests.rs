use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command;

#[test]
fn test_malformed_script_handling() {
    let mut cmd = Command::new(cargo_bin!("jama"));
    cmd.arg("tests/fixtures/malformed.csv")
        .arg("--latency-ms")
        .arg("0");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading intent"))
        .stderr(predicate::str::contains("'three' is not a record id"))
        // Rows after the bad ones are still processed.
        .stdout(predicate::str::contains("== Dashboard: Abena Owusu =="))
        .stdout(predicate::str::contains("unpaid months: 2"));
}

#[test]
fn test_invalid_payout_details() {
    let mut script = tempfile::NamedTempFile::new().unwrap();
    writeln!(script, "intent, first, second, third").unwrap();
    writeln!(script, "login, NS12345, password123").unwrap();
    writeln!(script, "payout-momo, MTN, 02412").unwrap();
    writeln!(script, "payout-bank, GCB, , Legon").unwrap();
    writeln!(script, "payout-momo, MTN, 0241234567").unwrap();

    let mut cmd = Command::new(cargo_bin!("jama"));
    cmd.arg(script.path()).arg("--latency-ms").arg("0");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "error: Mobile money number must be 10 digits",
        ))
        .stdout(predicate::str::contains("error: Missing information"))
        .stdout(predicate::str::contains("notice: Payment method saved"));
}

#[test]
fn test_request_for_settled_month() {
    let mut script = tempfile::NamedTempFile::new().unwrap();
    writeln!(script, "intent, first, second, third").unwrap();
    writeln!(script, "login, NS12345, password123").unwrap();
    writeln!(script, "select, 1").unwrap();
    writeln!(script, "select, 42").unwrap();
    writeln!(script, "confirm").unwrap();

    let mut cmd = Command::new(cargo_bin!("jama"));
    cmd.arg(script.path()).arg("--latency-ms").arg("0");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "notice: Payment record 1 is paid and cannot be requested",
        ))
        .stdout(predicate::str::contains("notice: Payment record 42 not found"))
        .stdout(predicate::str::contains("Payment Request Submitted").not());
}
