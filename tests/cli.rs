// ==============================================================================
// CLI Integration Tests: Exercise the `protoshape` Binary via Subprocess
// ==============================================================================
//
// These tests run the compiled binary with `assert_cmd`, checking exit codes,
// stdout/stderr content and output files. Library-level behavior is covered
// in `integration.rs`; here the focus is argument handling, descriptor
// discovery and error reporting.

mod common;
use common::{SHOP_GRAPHQL, SHOP_TYPESCRIPT, fixture};

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)] // cargo_bin() warns about custom build-dir; acceptable here
fn protoshape_cmd() -> Command {
    Command::cargo_bin("protoshape").expect("protoshape binary should be built by cargo")
}

fn path(name: &str) -> String {
    fixture(name)
        .to_str()
        .expect("fixture paths are UTF-8")
        .to_string()
}

// ==============================================================================
// Output
// ==============================================================================

#[test]
fn graphql_to_stdout() {
    protoshape_cmd()
        .args(["graphql", &path("shop.json")])
        .assert()
        .success()
        .stdout(SHOP_GRAPHQL);
}

#[test]
fn typescript_to_stdout() {
    protoshape_cmd()
        .args(["typescript", &path("shop.json")])
        .assert()
        .success()
        .stdout(SHOP_TYPESCRIPT)
        .stderr("");
}

#[test]
fn output_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let out = dir.path().join("shop.ts");
    protoshape_cmd()
        .args(["typescript", &path("shop.json"), "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout("");
    let written = fs::read_to_string(&out).expect("read output file");
    assert_eq!(written, SHOP_TYPESCRIPT);
}

#[test]
fn type_and_input_options() {
    protoshape_cmd()
        .args([
            "graphql",
            "--type",
            "CreateOrder",
            "--input",
            "CreateOrder",
            "--int64-as-number",
            &path("shop.json"),
        ])
        .assert()
        .success()
        .stdout(
            "input CreateOrder {\n  quantity: Float!\n  note: String\n  status: Status!\n}\n\n\
             enum Status {\n  A\n  B\n}\n",
        );
}

#[test]
fn directory_of_descriptors() {
    protoshape_cmd()
        .args(["graphql", &path("multi")])
        .assert()
        .success()
        .stdout(
            "type billing_Invoice {\n  total: common_Money\n}\n\n\
             type common_Money {\n  currency: String!\n  units: String!\n}\n",
        );
}

#[test]
fn dangling_typescript_reference_warns_on_stderr() {
    protoshape_cmd()
        .args(["typescript", "--type", "graph.A", &path("graph.json")])
        .assert()
        .success()
        .stdout("export interface A {\n  b?: B;\n}\n")
        .stderr(predicate::str::contains(
            "type `graph.B` is referenced but not declared in the output",
        ));
}

// ==============================================================================
// Errors
// ==============================================================================

#[test]
fn unknown_type_option_suggests() {
    protoshape_cmd()
        .args(["graphql", "--type", "Statsu", &path("shop.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("can't find type `Statsu`"))
        .stderr(predicate::str::contains("did you mean `Status`?"));
}

#[test]
fn missing_descriptor_file() {
    protoshape_cmd()
        .args(["graphql", "nonexistent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nonexistent.json"));
}

#[test]
fn syntax_error_is_reported_with_the_file_name() {
    protoshape_cmd()
        .args(["graphql", &path("broken.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid descriptor JSON"))
        .stderr(predicate::str::contains("broken.json"));
}

#[test]
fn unknown_command() {
    protoshape_cmd()
        .args(["openapi", &path("shop.json")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown command `openapi`"));
}

#[test]
fn missing_descriptor_argument() {
    protoshape_cmd()
        .arg("typescript")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<DESCRIPTOR>"));
}

#[test]
fn help() {
    protoshape_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: protoshape <COMMAND>"));
}
