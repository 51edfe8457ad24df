#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn restscaffold_gen() -> Command {
    Command::new(env!("CARGO_BIN_EXE_restscaffold-gen"))
}

#[test]
fn test_cli_generate_creates_files() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("generated");
    let result = restscaffold_gen()
        .arg("generate")
        .arg("--catalog")
        .arg(fixture("orders.yaml"))
        .arg("--docs")
        .arg(fixture("orders_docs.yaml"))
        .arg("--output")
        .arg(&output)
        .output()
        .expect("run cli");
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("written"));
    assert!(stdout.contains("sha256:"));

    let source = fs::read_to_string(output.join("order_service_impl_api.rs")).unwrap();
    assert!(source.starts_with("// @generated by restscaffold-gen from orders.yaml"));
    assert!(output.join("mod.rs").exists());
}

#[test]
fn test_cli_skips_modified_files_without_force() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("generated");
    let run = |force: bool| {
        let mut cmd = restscaffold_gen();
        cmd.arg("generate")
            .arg("--catalog")
            .arg(fixture("orders.yaml"))
            .arg("--output")
            .arg(&output);
        if force {
            cmd.arg("--force");
        }
        cmd.output().expect("run cli")
    };

    assert!(run(false).status.success());
    let file = output.join("order_service_impl_api.rs");
    fs::write(&file, "// edited by hand\n").unwrap();

    let skipped = run(false);
    assert!(skipped.status.success());
    assert!(String::from_utf8_lossy(&skipped.stdout).contains("skipped"));
    assert_eq!(fs::read_to_string(&file).unwrap(), "// edited by hand\n");

    assert!(run(true).status.success());
    assert!(fs::read_to_string(&file)
        .unwrap()
        .contains("pub struct OrderServiceImplApi"));
}

#[test]
fn test_cli_dry_run() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("generated");
    let result = restscaffold_gen()
        .arg("generate")
        .arg("--catalog")
        .arg(fixture("orders.yaml"))
        .arg("--output")
        .arg(&output)
        .arg("--dry-run")
        .output()
        .expect("run cli");
    assert!(result.status.success());
    assert!(String::from_utf8_lossy(&result.stdout).contains("would write"));
    assert!(!output.exists());
}

#[test]
fn test_cli_inspect() {
    let result = restscaffold_gen()
        .arg("inspect")
        .arg("--catalog")
        .arg(fixture("orders.yaml"))
        .output()
        .expect("run cli");
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("/orders/{id}/items/{item_id}"));
    assert!(stdout.contains("order -> items -> item"));
    assert!(stdout.contains("ItemResource (impl: -, path: -, tags: [Orders, Sales])"));
}

#[test]
fn test_cli_cycle_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("generated");
    let result = restscaffold_gen()
        .arg("generate")
        .arg("--catalog")
        .arg(fixture("cyclic.yaml"))
        .arg("--output")
        .arg(&output)
        .output()
        .expect("run cli");
    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Folder#child"));
    assert!(!output.exists());
}

#[test]
fn test_cli_missing_catalog_exits_non_zero() {
    let result = restscaffold_gen()
        .arg("generate")
        .arg("--catalog")
        .arg(fixture("missing.yaml"))
        .output()
        .expect("run cli");
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Failed to read catalog"));
}
