//! Unit tests for CLI commands

#![allow(clippy::unwrap_used)]

use crate::cli::{run_with_output, Cli, Commands};
use clap::Parser;
use std::fs;

const CATALOG: &str = r#"
types:
  - name: Shop
    path: /shop
    operations:
      - { name: status, method: GET, path: /status, returns: String }
      - name: order
        path: /orders/{id}
        params: [{ name: id, type: String, source: path }]
        returns: OrderResource
  - name: OrderResource
    operations:
      - { name: get, method: GET, returns: String }
services:
  - { interface: Shop, name: Shop }
"#;

#[test]
fn test_generate_command_parses() {
    let cli = Cli::try_parse_from([
        "restscaffold-gen",
        "generate",
        "--catalog",
        "services.yaml",
        "--docs",
        "docs.yaml",
        "--output",
        "out",
        "--force",
        "--dry-run",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate {
            catalog,
            docs,
            config,
            output,
            force,
            dry_run,
        } => {
            assert_eq!(catalog.to_string_lossy(), "services.yaml");
            assert_eq!(docs.unwrap().to_string_lossy(), "docs.yaml");
            assert!(config.is_none());
            assert_eq!(output.unwrap().to_string_lossy(), "out");
            assert!(force);
            assert!(dry_run);
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_generate_defaults() {
    let cli = Cli::try_parse_from(["restscaffold-gen", "generate", "-c", "services.yaml"]).unwrap();
    match cli.command {
        Commands::Generate {
            force,
            dry_run,
            output,
            ..
        } => {
            assert!(!force);
            assert!(!dry_run);
            assert!(output.is_none());
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_catalog_is_required() {
    assert!(Cli::try_parse_from(["restscaffold-gen", "generate"]).is_err());
    assert!(Cli::try_parse_from(["restscaffold-gen", "inspect"]).is_err());
}

#[test]
fn test_inspect_command_parses() {
    let cli = Cli::try_parse_from([
        "restscaffold-gen",
        "inspect",
        "--catalog",
        "services.yaml",
        "--config",
        "restscaffold.toml",
    ])
    .unwrap();
    match cli.command {
        Commands::Inspect { catalog, config, .. } => {
            assert_eq!(catalog.to_string_lossy(), "services.yaml");
            assert_eq!(config.unwrap().to_string_lossy(), "restscaffold.toml");
        }
        _ => panic!("Expected Inspect command"),
    }
}

#[test]
fn test_inspect_prints_routes_and_resources() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("services.yaml");
    fs::write(&catalog, CATALOG).unwrap();

    let cli = Cli::try_parse_from([
        "restscaffold-gen",
        "inspect",
        "--catalog",
        catalog.to_str().unwrap(),
    ])
    .unwrap();
    let mut out = Vec::new();
    run_with_output(&cli, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("/shop/orders/{id}"));
    assert!(text.contains("order -> get"));
    assert!(text.contains("OrderResource (impl: -, path: -, tags: [Shop])"));
}

#[test]
fn test_generate_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = dir.path().join("services.yaml");
    fs::write(&catalog, CATALOG).unwrap();
    let output = dir.path().join("out");

    let cli = Cli::try_parse_from([
        "restscaffold-gen",
        "generate",
        "--catalog",
        catalog.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--dry-run",
    ])
    .unwrap();
    let mut out = Vec::new();
    run_with_output(&cli, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("would write"));
    assert!(text.contains("shop_api.rs"));
    assert!(!output.exists());
}
