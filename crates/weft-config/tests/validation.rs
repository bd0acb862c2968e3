//! Tests for filesystem validation.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use weft_config::{ConfigError, ConfigValidator, FsValidator, presets};

fn scaffold(root: &Path) {
    fs::create_dir_all(root.join("src")).expect("src");
    fs::create_dir_all(root.join("public/assets/dockerAssets")).expect("assets");
    fs::write(root.join("src/main.js"), "import './styles.scss';").expect("main");
    fs::write(root.join("src/index.js"), "import React from 'react';").expect("index");
    fs::write(root.join("public/index.html"), "<html><head></head><body></body></html>")
        .expect("template");
    fs::write(root.join("public/favicon.ico"), [0u8; 4]).expect("favicon");
}

#[test]
fn preset_validates_against_complete_project() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());

    let config = presets::vanilla_react().expect("preset");
    FsValidator::new(dir.path())
        .validate(&config.build)
        .expect("valid project");
}

#[test]
fn validate_catches_missing_entry() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());
    fs::remove_file(dir.path().join("src/index.js")).expect("remove");

    let config = presets::vanilla_react().expect("preset");
    match FsValidator::new(dir.path()).validate(&config.build) {
        Err(ConfigError::EntryNotFound { name, path }) => {
            assert_eq!(name, "react");
            assert!(path.ends_with("src/index.js"));
        }
        other => panic!("expected EntryNotFound, got {other:?}"),
    }
}

#[test]
fn validate_catches_missing_template() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());
    fs::remove_file(dir.path().join("public/index.html")).expect("remove");

    let config = presets::vanilla_react().expect("preset");
    let result = FsValidator::new(dir.path()).validate(&config.build);
    assert!(matches!(result, Err(ConfigError::TemplateNotFound { .. })));
}

#[test]
fn validate_catches_missing_copy_source() {
    let dir = TempDir::new().expect("tempdir");
    scaffold(dir.path());
    fs::remove_dir_all(dir.path().join("public/assets")).expect("remove");

    let config = presets::vanilla_react().expect("preset");
    let result = FsValidator::new(dir.path()).validate(&config.build);
    assert!(matches!(result, Err(ConfigError::CopySourceNotFound { .. })));
}
