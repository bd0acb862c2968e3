//! End-to-end tests for the `weft` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use weft_config::presets::VANILLA_REACT_TOML;

const GRAPH: &str = r#"{
  "modules": [
    { "path": "src/main.js", "size": 1200 },
    { "path": "src/index.js", "size": 900 },
    { "path": "src/logo.svg", "size": 3000 },
    { "path": "src/pages/a.js", "size": 500 },
    { "path": "src/pages/b.js", "size": 500 },
    { "path": "src/pages/c.js", "size": 500 },
    { "path": "node_modules/lodash/lodash.js", "size": 70000 }
  ],
  "chunks": [
    { "name": "vanilla", "modules": ["src/main.js"] },
    { "name": "react", "modules": ["src/index.js", "src/logo.svg"] },
    { "name": "page-a", "kind": "async", "modules": ["src/pages/a.js", "node_modules/lodash/lodash.js"] },
    { "name": "page-b", "kind": "async", "modules": ["src/pages/b.js", "node_modules/lodash/lodash.js"] },
    { "name": "page-c", "kind": "async", "modules": ["src/pages/c.js", "node_modules/lodash/lodash.js"] }
  ]
}"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, content).expect("write");
}

/// The preset project with every file the filesystem checks look for.
fn project() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path();
    write(root, "weft.toml", VANILLA_REACT_TOML);
    write(root, "src/main.js", "document.body.append('hi')");
    write(root, "src/index.js", "import App from './App'");
    write(
        root,
        "public/index.html",
        "<html><head><!-- app --></head><body><div id=\"root\"></div></body></html>",
    );
    write(root, "public/favicon.ico", "ico");
    write(root, "public/assets/dockerAssets/nginx.conf", "server {}");
    write(root, "graph.json", GRAPH);
    dir
}

fn weft(root: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_weft"));
    cmd.arg("--root")
        .arg(root)
        .env("NO_COLOR", "1")
        .env_remove("WEFT_MODE")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn check_passes_and_reports_lints() {
    let dir = project();
    weft(dir.path())
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains("svg (rule 4) is shadowed by rule 1"))
        .stderr(predicate::str::contains(
            "Configuration is valid: 2 entries, 7 rules, 3 lint(s)",
        ));
}

#[test]
fn strict_check_fails_on_lints() {
    let dir = project();
    weft(dir.path())
        .args(["check", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("3 rule lint(s) reported"));
}

#[test]
fn check_reports_missing_favicon() {
    let dir = project();
    fs::remove_file(dir.path().join("public/favicon.ico")).expect("remove");

    weft(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("favicon not found"));
}

#[test]
fn check_without_fs_ignores_missing_files() {
    let dir = TempDir::new().expect("tempdir");
    write(dir.path(), "weft.toml", VANILLA_REACT_TOML);

    weft(dir.path()).args(["check", "--no-fs"]).assert().success();
}

#[test]
fn missing_config_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    weft(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No configuration found"));
}

#[test]
fn explicit_config_path_must_exist() {
    let dir = project();
    weft(dir.path())
        .args(["--config", "other.toml", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn route_shows_matching_rule() {
    let dir = project();
    weft(dir.path())
        .args(["route", "src/logo.svg", "node_modules/react/index.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rule 1 (images): emit-file"))
        .stdout(predicate::str::contains("pass-through"));
}

#[test]
fn route_json_lists_transforms() {
    let dir = project();
    let output = weft(dir.path())
        .args(["route", "--json", "src/App.jsx", "src/theme.scss"])
        .output()
        .expect("run");
    assert!(output.status.success());

    let routes: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(routes[0]["rule"], 0);
    assert_eq!(routes[0]["transforms"][1], "jsx");
    assert_eq!(routes[1]["rule"], 3);
    assert_eq!(routes[1]["transforms"][0], "css-extract");
}

#[test]
fn plan_json_in_production() {
    let dir = project();
    let output = weft(dir.path())
        .args(["plan", "--graph", "graph.json", "--json"])
        .env("WEFT_MODE", "production")
        .output()
        .expect("run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(plan["mode"], "production");
    assert_eq!(plan["files"][0]["write_path"], "build/vanilla.bundle.js");
    assert_eq!(plan["files"][0]["public_url"], "./vanilla.bundle.js");
    assert_eq!(plan["html"]["scripts"], serde_json::json!(["./vanilla.bundle.js"]));
    assert_eq!(plan["split"]["groups"][0]["name"], "vendors");

    let statics: Vec<_> = plan["files"]
        .as_array()
        .expect("files")
        .iter()
        .filter(|file| file["kind"] == "static")
        .collect();
    assert_eq!(statics.len(), 1);
    assert_eq!(statics[0]["write_path"], "build/nginx.conf");
}

#[test]
fn plan_summary_uses_mode_public_path() {
    let dir = project();
    weft(dir.path())
        .args(["plan", "--graph", "graph.json", "--mode", "development"])
        .assert()
        .success()
        .stdout(predicate::str::contains("build/react.bundle.js"))
        .stdout(predicate::str::contains("/vanilla.bundle.js"))
        .stdout(predicate::str::contains("split vendors <- page-a, page-b, page-c"));
}

#[test]
fn plan_renders_html_page() {
    let dir = project();
    weft(dir.path())
        .args(["plan", "--graph", "graph.json", "--html", "--mode", "production"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<script defer=\"defer\" src=\"./vanilla.bundle.js\"></script></body>",
        ))
        .stdout(predicate::str::contains("<!-- app -->").not());
}

#[test]
fn plan_with_missing_graph_fails() {
    let dir = project();
    weft(dir.path())
        .args(["plan", "--graph", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn budget_error_fails_the_plan() {
    let dir = project();
    let config = VANILLA_REACT_TOML.replace("hints = \"off\"", "hints = \"error\"");
    write(dir.path(), "weft.toml", &config);
    write(
        dir.path(),
        "graph.json",
        &GRAPH.replace("\"size\": 70000", "\"size\": 700000"),
    );

    weft(dir.path())
        .args(["plan", "--graph", "graph.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Performance budget exceeded"));
}
