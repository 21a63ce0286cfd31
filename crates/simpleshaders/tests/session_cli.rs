use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn simpleshaders(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_simpleshaders"))
        .env("SIMPLESHADERS_CONFIG_DIR", config_dir)
        .env_remove("SIMPLESHADERS_CONFIG")
        .env("RUST_LOG", "off")
        .args(args)
        .output()
        .expect("failed to run simpleshaders")
}

fn json_report(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("report is valid JSON")
}

fn applied_indices(report: &Value) -> Vec<u64> {
    report["applied"]
        .as_array()
        .unwrap()
        .iter()
        .map(|shader| shader["index"].as_u64().unwrap())
        .collect()
}

#[test]
fn clicks_cycle_through_bundled_shaders() {
    let root = TempDir::new().unwrap();
    let output = simpleshaders(root.path(), &["--clicks", "7", "--json"]);
    let report = json_report(&output);

    assert_eq!(applied_indices(&report), vec![0, 1, 2, 3, 4, 5, 0, 1]);
    assert_eq!(report["next_index"], 2);
    assert_eq!(report["canvas"], "camerafeed");
    assert_eq!(report["button_visible"], true);
}

#[test]
fn rotation_rewrites_line_height_once_viewport_settles() {
    let root = TempDir::new().unwrap();
    let output = simpleshaders(
        root.path(),
        &["--script", "rotate:90", "--settle-frames", "3", "--json"],
    );
    let report = json_report(&output);

    assert_eq!(report["orientation"], 90);
    assert_eq!(report["layout_settled"], true);
    assert_eq!(report["line_height"], 31.0);
    assert_eq!(report["frames"], 3);
}

#[test]
fn config_file_replaces_bundled_shaders() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join("invert.frag"),
        "void main() { gl_FragColor = vec4(1.0); }\n",
    )
    .unwrap();
    fs::write(
        root.path().join("pipeline.toml"),
        r#"
version = 1
include_builtin = false

[[shaders]]
name = "invert"
path = "invert.frag"

[[shaders]]
name = "flat"
source = "void main() { gl_FragColor = vec4(0.0); }"
"#,
    )
    .unwrap();

    let output = simpleshaders(root.path(), &["list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Shaders (2):"), "{stdout}");
    assert!(stdout.contains("invert"));
    assert!(!stdout.contains("sepia"));

    let report = json_report(&simpleshaders(root.path(), &["--clicks", "2", "--json"]));
    assert_eq!(applied_indices(&report), vec![0, 1, 0]);
}

#[test]
fn show_prints_shader_source() {
    let root = TempDir::new().unwrap();
    let output = simpleshaders(root.path(), &["show", "sepia"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("// sepia"));
    assert!(stdout.contains("vec3(.393, .769, .189)"));

    let missing = simpleshaders(root.path(), &["show", "42"]);
    assert!(!missing.status.success());
}

#[test]
fn invalid_config_fails() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join("pipeline.toml"), "version = 7\n").unwrap();
    let output = simpleshaders(root.path(), &["--json"]);
    assert!(!output.status.success());
}
