//! Tests for the physexport binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const SCENE: &str = r#"{
    "nodes": [
        { "name": "Floor", "rigid_body": { "kind": "PASSIVE", "mass": 4.0 } },
        {
            "name": "Rig",
            "armature_pose": { "bones": [ { "name": "hand", "constraints": [ { "target": "Sword" } ] } ] }
        }
    ]
}"#;

fn physexport(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_physexport"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_scene(dir: &Path) -> String {
    let path = dir.join("scene.json");
    fs::write(&path, SCENE).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_export_command() {
    let dir = tempfile::tempdir().unwrap();
    let scene = write_scene(dir.path());
    let output = dir.path().join("physics.json");
    let output_arg = output.to_string_lossy().into_owned();

    let result = physexport(&[
        "export", "--scene", &scene, "--output", &output_arg, "--layout", "legacy", "--compact",
    ]);
    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));
    assert!(String::from_utf8_lossy(&result.stderr).contains("Sword"));

    let text = fs::read_to_string(&output).unwrap();
    assert!(!text.contains('\n'));
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["rigid_bodys"][0]["mass"], 0.0);
    assert!(json["rigid_bodys"][0].get("parent").is_none());
    assert!(json["bone_constraints"].as_array().unwrap().is_empty());
}

#[test]
fn test_strict_fails_on_issues() {
    let dir = tempfile::tempdir().unwrap();
    let scene = write_scene(dir.path());
    let output = dir.path().join("physics.json");
    let output_arg = output.to_string_lossy().into_owned();

    let result = physexport(&["export", "--scene", &scene, "--output", &output_arg, "--strict"]);
    assert!(!result.status.success());
    // The document is still written before the issues fail the run
    assert!(output.exists());
}

#[test]
fn test_inspect_json() {
    let dir = tempfile::tempdir().unwrap();
    let scene = write_scene(dir.path());

    let result = physexport(&["inspect", "--scene", &scene, "--format", "json"]);
    assert!(result.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(summary["node_count"], 2);
    assert_eq!(summary["rigid_body_count"], 1);
    assert_eq!(summary["bone_constraint_count"], 1);
}

#[test]
fn test_missing_scene_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.json");
    let result = physexport(&["inspect", "--scene", &missing.to_string_lossy()]);
    assert!(!result.status.success());
}
