// tests/editor_tests.rs
//! The real editor launcher, driven with ordinary shell commands
#![cfg(unix)]

use std::fs;

use encrypted_credentials::{EditorLauncher, SystemEditor};
use tempfile::tempdir;

mod common;

#[test]
fn test_command_with_arguments_receives_path_verbatim() {
    common::setup();
    let dir = tempdir().unwrap();
    let source = dir.path().join("source.yml");
    let target = dir.path().join("has space's.yml");
    fs::write(&source, b"db:\n  pass: edited\n").unwrap();
    fs::write(&target, b"db:\n  pass: original\n").unwrap();

    let command = format!("cp '{}'", source.display());
    let code = SystemEditor.launch(&command, &target).unwrap();

    assert_eq!(code, 0);
    assert_eq!(fs::read(&target).unwrap(), b"db:\n  pass: edited\n");
}

#[test]
fn test_non_zero_exit_code_is_reported() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("secrets.yml");
    fs::write(&target, b"").unwrap();

    assert_eq!(SystemEditor.launch("false", &target).unwrap(), 1);
    assert_eq!(SystemEditor.launch("true", &target).unwrap(), 0);
}

#[test]
fn test_missing_editor_is_shell_not_found_code() {
    let dir = tempdir().unwrap();
    let target = dir.path().join("secrets.yml");
    fs::write(&target, b"").unwrap();

    let code = SystemEditor
        .launch("no-such-editor-for-credentials", &target)
        .unwrap();
    assert_eq!(code, 127);
}
