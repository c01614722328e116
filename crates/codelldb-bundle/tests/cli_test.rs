//! End-to-end tests for the codelldb-bundle binary

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use codelldb_bundle::platform::{HELPER_SCRIPTS, Platform};

fn binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_codelldb-bundle"))
}

/// Scratch workspace with sources for the host platform
fn workspace() -> tempfile::TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let root = temp_dir.path();
    let profile = Platform::host().profile();

    for script in HELPER_SCRIPTS {
        write(&root.join("adapter2").join(script), script);
    }
    write(&root.join("target/debug").join(profile.adapter_binary), "bin");
    write(&root.join("target/debug").join(profile.adapter_library), "lib");
    for file in profile.toolchain_files {
        write(&root.join("lldb").join(file.path), file.path);
    }
    if let Some(support) = profile.support_library {
        write(&root.join("lldb").join(support.source).join("six.py"), "# six");
    }

    temp_dir
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn run(root: &Path, args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(binary());
    cmd.arg("-w")
        .arg(root)
        .args(args)
        .env_remove("LLDB_ROOT")
        .env_remove("LLDB_EXECUTABLE")
        .env("RUST_LOG", "info");
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to run codelldb-bundle")
}

#[test]
fn test_missing_toolchain_root_fails_before_copying() {
    let ws = workspace();

    let output = run(ws.path(), &["build", "--skip-build"], &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Toolchain root is not set"), "stderr: {}", stderr);
    assert!(!ws.path().join("out").exists());
}

#[test]
fn test_sync_then_skip() {
    let ws = workspace();
    let lldb_root = ws.path().join("lldb");
    let lldb_root = lldb_root.to_str().unwrap();

    let first = run(ws.path(), &["build", "--skip-build"], &[("LLDB_ROOT", lldb_root)]);
    assert!(first.status.success());
    let log = String::from_utf8_lossy(&first.stderr);
    assert!(log.contains("Copying codelldb.py"), "log: {}", log);

    let second = run(ws.path(), &["build", "--skip-build"], &[("LLDB_ROOT", lldb_root)]);
    assert!(second.status.success());
    let log = String::from_utf8_lossy(&second.stderr);
    assert!(log.contains("Skipping codelldb.py"), "log: {}", log);
    assert!(!log.contains("Copying"), "log: {}", log);
}

#[test]
fn test_dry_run_prints_plan_without_copying() {
    let ws = workspace();
    let lldb_root = ws.path().join("lldb");

    let output = run(
        ws.path(),
        &["build", "--dry-run", "--platform", "linux"],
        &[("LLDB_ROOT", lldb_root.to_str().unwrap())],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Would run: cargo build"), "stdout: {}", stdout);
    assert!(stdout.contains("Would synchronize for linux:"), "stdout: {}", stdout);
    assert!(stdout.contains("libcodelldb.so"), "stdout: {}", stdout);
    assert!(stdout.contains("ignoring _lldb.*"), "stdout: {}", stdout);
    assert!(!ws.path().join("out").exists());
}

#[cfg(unix)]
#[test]
fn test_failed_build_exits_nonzero_without_copying() {
    let ws = workspace();
    write(
        &ws.path().join("codelldb-bundle.toml"),
        "[build]\ncommand = [\"sh\", \"-c\", \"exit 2\"]\n",
    );
    let lldb_root = ws.path().join("lldb");

    let output = run(
        ws.path(),
        &["build"],
        &[("LLDB_ROOT", lldb_root.to_str().unwrap())],
    );

    assert!(!output.status.success());
    assert!(!ws.path().join("out").exists());
}

#[cfg(unix)]
#[test]
fn test_launch_propagates_debugger_exit_code() {
    let ws = workspace();

    let failed = run(
        ws.path(),
        &["launch", "/tmp/foo.py", "--flag", "x"],
        &[("LLDB_EXECUTABLE", "false")],
    );
    assert_eq!(failed.status.code(), Some(1));

    let succeeded = run(ws.path(), &["launch", "/tmp/foo.py"], &[("LLDB_EXECUTABLE", "true")]);
    assert_eq!(succeeded.status.code(), Some(0));
}

#[cfg(unix)]
#[test]
fn test_launch_exits_with_the_debugger_code_unchanged() {
    use std::os::unix::fs::PermissionsExt;

    let ws = workspace();
    let debugger = ws.path().join("fake-lldb");
    fs::write(&debugger, "#!/bin/sh\nexit 7\n").unwrap();
    fs::set_permissions(&debugger, fs::Permissions::from_mode(0o755)).unwrap();

    let output = run(
        ws.path(),
        &["launch", "/tmp/foo.py", "--flag"],
        &[("LLDB_EXECUTABLE", debugger.to_str().unwrap())],
    );

    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_launch_requires_debugger_shell() {
    let ws = workspace();

    let output = run(ws.path(), &["launch", "/tmp/foo.py"], &[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("LLDB_EXECUTABLE"), "stderr: {}", stderr);
}
