//! Shared helpers for driving the `flexirent` binary.

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Run the binary with an isolated environment so no user config or
/// credentials leak into the test.
pub fn flexirent(args: &[&str], home: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_flexirent"))
        .args(args)
        .env_clear()
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("RUST_LOG", "off")
        .output()
        .expect("run flexirent")
}

pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    let text = serde_json::to_string_pretty(value).expect("serialize fixture");
    std::fs::write(&path, text).expect("write fixture");
    path
}

pub fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|err| {
        panic!(
            "stdout is not JSON ({err}): {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    })
}
