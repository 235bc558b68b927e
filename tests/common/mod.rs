//! Shared utilities for integration testing.

use std::io::Write;

use assert_cmd::Command;
use tabroute::completion::CompletionCandidate;
use tabroute::routing::RouteRegistry;
use tabroute::types::{EnumConverter, TypeRegistry};
use tempfile::NamedTempFile;

/// A small application exercising types, options and sources.
#[allow(dead_code)]
pub const SHOP_CONFIG: &str = r#"
app_name = "shop"

[[types]]
name = "Environment"
kind = "enum"
values = ["Dev", "Staging", "Prod"]

[[routes]]
pattern = "deploy {env:Environment} --version {tag} --force,-f"
description = "Deploy a build"
handler = "deploy"

[[routes]]
pattern = "status --all"
description = "Show service status"
handler = "status"

[[routes]]
pattern = "open {path:file}"
handler = "open"

[[routes]]
pattern = "cd {target:directory}"
handler = "cd"

[[routes]]
pattern = "exec {*command}"
handler = "exec"

[[sources]]
parameter = "tag"
values = ["v1.0", "v1.1", "v2.0"]
description = "Release tag"
"#;

/// Write `content` to a scratch TOML file that lives as long as the handle.
#[allow(dead_code)]
pub fn write_config(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// The binary with its config pointed at `config`.
#[allow(dead_code)]
pub fn tabroute(config: &NamedTempFile) -> Command {
    let mut cmd = Command::cargo_bin("tabroute").unwrap();
    cmd.env("TABROUTE_CONFIG", config.path()).env_remove("TABROUTE_LOG");
    cmd
}

/// Routes compiled against the built-ins plus an `Environment` enum.
#[allow(dead_code)]
pub fn registry(patterns: &[&str]) -> RouteRegistry {
    let mut types = TypeRegistry::with_builtins();
    types.register("Environment", EnumConverter::new(["Dev", "Staging", "Prod"]));
    RouteRegistry::from_patterns(patterns.iter().copied(), &types).unwrap()
}

#[allow(dead_code)]
pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[allow(dead_code)]
pub fn values(candidates: &[CompletionCandidate]) -> Vec<String> {
    candidates.iter().map(|c| c.value().to_string()).collect()
}
