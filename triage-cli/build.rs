use std::path::Path;
use std::process::Command;

/// Embed `git describe` output as TRIAGE_BUILD_SHA for `triage --version`.
fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let workspace = Path::new(&manifest_dir).join("..");

    let git_head = workspace.join(".git").join("HEAD");
    if git_head.exists() {
        println!("cargo:rerun-if-changed={}", git_head.display());
    }

    let describe = Command::new("git")
        .arg("-C")
        .arg(&workspace)
        .args(["describe", "--always", "--dirty=-modified", "--abbrev=8"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .filter(|s| !s.is_empty());

    println!(
        "cargo:rustc-env=TRIAGE_BUILD_SHA={}",
        describe.as_deref().unwrap_or("unknown")
    );
}
