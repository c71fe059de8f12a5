use std::process::Command;

/// `git describe` が使えなければパッケージのバージョンを使う
fn describe() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--always", "--dirty", "--tags"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!version.is_empty()).then_some(version)
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let pkg = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();
    let version = match describe() {
        Some(git) => format!("{} ({})", pkg, git),
        None => pkg,
    };
    println!("cargo:rustc-env=GIT_VERSION={}", version);
}
