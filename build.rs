use std::process::Command;

/// Trimmed stdout of a git command, empty when git or the repository is unavailable.
fn git(args: &[&str]) -> String {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");

    let hash = git(&["rev-parse", "--short", "HEAD"]);
    let commit_date = git(&["log", "-1", "--format=%cd", "--date=format:%Y-%m-%d %H:%M"]);

    // A release build sits exactly on a version tag with a clean tree
    let version = env!("CARGO_PKG_VERSION");
    let on_tag = git(&["tag", "--points-at", "HEAD"])
        .lines()
        .any(|tag| tag.trim_start_matches('v') == version);
    let dirty = !git(&["status", "--porcelain"]).is_empty();

    println!("cargo:rustc-env=WRK_GIT_HASH={}", hash);
    println!("cargo:rustc-env=WRK_GIT_COMMIT_DATE={}", commit_date);
    println!("cargo:rustc-env=WRK_IS_RELEASE={}", on_tag && !dirty);
}
