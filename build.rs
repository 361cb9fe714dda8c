use std::process::Command;

fn main() {
    // Version precedence:
    // 1. git describe with proper semver tags only (vX.Y.Z, not vX.Y.Z-suffix)
    // 2. 0.0.0-g<hash> for repos without semver tags
    // 3. Cargo.toml version (final fallback)
    let version = Command::new("git")
        .args([
            "describe",
            "--tags",
            "--match",
            "v[0-9]*",
            "--exclude",
            "*-*",
            "--always",
        ])
        .output()
        .ok()
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|s| {
            if let Some(tag) = s.strip_prefix('v') {
                // Has a semver tag: v0.1.0-3-gabcdef -> 0.1.0-3-gabcdef
                tag.to_string()
            } else {
                // Just a commit hash (no semver tags): use 0.0.0-g<hash>
                format!("0.0.0-g{}", s)
            }
        })
        .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=LAUB_VERSION={}", version);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");
}
