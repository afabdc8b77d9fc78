//! Embeds the version string shown by `carousel --version`.
//!
//! Tagged release builds report the crate version. Any other build reports
//! `<version>-dev+<short hash>`, or just `<version>-dev` outside a git
//! checkout.

use std::process::Command;

fn git(args: &[&str]) -> Option<String> {
    Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let version = env!("CARGO_PKG_VERSION");
    let on_tag = git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();
    let full = if on_tag {
        version.to_string()
    } else {
        match git(&["rev-parse", "--short", "HEAD"]) {
            Some(hash) if !hash.is_empty() => format!("{version}-dev+{hash}"),
            _ => format!("{version}-dev"),
        }
    };

    println!("cargo:rustc-env=CAROUSEL_VERSION={full}");
}
