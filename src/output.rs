//! CLI output formatting for build progress.
//!
//! # Output Format
//!
//! One line per artifact decision, marked by whether it was written in this
//! run. Paths are shown relative to the target root:
//!
//! ```text
//! 2020/Paris/
//! * 2020/Paris/a/a_preview.jpeg
//! * 2020/Paris/a/a_view.jpeg
//!   2020/Paris/a/a.jpeg
//! * 2020/Paris/a/index.html
//! * 2020/Paris/index.html
//! ```
//!
//! `* ` marks a rebuilt artifact, two spaces a skipped one. Directory lines
//! end in `/`; the root is shown as `./`.
//!
//! # Architecture
//!
//! [`format_build_event`] is pure (returns `Vec<String>`, no I/O) for
//! testability. [`print_build_event`] writes its lines to stdout.

use crate::artifact::{ArtifactStatus, BuildEvent};
use std::path::Path;

/// Render a target path relative to the target root, `/`-separated.
fn display_path(path: &Path, target_root: &Path) -> String {
    match path.strip_prefix(target_root) {
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.display().to_string(),
    }
}

fn marker(status: ArtifactStatus) -> &'static str {
    match status {
        ArtifactStatus::Rebuilt => "* ",
        ArtifactStatus::Skipped => "  ",
    }
}

/// Format one build event as display lines.
///
/// With `quiet` set, only artifacts written in this run are shown.
pub fn format_build_event(event: &BuildEvent, target_root: &Path, quiet: bool) -> Vec<String> {
    match event {
        BuildEvent::DirectoryStarted { path } => {
            if quiet {
                return Vec::new();
            }
            let dir = display_path(path, target_root);
            if dir.is_empty() {
                vec!["./".to_string()]
            } else {
                vec![format!("{dir}/")]
            }
        }
        BuildEvent::Artifact { path, status, .. } => {
            if quiet && *status == ArtifactStatus::Skipped {
                return Vec::new();
            }
            vec![format!("{}{}", marker(*status), display_path(path, target_root))]
        }
    }
}

pub fn print_build_event(event: &BuildEvent, target_root: &Path, quiet: bool) {
    for line in format_build_event(event, target_root, quiet) {
        println!("{}", line);
    }
}
