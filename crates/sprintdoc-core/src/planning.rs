//! Markdown files from the workspace that can be attached to generated
//! documentation as planning context.

use crate::types::PlanningDocument;
use ignore::{DirEntry, WalkBuilder};
use std::path::{Path, PathBuf};

const SKIPPED_DIR: &str = "node_modules";

/// Every `*.md` file under `root`, sorted, honouring ignore files and
/// skipping `node_modules` and hidden entries.
pub fn discover(root: &Path) -> Vec<PathBuf> {
    let mut b = WalkBuilder::new(root);
    b.hidden(true);
    b.git_ignore(true);
    b.git_exclude(true);
    b.git_global(false);
    b.require_git(false);
    b.filter_entry(|ent: &DirEntry| {
        let is_dir = ent.file_type().map(|ft| ft.is_dir()).unwrap_or(false);
        !(is_dir && ent.file_name() == SKIPPED_DIR)
    });

    let mut out: Vec<PathBuf> = b
        .build()
        .filter_map(|res| res.ok())
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(|entry| entry.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "md"))
        .collect();
    out.sort();
    out
}

/// `/`-separated path of `path` relative to `root`.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Read the chosen files. Unreadable files are logged and left out.
pub fn load(root: &Path, paths: &[PathBuf]) -> Vec<PlanningDocument> {
    let mut docs = Vec::with_capacity(paths.len());
    for path in paths {
        match std::fs::read_to_string(path) {
            Ok(content) => docs.push(PlanningDocument {
                path: path.clone(),
                relative_path: relative_path(root, path),
                content,
            }),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable planning document");
            }
        }
    }
    docs
}
