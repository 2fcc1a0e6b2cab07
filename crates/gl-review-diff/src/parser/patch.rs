//! Split a multi-file `git diff` output into a [`DiffVersion`].
//!
//! Each `diff --git` section becomes one [`FileDiff`]. The extended header
//! lines decide the file flags; everything from the first `@@` header on is
//! kept verbatim as the file's raw diff text.

use crate::model::{DiffRefs, DiffVersion, FileDiff};

const DEV_NULL: &str = "/dev/null";

/// Parse `git diff` output into a diff version bracketed by `refs`.
///
/// # Example
/// ```
/// use gl_review_diff::{parse_patch, DiffRefs};
///
/// let patch = "diff --git a/a.txt b/a.txt\n--- a/a.txt\n+++ b/a.txt\n@@ -1 +1 @@\n-x\n+y\n";
/// let version = parse_patch(patch, DiffRefs::new("base", "head", "start"));
/// assert_eq!(version.files.len(), 1);
/// assert_eq!(version.files[0].raw_diff_text, "@@ -1 +1 @@\n-x\n+y\n");
/// ```
pub fn parse_patch(patch: &str, refs: DiffRefs) -> DiffVersion {
    let mut files = Vec::new();
    let mut current: Option<SectionBuilder> = None;

    for line in patch.lines() {
        if let Some(paths) = line.strip_prefix("diff --git ") {
            if let Some(section) = current.take() {
                files.push(section.finish());
            }
            current = Some(SectionBuilder::new(paths));
            continue;
        }

        // Preamble before the first file (e.g. `git format-patch` mail headers)
        let Some(section) = current.as_mut() else {
            continue;
        };
        section.push(line);
    }

    if let Some(section) = current.take() {
        files.push(section.finish());
    }

    log::debug!("Parsed patch into {} file diffs", files.len());
    DiffVersion::new(refs).with_files(files)
}

/// Collects the header flags and hunk text of one `diff --git` section.
#[derive(Debug, Default)]
struct SectionBuilder {
    old_path: String,
    new_path: String,
    is_new: bool,
    is_deleted: bool,
    is_renamed: bool,
    in_hunks: bool,
    hunk_text: String,
}

impl SectionBuilder {
    fn new(git_header_paths: &str) -> Self {
        let (old_path, new_path) = split_git_header_paths(git_header_paths);
        Self {
            old_path,
            new_path,
            ..Self::default()
        }
    }

    fn push(&mut self, line: &str) {
        if !self.in_hunks && line.starts_with("@@") {
            self.in_hunks = true;
        }

        if self.in_hunks {
            self.hunk_text.push_str(line);
            self.hunk_text.push('\n');
            return;
        }

        if line.starts_with("new file mode") {
            self.is_new = true;
        } else if line.starts_with("deleted file mode") {
            self.is_deleted = true;
        } else if let Some(path) = line.strip_prefix("rename from ") {
            self.old_path = path.to_string();
            self.is_renamed = true;
        } else if let Some(path) = line.strip_prefix("rename to ") {
            self.new_path = path.to_string();
            self.is_renamed = true;
        } else if let Some(path) = line.strip_prefix("--- ") {
            let path = clean_path(path);
            if path == DEV_NULL {
                self.is_new = true;
            } else {
                self.old_path = path;
            }
        } else if let Some(path) = line.strip_prefix("+++ ") {
            let path = clean_path(path);
            if path == DEV_NULL {
                self.is_deleted = true;
            } else {
                self.new_path = path;
            }
        }
    }

    fn finish(self) -> FileDiff {
        // Added/deleted files name the existing side on both paths
        let (old_path, new_path) = match (self.old_path.is_empty(), self.new_path.is_empty()) {
            (true, false) => (self.new_path.clone(), self.new_path),
            (false, true) => (self.old_path.clone(), self.old_path),
            _ => (self.old_path, self.new_path),
        };

        FileDiff {
            old_path,
            new_path,
            raw_diff_text: self.hunk_text,
            is_new: self.is_new,
            is_deleted: self.is_deleted,
            is_renamed: self.is_renamed,
        }
    }
}

/// Split the `a/<old> b/<new>` part of a `diff --git` line.
///
/// The split is ambiguous for paths containing ` b/`; the `---`/`+++` and
/// `rename` lines that follow override it when present.
fn split_git_header_paths(paths: &str) -> (String, String) {
    let paths = paths.trim();
    match paths.strip_prefix("a/").and_then(|rest| rest.split_once(" b/")) {
        Some((old, new)) => (old.to_string(), new.to_string()),
        None => match paths.split_once(' ') {
            Some((old, new)) => (clean_path(old), clean_path(new)),
            None => (clean_path(paths), clean_path(paths)),
        },
    }
}

/// Clean the path by removing a/b prefixes and trailing timestamps.
fn clean_path(path: &str) -> String {
    // `diff -u` style headers append a tab and a timestamp
    let path = path.split('\t').next().unwrap_or(path).trim();

    if let Some(stripped) = path.strip_prefix("a/") {
        return stripped.to_string();
    }
    if let Some(stripped) = path.strip_prefix("b/") {
        return stripped.to_string();
    }

    path.to_string()
}
