//! Set-membership filters over relative paths.
//!
//! Matching is exact string equality on whole segments, never substring
//! or pattern matching. Segment matching runs against escaped relative
//! paths, so each entry is kept both as written and after the escape
//! pass: a raw spelling (`helper_functions`) matches through its escaped
//! form, a pre-escaped spelling (`helper\_functions`) matches as given.
//! The escape pass is not idempotent (it would turn the `\` of `\_` into
//! `/`), which is why the as-written form must be kept rather than
//! re-escaped.

use std::collections::BTreeSet;

use crate::escape::escape;

/// Top-level directory allow-list.
///
/// Empty means every top-level directory is permitted. Non-empty means a
/// directory is permitted only when the first segment of its relative
/// path is a member; deeper segments are never re-validated, so anything
/// under an allowed top-level directory stays permitted.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    names: BTreeSet<String>,
}

impl AllowList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = BTreeSet::new();
        for name in names {
            set.insert(name.as_ref().to_string());
            set.insert(escape(name.as_ref()));
        }
        Self { names: set }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Whether a directory with this escaped relative path is permitted.
    ///
    /// The root's relative path is empty; its first segment is the empty
    /// string, so a non-empty allow-list suppresses the root line.
    pub fn permits(&self, rel: &str) -> bool {
        if self.names.is_empty() {
            return true;
        }
        let first = rel.split('/').next().unwrap_or("");
        self.names.contains(first)
    }
}

/// Ignore-list covering directory-name segments and file extensions.
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    /// As-written and escaped entries, compared against escaped path
    /// segments.
    segments: BTreeSet<String>,
    /// Raw entries, compared against raw file extensions.
    extensions: BTreeSet<String>,
}

impl IgnoreList {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut segments = BTreeSet::new();
        let mut extensions = BTreeSet::new();
        for entry in entries {
            segments.insert(entry.as_ref().to_string());
            segments.insert(escape(entry.as_ref()));
            extensions.insert(entry.as_ref().to_string());
        }
        Self {
            segments,
            extensions,
        }
    }

    /// Segment test: true when any whitespace-trimmed segment of the
    /// escaped relative path is a member. Every descendant's relative
    /// path contains the matched segment, so a match suppresses the
    /// whole subtree's output even though traversal itself continues.
    pub fn matches_name(&self, rel: &str) -> bool {
        rel.split('/').any(|seg| self.segments.contains(seg.trim()))
    }

    /// Extension test on a raw file name: the substring after the final
    /// period, or the whole name when there is none.
    pub fn matches_extension(&self, file_name: &str) -> bool {
        let ext = file_name.rsplit('.').next().unwrap_or(file_name);
        self.extensions.contains(ext)
    }
}
