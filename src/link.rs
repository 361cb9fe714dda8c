//! Hyperlink targets into the remote repository.

use crate::escape::escape;

/// Remote link base: repository URL plus branch name.
///
/// The base URL goes through the escape pass at construction, the same
/// pass applied to every path, so the `//` in the scheme collapses. The
/// URL is embedded as a literal string and never dereferenced.
#[derive(Debug, Clone)]
pub struct LinkBase {
    base: String,
    branch: String,
}

impl LinkBase {
    pub fn new(url: &str, branch: &str) -> Self {
        Self {
            base: escape(url),
            branch: branch.to_string(),
        }
    }

    /// Target for a directory: `<base>tree/<branch>/<rel>/`
    pub fn tree_url(&self, rel: &str) -> String {
        format!("{}tree/{}/{}/", self.base, self.branch, rel)
    }

    /// Target for a file: `<base>blob/<branch>/<rel>/<name>`
    ///
    /// The file name is used raw; only the label in the emitted line is
    /// escaped.
    pub fn blob_url(&self, rel: &str, file_name: &str) -> String {
        format!("{}blob/{}/{}/{}", self.base, self.branch, rel, file_name)
    }
}
