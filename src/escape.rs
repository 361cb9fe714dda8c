//! LaTeX-safe normalization of paths and labels.
//!
//! Every string that reaches the output artifact goes through one fixed
//! substitution pass:
//! - `\` becomes `/` (Windows paths read as forward-slash paths)
//! - `//` becomes `/` (doubled separators collapse)
//! - `_` becomes `\_` (bare underscores break LaTeX outside math mode)
//!
//! The pass applies to the repository base URL as well, so the scheme's
//! `//` collapses too; emitted link targets are a byte-level contract
//! with existing documents and keep that form.

/// Apply the escape pass to a raw path, label, or URL.
///
/// The double-slash collapse is a single left-to-right pass over
/// non-overlapping matches, not a fixpoint: `a///b` becomes `a//b`.
/// Link targets are concatenated from already-escaped components, so
/// separators doubled by concatenation survive.
pub fn escape(raw: &str) -> String {
    raw.replace('\\', "/").replace("//", "/").replace('_', "\\_")
}
