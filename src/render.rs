//! The traversal-and-emit pass.
//!
//! Pre-order walk over the directory tree, two filters, one sequential
//! writer. The emitted fragment is a byte-level compatibility contract
//! with the LaTeX `dirtree` package: depth-prefixed lines, a trailing
//! period after each closing brace, and a lone `}` footer.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::Settings;
use crate::escape::escape;
use crate::filter::{AllowList, IgnoreList};
use crate::link::LinkBase;
use crate::output::Output;

const HEADER_CHAPTER: &str = "\\chapter{Github References}\\label{app:GitHubRef} \n";
const HEADER_DIRTREE: &str = "\\dirtree{% \n";
const FOOTER: &str = "}";

/// Counts reported after a render pass
#[derive(Debug, Serialize)]
pub struct RenderSummary {
    pub directories: usize,
    pub files: usize,
    pub output: String,
}

/// Render the dirtree fragment for `settings.root` into `settings.output`.
///
/// The output file is created or truncated unconditionally. Directories
/// are visited in name order (pre-order), each followed by its surviving
/// files, so reruns over an unchanged tree are byte-identical.
///
/// An ignored directory name suppresses its whole subtree's output: the
/// walk still descends, but every descendant's relative path contains
/// the matched segment and fails the same test.
pub fn render(settings: &Settings, out: &Output) -> Result<RenderSummary> {
    let allow = AllowList::new(&settings.allow);
    let ignore = IgnoreList::new(&settings.ignore);
    let links = LinkBase::new(&settings.url, &settings.branch);

    let file = File::create(&settings.output).with_context(|| {
        format!(
            "failed to create output file: {}",
            settings.output.display()
        )
    })?;
    let mut w = BufWriter::new(file);

    w.write_all(HEADER_CHAPTER.as_bytes())?;
    w.write_all(HEADER_DIRTREE.as_bytes())?;

    let mut summary = RenderSummary {
        directories: 0,
        files: 0,
        output: settings.output.display().to_string(),
    };

    for entry in WalkDir::new(&settings.root)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| {
            format!("failed to walk directory tree under {}", settings.root.display())
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let rel = relative_path(&settings.root, entry.path());

        if !allow.permits(&rel) {
            continue;
        }
        if ignore.matches_name(&rel) {
            continue;
        }

        out.verbose(&format!("/{}", rel));

        let depth = rel.matches('/').count() + 1;
        let name = rel.rsplit('/').next().unwrap_or("");
        writeln!(w, ".{} \\href{{{}}}{{{}/}}.", depth, links.tree_url(&rel), name)?;
        summary.directories += 1;

        for file_name in list_files(entry.path())? {
            if ignore.matches_extension(&file_name) {
                continue;
            }
            writeln!(
                w,
                ".{} \\href{{{}}}{{{}}}.",
                depth + 1,
                links.blob_url(&rel, &file_name),
                escape(&file_name)
            )?;
            summary.files += 1;
        }
    }

    w.write_all(FOOTER.as_bytes())?;
    w.flush().with_context(|| {
        format!("failed to write output file: {}", settings.output.display())
    })?;

    Ok(summary)
}

/// Escaped path of `dir` relative to `root` (empty for the root itself)
fn relative_path(root: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(root).unwrap_or(dir);
    escape(&rel.to_string_lossy())
}

/// Non-directory entries of `dir`, in name order
fn list_files(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry =
            entry.with_context(|| format!("failed to read directory: {}", dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("failed to read directory: {}", dir.display()))?;
        if file_type.is_dir() {
            continue;
        }
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use tempfile::TempDir;

    fn settings(root: &Path, output: &Path) -> Settings {
        Settings {
            root: root.to_path_buf(),
            url: "https://example.com/r/".to_string(),
            branch: "main".to_string(),
            allow: Vec::new(),
            ignore: Vec::new(),
            output: output.to_path_buf(),
        }
    }

    fn render_tree(settings: &Settings) -> String {
        let out = Output::new(OutputFormat::Human, false);
        render(settings, &out).unwrap();
        fs::read_to_string(&settings.output).unwrap()
    }

    #[test]
    fn test_exact_output_for_small_tree() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("a/b.txt"), "").unwrap();

        let s = settings(&root, &dir.path().join("out.tex"));
        let output = render_tree(&s);

        assert_eq!(
            output,
            "\\chapter{Github References}\\label{app:GitHubRef} \n\
             \\dirtree{% \n\
             .1 \\href{https:/example.com/r/tree/main//}{/}.\n\
             .1 \\href{https:/example.com/r/tree/main/a/}{a/}.\n\
             .2 \\href{https:/example.com/r/blob/main/a/b.txt}{b.txt}.\n\
             }"
        );
    }

    #[test]
    fn test_footer_has_no_trailing_newline() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(&root).unwrap();

        let s = settings(&root, &dir.path().join("out.tex"));
        let output = render_tree(&s);

        assert!(output.ends_with("}"));
        assert!(!output.ends_with("}\n"));
    }

    #[test]
    fn test_empty_lists_include_everything_once() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("README.md"), "").unwrap();
        fs::write(root.join("docs/guide.md"), "").unwrap();
        fs::write(root.join("src/main.rs"), "").unwrap();

        let s = settings(&root, &dir.path().join("out.tex"));
        let output = render_tree(&s);

        for needle in ["{docs/}.", "{src/}.", "{README.md}.", "{guide.md}.", "{main.rs}."] {
            assert_eq!(output.matches(needle).count(), 1, "missing {}", needle);
        }
        // Root line, docs before src, files right after their directory.
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[2], ".1 \\href{https:/example.com/r/tree/main//}{/}.");
        assert!(lines[3].ends_with("{README.md}."));
        assert!(lines[4].ends_with("{docs/}."));
        assert!(lines[5].ends_with("{guide.md}."));
        assert!(lines[6].ends_with("{src/}."));
        assert!(lines[7].ends_with("{main.rs}."));
    }

    #[test]
    fn test_allow_list_semantics() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(root.join("src/lib")).unwrap();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("README.md"), "").unwrap();
        fs::write(root.join("src/main.rs"), "").unwrap();

        let mut s = settings(&root, &dir.path().join("out.tex"));
        s.allow = vec!["src".to_string()];
        let output = render_tree(&s);

        assert!(output.contains("{src/}."));
        assert!(output.contains("{lib/}."));
        assert!(output.contains("{main.rs}."));
        assert!(!output.contains("docs"));
        // The root's first relative segment is empty, so a non-empty
        // allow-list drops the root line and the root's own files.
        assert!(!output.contains("{/}."));
        assert!(!output.contains("README"));
    }

    #[test]
    fn test_pre_escaped_allow_entry_selects_directory() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(root.join("helper_functions")).unwrap();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::write(root.join("helper_functions/run.m"), "").unwrap();

        let mut s = settings(&root, &dir.path().join("out.tex"));
        s.allow = vec!["helper\\_functions".to_string()];
        let output = render_tree(&s);

        assert!(output.contains("{helper\\_functions/}."));
        assert!(output.contains("{run.m}."));
        assert!(!output.contains("docs"));
    }

    #[test]
    fn test_ignore_extension_semantics() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.tmp"), "").unwrap();
        fs::write(root.join("a.txt"), "").unwrap();

        let mut s = settings(&root, &dir.path().join("out.tex"));
        s.ignore = vec!["tmp".to_string()];
        let output = render_tree(&s);

        assert!(output.contains("{a.txt}."));
        assert!(!output.contains("a.tmp"));
    }

    #[test]
    fn test_ignored_directory_suppresses_subtree() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(root.join("keep")).unwrap();
        fs::create_dir_all(root.join("skip/inner")).unwrap();
        fs::write(root.join("keep/k.txt"), "").unwrap();
        fs::write(root.join("skip/y.txt"), "").unwrap();
        fs::write(root.join("skip/inner/x.txt"), "").unwrap();

        let mut s = settings(&root, &dir.path().join("out.tex"));
        s.ignore = vec!["skip".to_string()];
        let output = render_tree(&s);

        assert!(output.contains("{keep/}."));
        assert!(output.contains("{k.txt}."));
        assert!(!output.contains("skip"));
        assert!(!output.contains("inner"));
        assert!(!output.contains("x.txt"));
        assert!(!output.contains("y.txt"));
    }

    #[test]
    fn test_depth_follows_separator_count() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::write(root.join("a/b/c/f.txt"), "").unwrap();

        let s = settings(&root, &dir.path().join("out.tex"));
        let output = render_tree(&s);

        assert!(output.contains(".1 \\href{https:/example.com/r/tree/main/a/}{a/}."));
        assert!(output.contains(".2 \\href{https:/example.com/r/tree/main/a/b/}{b/}."));
        assert!(output.contains(".3 \\href{https:/example.com/r/tree/main/a/b/c/}{c/}."));
        assert!(output.contains(".4 \\href{https:/example.com/r/blob/main/a/b/c/f.txt}{f.txt}."));
    }

    #[test]
    fn test_underscores_escaped_in_labels_not_blob_file_names() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(root.join("my_dir")).unwrap();
        fs::write(root.join("my_dir/f_1.txt"), "").unwrap();

        let s = settings(&root, &dir.path().join("out.tex"));
        let output = render_tree(&s);

        assert!(output.contains("{my\\_dir/}."));
        // Directory link targets use the escaped relative path; blob
        // targets append the raw file name to it.
        assert!(output.contains("tree/main/my\\_dir/}"));
        assert!(output.contains("blob/main/my\\_dir/f_1.txt}"));
        assert!(output.contains("{f\\_1.txt}."));
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/main.rs"), "").unwrap();

        let s = settings(&root, &dir.path().join("out.tex"));
        let first = render_tree(&s);
        let second = render_tree(&s);
        assert_eq!(first, second);
    }

    #[test]
    fn test_summary_counts() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/a.rs"), "").unwrap();
        fs::write(root.join("src/b.rs"), "").unwrap();

        let s = settings(&root, &dir.path().join("out.tex"));
        let out = Output::new(OutputFormat::Human, false);
        let summary = render(&s, &out).unwrap();

        // Root and src both emit a directory line.
        assert_eq!(summary.directories, 2);
        assert_eq!(summary.files, 2);
        assert_eq!(summary.output, s.output.display().to_string());
    }

    #[test]
    fn test_missing_root_fails() {
        let dir = TempDir::new().unwrap();
        let s = settings(
            &dir.path().join("does-not-exist"),
            &dir.path().join("out.tex"),
        );
        let out = Output::new(OutputFormat::Human, false);
        assert!(render(&s, &out).is_err());
    }

    #[test]
    fn test_unwritable_output_fails() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("tree");
        fs::create_dir_all(&root).unwrap();

        let s = settings(&root, &dir.path().join("missing-dir/out.tex"));
        let out = Output::new(OutputFormat::Human, false);
        assert!(render(&s, &out).is_err());
    }
}
