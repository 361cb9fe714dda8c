//! Render a hyperlinked LaTeX dirtree appendix from a directory tree.
//!
//! One pass: walk a root directory, apply an allow-list (top-level
//! directories) and an ignore-list (directory names and file
//! extensions), and write a `dirtree` outline where every surviving
//! directory and file is a `\href` into a remote repository.

pub mod config;
pub mod escape;
pub mod filter;
pub mod link;
pub mod output;
pub mod render;
