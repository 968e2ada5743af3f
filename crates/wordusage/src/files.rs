//! Input discovery.
//!
//! Arguments naming an existing file are taken as-is. Directories are
//! walked for files with a known prose extension. Anything else is a glob
//! matched against paths relative to the working directory, and a glob
//! prefixed with `!` excludes what it matches. Walks honour `.gitignore`
//! and `.wordusageignore`.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

/// Ignore file read during directory walks, gitignore syntax.
pub const IGNORE_FILE: &str = ".wordusageignore";

/// Prose extensions picked up by default.
pub const DEFAULT_EXTENSIONS: &[&str] =
    &["txt", "text", "md", "markdown", "mkd", "mkdn", "mkdown", "ron"];

/// Prefix marking an input as an exclusion glob (`!example.md`).
const NEGATION: char = '!';

/// Directories searched when no inputs are given, besides the root.
const DEFAULT_DIRS: &[&str] = &["docs/**/", "doc/**/"];

/// Finds input files.
#[derive(Debug, Clone)]
pub struct FileFinder {
    root: Utf8PathBuf,
    extensions: Vec<String>,
}

impl FileFinder {
    /// Finder rooted at `root` using the default extensions plus `extra`.
    pub fn new(root: impl Into<Utf8PathBuf>, extra: &[String]) -> Self {
        let mut extensions: Vec<String> = DEFAULT_EXTENSIONS.iter().map(ToString::to_string).collect();
        for ext in extra {
            let ext = ext.trim_start_matches('.').to_ascii_lowercase();
            if !ext.is_empty() && !extensions.contains(&ext) {
                extensions.push(ext);
            }
        }
        Self {
            root: root.into(),
            extensions,
        }
    }

    /// Globs used when no inputs are given.
    pub fn default_globs(&self) -> Vec<String> {
        let exts = self.extensions.join(",");
        std::iter::once(String::new())
            .chain(DEFAULT_DIRS.iter().map(ToString::to_string))
            .map(|dir| format!("{dir}*.{{{exts}}}"))
            .collect()
    }

    /// Resolves inputs to a sorted, de-duplicated file list.
    ///
    /// Inputs starting with `!` are globs removing files from the result.
    /// When every input is negated, the default globs supply the files.
    ///
    /// # Errors
    ///
    /// Fails on an invalid glob or a directory walk error.
    #[tracing::instrument(skip(self), fields(root = %self.root))]
    pub fn find(&self, inputs: &[String]) -> anyhow::Result<Vec<Utf8PathBuf>> {
        let (negated, positive): (Vec<&String>, Vec<&String>) =
            inputs.iter().partition(|input| input.starts_with(NEGATION));
        let excluded: Vec<&str> = negated
            .iter()
            .map(|input| input.trim_start_matches(NEGATION))
            .filter(|pattern| !pattern.is_empty())
            .collect();

        let defaults;
        let positive: Vec<&str> = if positive.is_empty() {
            defaults = self.default_globs();
            defaults.iter().map(String::as_str).collect()
        } else {
            positive.into_iter().map(String::as_str).collect()
        };

        let mut files = Vec::new();
        let mut globs = Vec::new();

        for input in positive {
            let path = self.root.join(input);
            if path.is_file() {
                files.push(Utf8PathBuf::from(input));
            } else if path.is_dir() {
                self.walk(&path, |rel| self.has_known_extension(rel), &mut files)?;
            } else {
                globs.push(input);
            }
        }

        if !globs.is_empty() {
            let set = build_globset(&globs)?;
            let root = self.root.clone();
            self.walk(&root, |rel| set.is_match(rel.as_std_path()), &mut files)?;
        }

        if !excluded.is_empty() {
            let set = build_globset(&excluded)?;
            files.retain(|rel| !set.is_match(rel.as_std_path()));
        }

        files.sort();
        files.dedup();
        tracing::debug!(files = files.len(), excluded = excluded.len(), "inputs resolved");
        Ok(files)
    }

    fn has_known_extension(&self, path: &Utf8Path) -> bool {
        path.extension()
            .is_some_and(|ext| self.extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
    }

    /// Walks `dir`, pushing files (relative to the root) that pass `keep`.
    fn walk(
        &self,
        dir: &Utf8Path,
        keep: impl Fn(&Utf8Path) -> bool,
        out: &mut Vec<Utf8PathBuf>,
    ) -> anyhow::Result<()> {
        let walker = WalkBuilder::new(dir)
            .add_custom_ignore_filename(IGNORE_FILE)
            .require_git(false)
            .build();

        for entry in walker {
            let entry = entry.with_context(|| format!("failed to walk {dir}"))?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let Ok(path) = Utf8PathBuf::from_path_buf(entry.into_path()) else {
                tracing::warn!("skipping non UTF-8 path");
                continue;
            };
            let rel = path.strip_prefix(&self.root).map_or_else(|_| path.clone(), Utf8Path::to_path_buf);
            if keep(&rel) {
                out.push(rel);
            }
        }
        Ok(())
    }
}

fn build_globset(patterns: &[&str]) -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern {pattern:?}"))?;
        builder.add(glob);
    }
    builder.build().context("failed to build glob set")
}
