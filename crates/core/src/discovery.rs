//! Source file discovery
//!
//! Walks a project directory with the `ignore` crate and keeps the files
//! whose root-relative path matches one of the configured glob patterns.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::config::DiscoveryConfig;

/// Discover files matching glob patterns in a project directory
///
/// # Arguments
/// * `root` - Root directory to search
/// * `options` - Patterns and walk behaviour (gitignore, hidden entries)
///
/// # Returns
/// Absolute paths of the matching files, sorted. A root that cannot be
/// canonicalized, or patterns that fail to compile, yield an empty list.
///
/// # Example
/// ```no_run
/// use import_graph_core::{config::DiscoveryConfig, discovery};
///
/// let files = discovery::discover_files(std::path::Path::new("my_project"), &DiscoveryConfig::default());
/// println!("Found {} files", files.len());
/// ```
pub fn discover_files(root: &Path, options: &DiscoveryConfig) -> Vec<PathBuf> {
    let canonical_root = match root.canonicalize() {
        Ok(path) => path,
        Err(err) => {
            tracing::warn!(root = %root.display(), %err, "cannot resolve discovery root");
            return Vec::new();
        }
    };

    let glob_matcher = match build_glob_matcher(&options.patterns) {
        Ok(matcher) => matcher,
        Err(err) => {
            tracing::warn!(%err, "invalid discovery pattern");
            return Vec::new();
        }
    };

    let mut files = Vec::new();
    for result in build_walker(&canonical_root, options) {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                // Unreadable directories are skipped, the rest of the walk continues
                tracing::warn!(%err, "error walking directory");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        if let Ok(rel_path) = entry.path().strip_prefix(&canonical_root) {
            if glob_matcher.is_match(rel_path) {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    tracing::debug!(count = files.len(), root = %canonical_root.display(), "discovered files");
    files
}

/// Discover Python files in a project directory
///
/// Uses `**/*.py` regardless of the patterns in `options`.
pub fn discover_python_files(root: &Path, options: &DiscoveryConfig) -> Vec<PathBuf> {
    let options = DiscoveryConfig {
        patterns: vec!["**/*.py".to_string()],
        ..options.clone()
    };
    discover_files(root, &options)
}

fn build_glob_matcher(patterns: &[String]) -> Result<globset::GlobSet, globset::Error> {
    let mut builder = globset::GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(globset::Glob::new(pattern)?);
    }
    builder.build()
}

fn build_walker(root: &Path, options: &DiscoveryConfig) -> ignore::Walk {
    let mut builder = WalkBuilder::new(root);
    builder
        .git_ignore(options.respect_gitignore)
        .git_exclude(options.respect_gitignore)
        .git_global(false)
        .ignore(options.respect_gitignore)
        .parents(options.respect_gitignore)
        .hidden(!options.include_hidden)
        .require_git(false);

    builder.build()
}
