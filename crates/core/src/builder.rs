//! Directory → import graph
//!
//! Every discovered file becomes a module node. Its imports become edges to
//! whatever dotted names they resolve to. A file that cannot be read or
//! parsed keeps its node, contributes no edges, and is counted as failed.

use std::path::{Path, PathBuf};

use crate::config::DiscoveryConfig;
use crate::discovery;
use crate::error::{Error, Result};
use crate::graph::{ImportGraph, NodeKind};
use crate::import;
use crate::resolve;

/// Result of scanning one directory
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub graph: ImportGraph,
    /// Files turned into module nodes, including those whose parse failed
    pub files_processed: usize,
    /// Files that were skipped for edges, with the reason
    pub failures: Vec<(PathBuf, String)>,
}

impl BuildReport {
    pub fn files_failed(&self) -> usize {
        self.failures.len()
    }
}

/// Check that `root` exists and is a directory
pub fn validate_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(Error::PathNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }
    Ok(())
}

/// Scan `root` and build its import graph
///
/// # Errors
///
/// Only for an invalid root. Per-file problems land in
/// [`BuildReport::failures`].
///
/// # Example
/// ```no_run
/// use import_graph_core::{builder, config::DiscoveryConfig};
///
/// let report = builder::build_import_graph(std::path::Path::new("my_project"), &DiscoveryConfig::default()).unwrap();
/// println!("{} nodes, {} edges", report.graph.node_count(), report.graph.edge_count());
/// ```
pub fn build_import_graph(root: &Path, options: &DiscoveryConfig) -> Result<BuildReport> {
    validate_root(root)?;
    let root = root.canonicalize()?;

    let mut report = BuildReport::default();

    for file in discovery::discover_files(&root, options) {
        let Some(module) = resolve::module_name(&root, &file) else {
            tracing::warn!(file = %file.display(), "cannot derive a module name, skipping");
            continue;
        };

        report.graph.ensure_node(&module, NodeKind::Module);
        report.files_processed += 1;

        match import::extract_imports(&file) {
            Ok(statements) => {
                let mut added = 0usize;
                for target in statements.iter().flat_map(|stmt| stmt.targets(&module)) {
                    if report.graph.add_import(&module, &target) {
                        added += 1;
                    }
                }
                tracing::debug!(%module, edges = added, "parsed");
            }
            Err(err) => {
                tracing::warn!(file = %file.display(), %err, "error parsing file");
                report.failures.push((file, err.to_string()));
            }
        }
    }

    tracing::info!(
        files = report.files_processed,
        failed = report.files_failed(),
        nodes = report.graph.node_count(),
        edges = report.graph.edge_count(),
        "import graph built"
    );

    Ok(report)
}
