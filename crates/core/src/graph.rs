//! Module import graph
//!
//! Nodes are dotted names, unique within a graph. Edges run from an
//! importing module to the name it imports and are never duplicated.

use petgraph::stable_graph::{NodeIndex, StableGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A node in the import graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleNode {
    /// Dotted name, e.g. `pkg.sub.mod` or `numpy`
    pub id: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A scanned source file
    Module,
    /// Only ever seen as an import target
    External,
}

/// An edge representing "source imports target"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEdge;

/// The import graph
#[derive(Debug, Clone, Default)]
pub struct ImportGraph {
    inner: StableGraph<ModuleNode, ImportEdge>,
    index: HashMap<String, NodeIndex>,
}

impl ImportGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node if absent and return its index
    ///
    /// Adding a `Module` for an id already present as `External` upgrades it;
    /// the reverse never downgrades.
    pub fn ensure_node(&mut self, id: &str, kind: NodeKind) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            if kind == NodeKind::Module {
                if let Some(node) = self.inner.node_weight_mut(idx) {
                    node.kind = NodeKind::Module;
                }
            }
            return idx;
        }

        let idx = self.inner.add_node(ModuleNode {
            id: id.to_string(),
            kind,
        });
        self.index.insert(id.to_string(), idx);
        idx
    }

    /// Record that `from` imports `to`
    ///
    /// Missing endpoints are created as `External`. Returns `false` when the
    /// edge already existed.
    pub fn add_import(&mut self, from: &str, to: &str) -> bool {
        let source = self.ensure_node(from, NodeKind::External);
        let target = self.ensure_node(to, NodeKind::External);

        if self.inner.find_edge(source, target).is_some() {
            return false;
        }
        self.inner.add_edge(source, target, ImportEdge);
        true
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&ModuleNode> {
        self.index
            .get(id)
            .and_then(|&idx| self.inner.node_weight(idx))
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &ModuleNode> {
        self.inner.node_weights()
    }

    /// Edges as `(importer, imported)` id pairs, in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.inner.edge_references().filter_map(|edge| {
            let source = self.inner.node_weight(edge.source())?;
            let target = self.inner.node_weight(edge.target())?;
            Some((source.id.as_str(), target.id.as_str()))
        })
    }

    /// Names imported by `id`
    pub fn successors(&self, id: &str) -> Vec<&str> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };

        let mut names: Vec<&str> = self
            .inner
            .neighbors_directed(idx, Direction::Outgoing)
            .filter_map(|n| self.inner.node_weight(n))
            .map(|n| n.id.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Number of distinct names `id` imports
    pub fn connections(&self, id: &str) -> usize {
        self.index
            .get(id)
            .map(|&idx| {
                self.inner
                    .neighbors_directed(idx, Direction::Outgoing)
                    .count()
            })
            .unwrap_or(0)
    }
}
