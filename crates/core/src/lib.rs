//! Import Graph Core Library
//!
//! Scans a directory of Python sources, builds the graph of which module
//! imports which name, lays it out and renders it as a standalone
//! interactive HTML page.

pub mod builder;
pub mod config;
pub mod discovery;
pub mod error;
pub mod figure;
pub mod graph;
pub mod import;
pub mod layout;
pub mod render;
pub mod resolve;

// Re-export commonly used types
pub use builder::{build_import_graph, BuildReport};
pub use config::Config;
pub use error::{Error, Result};
pub use figure::Figure;
pub use graph::{ImportGraph, ModuleNode, NodeKind};
pub use layout::{compute_layout, Layout};

/// Lay out `graph` and render it as an HTML page
///
/// # Errors
///
/// [`Error::EmptyGraph`] when there is nothing to draw.
pub fn render_graph(graph: &ImportGraph, config: &Config) -> Result<String> {
    if graph.is_empty() {
        return Err(Error::EmptyGraph);
    }

    let layout = compute_layout(graph, &config.layout);
    let figure = Figure::build(graph, &layout, &config.output.title);
    render::render_html(&figure)
}
