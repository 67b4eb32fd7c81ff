//! Plotly figure model
//!
//! Two scatter traces: edges drawn as line segments separated by `null`
//! gaps, then nodes as markers coloured by their connection count. The
//! browser page looks nodes up at `data[1]`, so the order is fixed.

use serde::Serialize;

use crate::error::Result;
use crate::graph::ImportGraph;
use crate::layout::Layout;

/// Index of the node trace within [`Figure::data`]
pub const NODE_TRACE: usize = 1;

/// Marker size of a node that does not match the current search
pub const NODE_SIZE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: FigureLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub trace_type: &'static str,
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    pub mode: &'static str,
    pub hoverinfo: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub showscale: bool,
    pub colorscale: &'static str,
    pub reversescale: bool,
    pub color: Vec<usize>,
    pub size: u32,
    pub colorbar: ColorBar,
    pub line: Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub thickness: u32,
    pub title: Title,
    pub xanchor: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureLayout {
    pub title: Title,
    pub showlegend: bool,
    pub hovermode: &'static str,
    pub margin: Margin,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub b: u32,
    pub l: u32,
    pub r: u32,
    pub t: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub showgrid: bool,
    pub zeroline: bool,
    pub showticklabels: bool,
}

impl Axis {
    fn hidden() -> Self {
        Self {
            showgrid: false,
            zeroline: false,
            showticklabels: false,
        }
    }
}

impl Figure {
    /// Build the figure for `graph` placed by `layout`
    ///
    /// Nodes without a position are drawn at the origin.
    pub fn build(graph: &ImportGraph, layout: &Layout, title: &str) -> Self {
        let position = |id: &str| layout.position(id).unwrap_or((0.0, 0.0));

        let mut edge_x = Vec::with_capacity(graph.edge_count() * 3);
        let mut edge_y = Vec::with_capacity(graph.edge_count() * 3);
        for (from, to) in graph.edges() {
            let (x0, y0) = position(from);
            let (x1, y1) = position(to);
            edge_x.extend([Some(x0), Some(x1), None]);
            edge_y.extend([Some(y0), Some(y1), None]);
        }

        let mut node_x = Vec::with_capacity(graph.node_count());
        let mut node_y = Vec::with_capacity(graph.node_count());
        let mut colors = Vec::with_capacity(graph.node_count());
        let mut text = Vec::with_capacity(graph.node_count());
        for node in graph.nodes() {
            let (x, y) = position(&node.id);
            let connections = graph.connections(&node.id);
            node_x.push(Some(x));
            node_y.push(Some(y));
            colors.push(connections);
            text.push(format!("{}<br># of connections: {}", node.id, connections));
        }

        let edge_trace = Trace {
            trace_type: "scatter",
            x: edge_x,
            y: edge_y,
            mode: "lines",
            hoverinfo: "none",
            line: Some(Line {
                width: 0.5,
                color: Some("#888"),
            }),
            marker: None,
            text: Vec::new(),
        };

        let node_trace = Trace {
            trace_type: "scatter",
            x: node_x,
            y: node_y,
            mode: "markers",
            hoverinfo: "text",
            line: None,
            marker: Some(Marker {
                showscale: true,
                colorscale: "YlGnBu",
                reversescale: true,
                color: colors,
                size: NODE_SIZE,
                colorbar: ColorBar {
                    thickness: 15,
                    title: Title {
                        text: "Node Connections".to_string(),
                    },
                    xanchor: "left",
                },
                line: Line {
                    width: 2.0,
                    color: None,
                },
            }),
            text,
        };

        Figure {
            data: vec![edge_trace, node_trace],
            layout: FigureLayout {
                title: Title {
                    text: title.to_string(),
                },
                showlegend: false,
                hovermode: "closest",
                margin: Margin {
                    b: 20,
                    l: 5,
                    r: 5,
                    t: 40,
                },
                xaxis: Axis::hidden(),
                yaxis: Axis::hidden(),
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
