//! Standalone HTML page for a figure
//!
//! The page pulls Plotly.js from its CDN, embeds the figure JSON inline and
//! adds a search box that highlights nodes whose hover text contains the
//! query.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::figure::{Figure, NODE_SIZE, NODE_TRACE};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Marker size of a node matching the search
const HIGHLIGHT_SIZE: u32 = 20;

const HIGHLIGHT_COLOR: &str = "red";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <meta charset="utf-8">
        <title>{{title}}</title>
        <script src="{{plotly}}"></script>
    </head>
    <body>
        <div>
            <input type="text" id="searchBox" placeholder="Search for a module...">
            <button onclick="searchNode()">Search</button>
        </div>
        <div id="graph"></div>
        <script>
            var figure = {{figure}};
            // restyle writes back into figure.data, so keep the connection colours apart
            var baseColors = figure.data[{{node_trace}}].marker.color.slice();
            Plotly.newPlot('graph', figure.data, figure.layout);

            function searchNode() {
                var searchTerm = document.getElementById('searchBox').value.toLowerCase();
                var nodes = figure.data[{{node_trace}}];
                var labels = nodes.text || [];
                var colors = [];
                var sizes = [];

                for (var i = 0; i < labels.length; i++) {
                    if (searchTerm !== '' && labels[i].toLowerCase().includes(searchTerm)) {
                        colors[i] = '{{highlight_color}}';
                        sizes[i] = {{highlight_size}};
                    } else {
                        colors[i] = baseColors[i];
                        sizes[i] = {{node_size}};
                    }
                }

                Plotly.restyle('graph', {'marker.color': [colors], 'marker.size': [sizes]}, [{{node_trace}}]);
            }

            document.getElementById('searchBox').addEventListener('keydown', function (event) {
                if (event.key === 'Enter') {
                    searchNode();
                }
            });
        </script>
    </body>
</html>
"#;

/// Render the full page for `figure`
pub fn render_html(figure: &Figure) -> Result<String> {
    let json = script_safe(&figure.to_json()?);

    let html = TEMPLATE
        .replace("{{title}}", &escape_html(&figure.layout.title.text))
        .replace("{{plotly}}", PLOTLY_CDN)
        .replace("{{node_trace}}", &NODE_TRACE.to_string())
        .replace("{{node_size}}", &NODE_SIZE.to_string())
        .replace("{{highlight_size}}", &HIGHLIGHT_SIZE.to_string())
        .replace("{{highlight_color}}", HIGHLIGHT_COLOR)
        // Last, so placeholder-like text inside module names is left alone
        .replace("{{figure}}", &json);

    Ok(html)
}

/// Write `html` to `path` and return the absolute path of the file
pub fn write_html(path: &Path, html: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    let absolute = path.canonicalize()?;
    tracing::debug!(path = %absolute.display(), bytes = html.len(), "wrote page");
    Ok(absolute)
}

/// Make JSON safe to inline in a `<script>` element
///
/// `<`, `>` and `&` only occur inside JSON strings, where the `\u` escapes
/// decode to the same characters.
fn script_safe(json: &str) -> String {
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}

/// Escape text for an HTML element body
///
/// Braces are escaped too so the text can never form a template placeholder.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('{', "&#123;")
        .replace('}', "&#125;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::ImportGraph;
    use crate::layout::Layout;
    use tempfile::TempDir;

    fn figure(title: &str) -> Figure {
        let mut graph = ImportGraph::new();
        graph.add_import("main", "os");
        Figure::build(&graph, &Layout::default(), title)
    }

    fn embedded_json(html: &str) -> serde_json::Value {
        let start = html.find("var figure = ").unwrap() + "var figure = ".len();
        let end = start + html[start..].find(";\n").unwrap();
        serde_json::from_str(&html[start..end]).unwrap()
    }

    #[test]
    fn test_page_structure() {
        let html = render_html(&figure("Demo")).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains(r#"id="searchBox""#));
        assert!(html.contains("function searchNode()"));
        assert!(html.contains("Plotly.newPlot('graph'"));
        assert!(html.contains("<title>Demo</title>"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_embedded_figure_round_trips() {
        let html = render_html(&figure("Demo")).unwrap();
        let json = embedded_json(&html);

        assert_eq!(json["data"][1]["text"][0], "main<br># of connections: 1");
        assert_eq!(json["layout"]["title"]["text"], "Demo");
    }

    #[test]
    fn test_script_injection_escaped() {
        let html = render_html(&figure("</script><script>alert(1)</script>")).unwrap();

        assert_eq!(html.matches("</script>").count(), 2);
        assert!(html.contains("<title>&lt;/script&gt;"));
        assert_eq!(
            embedded_json(&html)["layout"]["title"]["text"],
            "</script><script>alert(1)</script>"
        );
    }

    #[test]
    fn test_search_restores_from_copied_colours() {
        let html = render_html(&figure("Demo")).unwrap();

        let copy = html
            .find("var baseColors = figure.data[1].marker.color.slice();")
            .unwrap();
        let plot = html.find("Plotly.newPlot('graph'").unwrap();
        assert!(copy < plot);
        assert!(html.contains("colors[i] = baseColors[i];"));
        assert!(!html.contains("nodes.marker.color[i]"));
    }

    #[test]
    fn test_title_placeholders_not_expanded() {
        let html = render_html(&figure("My {{figure}} {{node_size}}")).unwrap();

        assert!(html.contains("<title>My &#123;&#123;figure&#125;&#125; &#123;&#123;node_size&#125;&#125;</title>"));
        assert_eq!(html.matches("var figure = ").count(), 1);
        assert_eq!(
            embedded_json(&html)["layout"]["title"]["text"],
            "My {{figure}} {{node_size}}"
        );
    }

    #[test]
    fn test_node_text_markup_escaped() {
        let html = render_html(&figure("Demo")).unwrap();
        assert!(html.contains("main\\u003cbr\\u003e# of connections: 1"));
    }

    #[test]
    fn test_write_html() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out/graph.html");

        let written = write_html(&target, "<html></html>").unwrap();

        assert!(written.is_absolute());
        assert!(written.ends_with("out/graph.html"));
        assert_eq!(std::fs::read_to_string(written).unwrap(), "<html></html>");
    }
}
