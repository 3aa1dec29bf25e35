use std::{collections::HashMap, fmt::Write as FmtWrite, fs, path::Path, process::Command};

use lazy_static::lazy_static;
use petgraph::visit::EdgeRef;
use thiserror::Error;
use tracing::{debug, info};

use crate::MoleculeGraph;

lazy_static! {
    /// Default fill colors, keyed by element symbol.
    static ref DEFAULT_COLORS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("C", "gray");
        m.insert("O", "red");
        m.insert("N", "blue");
        m.insert("H", "#D3D3D3");
        m
    };
}

/// Rendering configuration: node fill colors keyed by element symbol, and
/// the stroke-width multiplier applied to each bond order.
#[derive(Debug, Clone)]
pub struct RenderStyle {
    pub colors: HashMap<String, String>,
    pub width_scale: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            width_scale: 2.0,
        }
    }
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("no color configured for element {0:?}")]
    UnknownElement(String),
    #[error("failed to write render output: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not run Graphviz 'dot' (is Graphviz installed?): {0}")]
    GraphvizMissing(std::io::Error),
    #[error("Graphviz 'dot' exited with {0}")]
    GraphvizFailed(std::process::ExitStatus),
}

/// Generates a DOT representation of the molecule graph: a neato
/// (force-directed) layout at 300 dpi, filled circle nodes labeled with
/// their element symbol, and edges drawn with penwidth scaled by bond order.
///
/// Every element must have a color in `style.colors`; an unmapped element is
/// an error, never a default color.
pub fn generate_dot(graph: &MoleculeGraph, style: &RenderStyle) -> Result<String, RenderError> {
    let mut dot = String::new();
    writeln!(dot, "graph molecule {{").unwrap();
    writeln!(dot, "    layout=neato; overlap=false; splines=true; dpi=300;").unwrap();

    for node in graph.node_indices() {
        let atom = &graph[node];
        let color = style
            .colors
            .get(&atom.element)
            .ok_or_else(|| RenderError::UnknownElement(atom.element.clone()))?;
        writeln!(
            dot,
            "    {} [label=\"{}\", shape=circle, style=filled, fontcolor=white, fillcolor=\"{}\"];",
            node.index(),
            atom.element,
            color
        )
        .unwrap();
    }

    for edge in graph.edge_references() {
        writeln!(
            dot,
            "    {} -- {} [penwidth={}];",
            edge.source().index(),
            edge.target().index(),
            style.width_scale * f64::from(*edge.weight()),
        )
        .unwrap();
    }

    writeln!(dot, "}}").unwrap();
    Ok(dot)
}

/// Renders the graph to a raster image at `image_path` by exporting DOT text
/// and running Graphviz `dot` over it. The DOT file is written beside the
/// image and removed once rendering succeeds. Any existing file at
/// `image_path` is overwritten.
pub fn render_image(
    graph: &MoleculeGraph,
    style: &RenderStyle,
    image_path: &Path,
) -> Result<(), RenderError> {
    let dot = generate_dot(graph, style)?;

    let dot_path = image_path.with_extension("dot");
    fs::write(&dot_path, &dot)?;
    debug!("wrote DOT text to {}", dot_path.display());

    let status = Command::new("dot")
        .arg("-Tpng")
        .arg(&dot_path)
        .arg("-o")
        .arg(image_path)
        .status();

    // The DOT file is scratch space either way.
    let _ = fs::remove_file(&dot_path);

    let status = status.map_err(RenderError::GraphvizMissing)?;
    if !status.success() {
        return Err(RenderError::GraphvizFailed(status));
    }

    info!("rendered {}", image_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_graph, init_logging, Bond};

    fn carbonyl() -> MoleculeGraph {
        let elements = vec!["C".to_string(), "O".to_string()];
        let bonds = vec![Bond {
            from: 0,
            to: 1,
            order: 2,
        }];
        create_graph(&elements, &bonds).unwrap()
    }

    #[test]
    fn test_dot_output_labels_and_colors_nodes() {
        init_logging("trace");
        let dot = generate_dot(&carbonyl(), &RenderStyle::default()).unwrap();

        assert!(dot.contains("layout=neato"));
        assert!(dot.contains("dpi=300"));
        assert!(dot.contains("label=\"C\""));
        assert!(dot.contains("label=\"O\""));
        assert!(dot.contains("fillcolor=\"gray\""));
        assert!(dot.contains("fillcolor=\"red\""));
        // Double bond at the default 2x scale.
        assert!(dot.contains("penwidth=4"));
    }

    #[test]
    fn test_width_scale_is_applied() {
        let style = RenderStyle {
            width_scale: 1.5,
            ..Default::default()
        };
        let dot = generate_dot(&carbonyl(), &style).unwrap();
        assert!(dot.contains("penwidth=3"));
    }

    #[test]
    fn test_unknown_element_has_no_default_color() {
        let elements = vec!["Xx".to_string()];
        let graph = create_graph(&elements, &[]).unwrap();
        let err = generate_dot(&graph, &RenderStyle::default()).unwrap_err();
        assert!(matches!(err, RenderError::UnknownElement(e) if e == "Xx"));
    }

    #[test]
    fn test_empty_graph_still_renders_dot() {
        let graph = MoleculeGraph::new_undirected();
        let dot = generate_dot(&graph, &RenderStyle::default()).unwrap();
        assert!(dot.starts_with("graph molecule {"));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_parsed_table_draws_without_hydrogens() {
        let table = "ethanol fragment
  molgraph

  4  3  0  0  0  0  0  0  0  0999 V2000
    0.0000    0.0000    0.0000 C   0  0  0  0  0  0
    1.0000    0.0000    0.0000 C   0  0  0  0  0  0
    2.0000    0.0000    0.0000 O   0  0  0  0  0  0
    2.5000    0.0000    0.0000 H   0  0  0  0  0  0
  1  2  1  0
  2  3  1  0
  3  4  1  0
M  END
";
        let lines: Vec<String> = table.lines().map(str::to_owned).collect();
        let (elements, bonds) = crate::parse_sdf(&lines, false).unwrap();
        let graph = create_graph(&elements, &bonds).unwrap();
        let dot = generate_dot(&graph, &RenderStyle::default()).unwrap();

        assert!(!dot.contains("label=\"H\""));
        assert!(dot.contains("label=\"C\""));
        assert!(dot.contains("label=\"O\""));
        // C-C and C-O survive the hydrogen filter.
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn test_color_map_override_replaces_default() {
        let mut style = RenderStyle::default();
        style
            .colors
            .insert("Fe".to_string(), "orange".to_string());
        let elements = vec!["Fe".to_string()];
        let graph = create_graph(&elements, &[]).unwrap();
        let dot = generate_dot(&graph, &style).unwrap();
        assert!(dot.contains("fillcolor=\"orange\""));
    }
}
