use thiserror::Error;
use tracing::debug;

use crate::{Atom, Bond, MoleculeGraph};

#[derive(Error, Debug)]
#[error("bond ({from}, {to}) references an atom outside the {atoms} parsed atoms")]
pub struct GraphConstructionError {
    pub from: usize,
    pub to: usize,
    pub atoms: usize,
}

/// Builds an undirected molecule graph: one node per atom, weighted with its
/// `(index, element)` identity, and one edge per bond, weighted with the bond
/// order. Parallel bonds between the same pair of atoms become parallel
/// edges.
pub fn create_graph(
    elements: &[String],
    bonds: &[Bond],
) -> Result<MoleculeGraph, GraphConstructionError> {
    let mut graph = MoleculeGraph::new_undirected();

    let nodes: Vec<_> = elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            graph.add_node(Atom {
                index,
                element: element.clone(),
            })
        })
        .collect();

    for bond in bonds {
        if bond.from >= nodes.len() || bond.to >= nodes.len() {
            return Err(GraphConstructionError {
                from: bond.from,
                to: bond.to,
                atoms: nodes.len(),
            });
        }
        graph.add_edge(nodes[bond.from], nodes[bond.to], bond.order);
    }

    debug!(
        "assembled graph with {} nodes and {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}
