use std::str::FromStr;

use petgraph::graph::UnGraph;
use tracing::level_filters::LevelFilter;

mod retrieve;
pub use retrieve::*;

mod parse;
pub use parse::*;

mod graph;
pub use graph::*;

mod visualize;
pub use visualize::*;

/// An atom as it appears in the connection table: its 0-based position in
/// the atom block plus its element symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    pub index: usize,
    pub element: String,
}

/// A bond between two atoms. `from` and `to` are 0-based positions into the
/// atom sequence the bond was parsed alongside; `order` is the table's
/// integer bond order (1 = single, 2 = double, 3 = triple).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub from: usize,
    pub to: usize,
    pub order: u8,
}

pub type MoleculeGraph = UnGraph<Atom, u8>;

/// Install a global log subscriber at the given level ("trace", "debug",
/// "info", ...). Safe to call more than once; later calls are no-ops.
pub fn init_logging(level: &str) {
    let filter = LevelFilter::from_str(level).unwrap_or(LevelFilter::INFO);
    let _ = tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .try_init();
}
