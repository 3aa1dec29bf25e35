use thiserror::Error;
use tracing::{debug, trace};

use crate::Bond;

// V2000 connection-table layout. These offsets are the format's contract,
// not tunables.
/// 0-based line index of the counts line.
const COUNTS_LINE: usize = 3;
/// 0-based line index of the first atom record.
const ATOM_BLOCK_START: usize = 4;
/// Whitespace-separated token of an atom record holding the element symbol.
const ELEMENT_TOKEN: usize = 3;
/// The element removed by the default hydrogen filter.
const HYDROGEN: &str = "H";

#[derive(Error, Debug)]
pub enum MalformedStructureError {
    #[error("table has {0} lines, too short to hold a counts line")]
    MissingCountsLine(usize),
    #[error("counts line {0:?} does not start with atom and bond counts")]
    BadCountsLine(String),
    #[error("table declares {expected} {kind} records but holds only {actual}")]
    TruncatedBlock {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("atom record at line {0} has no element field")]
    ShortAtomRecord(usize),
    #[error("bond record at line {0} does not hold two endpoints and an order")]
    BadBondRecord(usize),
    #[error("bond record at line {line} references atom {index} outside 1..={atoms}")]
    BondOutOfRange {
        line: usize,
        index: usize,
        atoms: usize,
    },
}

/// Parses the atom and bond blocks of an SDF connection table.
///
/// Returns the element symbols in table order and the bonds with 0-based
/// endpoints. Unless `include_hydrogen` is set, hydrogen atoms are dropped
/// along with every bond touching one, and the surviving bond endpoints are
/// renumbered against the filtered atom list, so they are always valid
/// positions into the returned sequence.
///
/// Anything after the bond block (properties, `M  END`, further records of a
/// multi-record file) is ignored.
pub fn parse_sdf(
    lines: &[String],
    include_hydrogen: bool,
) -> Result<(Vec<String>, Vec<Bond>), MalformedStructureError> {
    if lines.len() <= COUNTS_LINE {
        return Err(MalformedStructureError::MissingCountsLine(lines.len()));
    }

    let (num_atoms, num_bonds) = parse_counts(&lines[COUNTS_LINE])?;
    trace!("counts line declares {num_atoms} atoms, {num_bonds} bonds");

    let atom_end = ATOM_BLOCK_START + num_atoms;
    let bond_end = atom_end + num_bonds;
    if lines.len() < atom_end {
        return Err(MalformedStructureError::TruncatedBlock {
            kind: "atom",
            expected: num_atoms,
            actual: lines.len() - ATOM_BLOCK_START,
        });
    }
    if lines.len() < bond_end {
        return Err(MalformedStructureError::TruncatedBlock {
            kind: "bond",
            expected: num_bonds,
            actual: lines.len() - atom_end,
        });
    }

    let mut elements = Vec::with_capacity(num_atoms);
    for (i, line) in lines[ATOM_BLOCK_START..atom_end].iter().enumerate() {
        elements.push(parse_atom_record(line, ATOM_BLOCK_START + i + 1)?);
    }

    let mut bonds = Vec::with_capacity(num_bonds);
    for (i, line) in lines[atom_end..bond_end].iter().enumerate() {
        bonds.push(parse_bond_record(line, atom_end + i + 1, num_atoms)?);
    }

    if !include_hydrogen {
        filter_hydrogens(&mut elements, &mut bonds);
    }

    debug!("parsed {} atoms and {} bonds", elements.len(), bonds.len());
    Ok((elements, bonds))
}

fn parse_counts(line: &str) -> Result<(usize, usize), MalformedStructureError> {
    let bad = || MalformedStructureError::BadCountsLine(line.to_string());
    let mut tokens = line.split_whitespace();
    let num_atoms = tokens
        .next()
        .and_then(|t| t.parse::<usize>().ok())
        .ok_or_else(bad)?;
    let num_bonds = tokens
        .next()
        .and_then(|t| t.parse::<usize>().ok())
        .ok_or_else(bad)?;
    Ok((num_atoms, num_bonds))
}

fn parse_atom_record(line: &str, line_no: usize) -> Result<String, MalformedStructureError> {
    line.split_whitespace()
        .nth(ELEMENT_TOKEN)
        .map(str::to_owned)
        .ok_or(MalformedStructureError::ShortAtomRecord(line_no))
}

fn parse_bond_record(
    line: &str,
    line_no: usize,
    num_atoms: usize,
) -> Result<Bond, MalformedStructureError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(MalformedStructureError::BadBondRecord(line_no));
    }

    // Table endpoints are 1-based serial numbers.
    let endpoint = |token: &str| {
        let n = token
            .parse::<usize>()
            .map_err(|_| MalformedStructureError::BadBondRecord(line_no))?;
        if n == 0 || n > num_atoms {
            return Err(MalformedStructureError::BondOutOfRange {
                line: line_no,
                index: n,
                atoms: num_atoms,
            });
        }
        Ok(n - 1)
    };

    let from = endpoint(tokens[0])?;
    let to = endpoint(tokens[1])?;
    let order = tokens[2]
        .parse::<u8>()
        .map_err(|_| MalformedStructureError::BadBondRecord(line_no))?;

    Ok(Bond { from, to, order })
}

/// Drops hydrogen atoms and every bond touching one. Bonds are filtered
/// first, while their endpoints still reference positions in the unfiltered
/// atom list, then the survivors are renumbered against the filtered list.
fn filter_hydrogens(elements: &mut Vec<String>, bonds: &mut Vec<Bond>) {
    bonds.retain(|b| elements[b.from] != HYDROGEN && elements[b.to] != HYDROGEN);

    let mut remap = vec![usize::MAX; elements.len()];
    let mut next = 0;
    for (i, element) in elements.iter().enumerate() {
        if element != HYDROGEN {
            remap[i] = next;
            next += 1;
        }
    }

    elements.retain(|e| e != HYDROGEN);
    for bond in bonds.iter_mut() {
        bond.from = remap[bond.from];
        bond.to = remap[bond.to];
    }
}
