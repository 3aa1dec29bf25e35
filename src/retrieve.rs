use bio_apis::pubchem::{self, StructureSearchNamespace};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("molecule name must not be empty")]
    EmptyName,
    #[error("PubChem lookup for {name:?} failed: {details}")]
    Lookup { name: String, details: String },
}

/// Fetch the SDF text for a molecule from PubChem, looked up by name, and
/// split it into lines.
///
/// A single attempt is made; any lookup failure (unknown name, non-success
/// status, unreachable network) is surfaced immediately.
pub fn retrieve_sdf(molecule_name: &str) -> Result<Vec<String>, RetrievalError> {
    if molecule_name.trim().is_empty() {
        return Err(RetrievalError::EmptyName);
    }

    debug!("requesting SDF for {molecule_name:?} from PubChem");
    let text = pubchem::load_sdf(StructureSearchNamespace::Name, molecule_name).map_err(|e| {
        RetrievalError::Lookup {
            name: molecule_name.to_string(),
            details: format!("{e:?}"),
        }
    })?;
    debug!("received {} bytes", text.len());

    Ok(text.lines().map(str::to_owned).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_rejected() {
        assert!(matches!(retrieve_sdf(""), Err(RetrievalError::EmptyName)));
        assert!(matches!(retrieve_sdf("  "), Err(RetrievalError::EmptyName)));
    }
}
