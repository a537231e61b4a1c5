//! Input disease list loader.

use std::path::Path;

use rarerank_common::DiseaseIdentity;
use tracing::{info, warn};

use crate::error::{DataError, Result};
use crate::ordered::OrderedIdSet;

/// Read a JSON array of `{orpha_code, disease_name}`. Repeated codes are
/// dropped (first occurrence wins).
pub fn load_disease_list(path: &Path) -> Result<Vec<DiseaseIdentity>> {
    let content = std::fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let diseases: Vec<DiseaseIdentity> =
        serde_json::from_str(&content).map_err(|source| DataError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let total = diseases.len();
    let unique = dedup_by_code(diseases);
    if unique.len() < total {
        warn!(
            dropped = total - unique.len(),
            "Duplicate ORPHA codes in disease list"
        );
    }
    info!("Loaded {} diseases from {:?}", unique.len(), path);
    Ok(unique)
}

fn dedup_by_code(diseases: Vec<DiseaseIdentity>) -> Vec<DiseaseIdentity> {
    let mut seen = OrderedIdSet::new();
    diseases
        .into_iter()
        .filter(|d| seen.insert(d.orpha_code.clone()))
        .collect()
}
