//! CSV loading for the supplier and material tables

use crate::error::{IndexError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;
use supply_core::{Material, Supplier};
use tracing::debug;

/// Read `suppliers.csv`
pub fn load_suppliers(path: &Path) -> Result<Vec<Supplier>> {
    load_rows(path)
}

/// Read `materials.csv`. An unknown criticality label fails with the offending row.
pub fn load_materials(path: &Path) -> Result<Vec<Material>> {
    load_rows(path)
}

fn load_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let csv_err = |source| IndexError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(csv_err)?;

    debug!(path = %path.display(), rows = rows.len(), "Loaded CSV");
    Ok(rows)
}
