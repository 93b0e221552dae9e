//! CSV output and generation statistics

use crate::error::Result;
use crate::generator::Dataset;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use supply_core::{Criticality, DataConfig};
use tracing::info;

const SUPPLIER_HEADERS: [&str; 5] = [
    "supplier_id",
    "supplier_name",
    "country",
    "city",
    "industry_type",
];
const MATERIAL_HEADERS: [&str; 4] = [
    "material_id",
    "material_name",
    "supplied_by_id",
    "criticality_level",
];

/// Summary of a generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub suppliers_path: PathBuf,
    pub materials_path: PathBuf,
    pub suppliers_written: usize,
    pub materials_written: usize,
    /// Distinct supplier ids referenced by at least one material
    pub suppliers_referenced: usize,
    pub criticality_counts: BTreeMap<Criticality, usize>,
}

impl GenerationReport {
    /// Share of materials at `level`, in percent
    pub fn criticality_share(&self, level: Criticality) -> f64 {
        if self.materials_written == 0 {
            return 0.0;
        }
        let count = self.criticality_counts.get(&level).copied().unwrap_or(0);
        count as f64 / self.materials_written as f64 * 100.0
    }
}

/// Write both tables, replacing any existing files
pub fn write_dataset(dataset: &Dataset, data: &DataConfig) -> Result<GenerationReport> {
    fs::create_dir_all(&data.data_dir)?;

    let suppliers_path = data.suppliers_path();
    let materials_path = data.materials_path();
    write_rows(&suppliers_path, &SUPPLIER_HEADERS, &dataset.suppliers)?;
    write_rows(&materials_path, &MATERIAL_HEADERS, &dataset.materials)?;

    let report = summarize(dataset, suppliers_path, materials_path);
    info!(
        suppliers = report.suppliers_written,
        materials = report.materials_written,
        referenced = report.suppliers_referenced,
        dir = %data.data_dir.display(),
        "Wrote synthetic tables"
    );
    Ok(report)
}

fn write_rows<T: Serialize>(path: &Path, headers: &[&str], rows: &[T]) -> Result<()> {
    // Header written by hand so an empty table still gets one
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(headers)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn summarize(dataset: &Dataset, suppliers_path: PathBuf, materials_path: PathBuf) -> GenerationReport {
    let suppliers_referenced = dataset
        .materials
        .iter()
        .map(|m| m.supplied_by_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let mut criticality_counts = BTreeMap::new();
    for material in &dataset.materials {
        *criticality_counts.entry(material.criticality_level).or_insert(0) += 1;
    }

    GenerationReport {
        suppliers_path,
        materials_path,
        suppliers_written: dataset.suppliers.len(),
        materials_written: dataset.materials.len(),
        suppliers_referenced,
        criticality_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SyntheticGenerator;
    use supply_core::GeneratorConfig;

    fn dataset(suppliers: usize, materials: usize) -> Dataset {
        let config = GeneratorConfig::default()
            .with_counts(suppliers, materials)
            .with_seed(3);
        SyntheticGenerator::new(config).unwrap().generate().unwrap()
    }

    #[test]
    fn test_writes_headers_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataConfig::default().with_data_dir(dir.path().join("data"));

        let report = write_dataset(&dataset(10, 25), &data).unwrap();
        assert_eq!(report.suppliers_written, 10);
        assert_eq!(report.materials_written, 25);

        let suppliers = fs::read_to_string(data.suppliers_path()).unwrap();
        assert!(suppliers.starts_with("supplier_id,supplier_name,country,city,industry_type\n"));
        assert_eq!(suppliers.lines().count(), 11);

        let materials = fs::read_to_string(data.materials_path()).unwrap();
        assert!(materials.starts_with("material_id,material_name,supplied_by_id,criticality_level\n"));
        assert_eq!(materials.lines().count(), 26);
    }

    #[test]
    fn test_rerun_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataConfig::default().with_data_dir(dir.path());

        write_dataset(&dataset(10, 50), &data).unwrap();
        write_dataset(&dataset(5, 5), &data).unwrap();

        let materials = fs::read_to_string(data.materials_path()).unwrap();
        assert_eq!(materials.lines().count(), 6);
    }

    #[test]
    fn test_empty_tables_keep_headers() {
        let dir = tempfile::tempdir().unwrap();
        let data = DataConfig::default().with_data_dir(dir.path());

        write_dataset(&dataset(0, 0), &data).unwrap();
        let materials = fs::read_to_string(data.materials_path()).unwrap();
        assert_eq!(materials.trim_end(), MATERIAL_HEADERS.join(","));
    }

    #[test]
    fn test_report_statistics() {
        let data = dataset(4, 400);
        let report = summarize(&data, PathBuf::new(), PathBuf::new());

        assert!(report.suppliers_referenced <= 4);
        assert_eq!(report.criticality_counts.values().sum::<usize>(), 400);
        let total: f64 = Criticality::ALL
            .iter()
            .map(|level| report.criticality_share(*level))
            .sum();
        assert!((total - 100.0).abs() < 1e-9);
    }
}
