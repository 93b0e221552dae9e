//! Random supplier and material rows

use crate::error::{DatagenError, Result};
use crate::vocab::{
    COMPANY_TYPES, COUNTRY_CITIES, DESCRIPTIVE_TERMS, INDUSTRIES, MATERIAL_CATEGORIES,
    MATERIAL_PREFIXES, MATERIAL_SUFFIXES, NAME_WORDS, PART_NUMBER_SHARE,
};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use supply_core::{Criticality, GeneratorConfig, Material, Supplier};
use tracing::{debug, info};

/// Both generated tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub suppliers: Vec<Supplier>,
    pub materials: Vec<Material>,
}

/// Seedable generator for the supplier and material tables
pub struct SyntheticGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    criticality: WeightedIndex<f64>,
}

impl SyntheticGenerator {
    /// Create a generator. A configured seed makes the output reproducible.
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let criticality = WeightedIndex::new(config.criticality_weights.as_array())
            .map_err(|e| DatagenError::InvalidConfig(format!("criticality weights: {e}")))?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            rng,
            criticality,
        })
    }

    /// Generate suppliers then materials referencing them
    pub fn generate(&mut self) -> Result<Dataset> {
        let suppliers = self.generate_suppliers();
        let ids: Vec<String> = suppliers.iter().map(|s| s.supplier_id.clone()).collect();
        let materials = self.generate_materials(&ids)?;

        info!(
            suppliers = suppliers.len(),
            materials = materials.len(),
            seed = ?self.config.seed,
            "Generated synthetic dataset"
        );
        Ok(Dataset {
            suppliers,
            materials,
        })
    }

    pub fn generate_suppliers(&mut self) -> Vec<Supplier> {
        (1..=self.config.supplier_count)
            .map(|n| {
                let first = self.pick(NAME_WORDS);
                let mut second = self.pick(NAME_WORDS);
                while second == first {
                    second = self.pick(NAME_WORDS);
                }
                let company_type = self.pick(COMPANY_TYPES);
                let (country, cities) = COUNTRY_CITIES[self.rng.gen_range(0..COUNTRY_CITIES.len())];
                let city = self.pick(cities);

                Supplier {
                    supplier_id: format_id('S', n),
                    supplier_name: format!("{first} {second} {company_type}"),
                    country: country.to_string(),
                    city: city.to_string(),
                    industry_type: self.pick(INDUSTRIES).to_string(),
                }
            })
            .collect()
    }

    /// Generate materials, each referencing one of `supplier_ids` chosen uniformly
    pub fn generate_materials(&mut self, supplier_ids: &[String]) -> Result<Vec<Material>> {
        if supplier_ids.is_empty() && self.config.material_count > 0 {
            return Err(DatagenError::NoSuppliers);
        }

        let materials: Vec<Material> = (1..=self.config.material_count)
            .map(|n| {
                let (_, types) =
                    MATERIAL_CATEGORIES[self.rng.gen_range(0..MATERIAL_CATEGORIES.len())];
                let material_type = self.pick(types);
                let material_name = self.material_name(material_type);
                let supplied_by_id = supplier_ids[self.rng.gen_range(0..supplier_ids.len())].clone();
                let criticality_level = Criticality::ALL[self.criticality.sample(&mut self.rng)];

                Material {
                    material_id: format_id('M', n),
                    material_name,
                    supplied_by_id,
                    criticality_level,
                }
            })
            .collect();

        debug!(count = materials.len(), "Generated materials");
        Ok(materials)
    }

    fn material_name(&mut self, material_type: &str) -> String {
        if self.rng.gen_bool(PART_NUMBER_SHARE) {
            let prefix = self.pick(MATERIAL_PREFIXES);
            let number = self.rng.gen_range(1..=999);
            let suffix = self.pick(MATERIAL_SUFFIXES);
            format!("{prefix}-{number}{suffix} {material_type}")
        } else {
            format!("{} {material_type}", self.pick(DESCRIPTIVE_TERMS))
        }
    }

    fn pick(&mut self, items: &'static [&'static str]) -> &'static str {
        items[self.rng.gen_range(0..items.len())]
    }
}

/// `S001`, `M042`, `S1000`: the prefix plus a number padded to at least three digits
fn format_id(prefix: char, n: usize) -> String {
    format!("{prefix}{n:03}")
}
