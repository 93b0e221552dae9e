//! Left join of materials to suppliers and description rendering

use std::collections::HashMap;
use supply_core::{DanglingSupplierPolicy, EnrichedDocument, Material, SegmentMetadata, Supplier};
use tracing::{debug, warn};

const PLACEHOLDER: &str = "Unknown";

/// Documents produced by a join plus its bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enrichment {
    pub documents: Vec<EnrichedDocument>,
    /// Materials whose supplier id matched no supplier
    pub dangling: usize,
    /// Materials dropped under [`DanglingSupplierPolicy::Exclude`]
    pub excluded: usize,
}

/// Supplier fields as they appear in a rendered description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SupplierFields<'a> {
    id: &'a str,
    name: &'a str,
    city: &'a str,
    country: &'a str,
    industry: &'a str,
}

impl<'a> SupplierFields<'a> {
    fn resolved(supplier: &'a Supplier) -> Self {
        Self {
            id: &supplier.supplier_id,
            name: &supplier.supplier_name,
            city: &supplier.city,
            country: &supplier.country,
            industry: &supplier.industry_type,
        }
    }

    fn blank() -> Self {
        Self {
            id: "",
            name: "",
            city: "",
            country: "",
            industry: "",
        }
    }

    fn placeholder(dangling_id: &'a str) -> Self {
        Self {
            id: dangling_id,
            name: PLACEHOLDER,
            city: PLACEHOLDER,
            country: PLACEHOLDER,
            industry: PLACEHOLDER,
        }
    }
}

/// Render the fixed description sentence for a material.
///
/// `supplier` is `None` for a dangling reference; its fields then render as empty strings.
pub fn render_description(material: &Material, supplier: Option<&Supplier>) -> String {
    let fields = supplier.map_or_else(SupplierFields::blank, SupplierFields::resolved);
    render(material, fields)
}

fn render(material: &Material, supplier: SupplierFields<'_>) -> String {
    format!(
        "Material '{}' (ID: {}) is a {} criticality component. It is supplied by '{}' (ID: {}) from {}, {}, which is in the {} industry.",
        material.material_name,
        material.material_id,
        material.criticality_level,
        supplier.name,
        supplier.id,
        supplier.city,
        supplier.country,
        supplier.industry,
    )
}

/// Left-join `materials` to `suppliers` on `supplied_by_id`.
///
/// Output keeps the material order. The join itself never fails; unresolved rows are
/// handled by `policy`. `source_name` prefixes each document's source locator.
pub fn enrich(
    materials: &[Material],
    suppliers: &[Supplier],
    policy: DanglingSupplierPolicy,
    source_name: &str,
) -> Enrichment {
    let mut by_id: HashMap<&str, &Supplier> = HashMap::with_capacity(suppliers.len());
    for supplier in suppliers {
        if by_id.contains_key(supplier.supplier_id.as_str()) {
            warn!(supplier_id = %supplier.supplier_id, "Duplicate supplier id, keeping the first row");
            continue;
        }
        by_id.insert(&supplier.supplier_id, supplier);
    }

    let mut outcome = Enrichment::default();
    for material in materials {
        let supplier = by_id.get(material.supplied_by_id.as_str()).copied();

        let fields = match (supplier, policy) {
            (Some(supplier), _) => SupplierFields::resolved(supplier),
            (None, DanglingSupplierPolicy::Blank) => SupplierFields::blank(),
            (None, DanglingSupplierPolicy::Placeholder) => {
                SupplierFields::placeholder(&material.supplied_by_id)
            }
            (None, DanglingSupplierPolicy::Exclude) => {
                warn!(
                    material_id = %material.material_id,
                    supplied_by_id = %material.supplied_by_id,
                    "Skipping material with unknown supplier"
                );
                outcome.dangling += 1;
                outcome.excluded += 1;
                continue;
            }
        };
        if supplier.is_none() {
            outcome.dangling += 1;
        }

        let metadata = SegmentMetadata {
            source: SegmentMetadata::source_locator(source_name, &material.material_id),
            material_id: material.material_id.clone(),
            material_name: material.material_name.clone(),
            criticality_level: Some(material.criticality_level),
            supplier_id: material.supplied_by_id.clone(),
            supplier_name: fields.name.to_string(),
            supplier_resolved: supplier.is_some(),
            chunk_index: 0,
        };
        outcome.documents.push(EnrichedDocument {
            description: render(material, fields),
            metadata,
        });
    }

    debug!(
        documents = outcome.documents.len(),
        dangling = outcome.dangling,
        excluded = outcome.excluded,
        "Enriched materials"
    );
    outcome
}
