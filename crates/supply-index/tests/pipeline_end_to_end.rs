//! Generate synthetic tables, index them, and query the index

use std::collections::HashMap;
use std::sync::Arc;
use supply_core::{Criticality, DataConfig, GeneratorConfig, IndexConfig};
use supply_datagen::{SyntheticGenerator, write_dataset};
use supply_index::{HashingEmbedder, IndexPipeline, LocalVectorStore, VectorStore, load_materials};

#[tokio::test]
async fn test_generate_index_query() {
    let dir = tempfile::tempdir().unwrap();
    let data = DataConfig::default().with_data_dir(dir.path().join("data"));
    let index = IndexConfig::default().with_db_dir(dir.path().join("db"));

    let generator_config = GeneratorConfig::default().with_counts(50, 50).with_seed(2024);
    let dataset = SyntheticGenerator::new(generator_config)
        .unwrap()
        .generate()
        .unwrap();
    let generated = write_dataset(&dataset, &data).unwrap();
    assert_eq!(generated.materials_written, 50);

    let store = Arc::new(
        LocalVectorStore::open(&index.db_dir, Arc::new(HashingEmbedder::default()))
            .await
            .unwrap(),
    );
    let report = IndexPipeline::new(index.clone(), store.clone())
        .unwrap()
        .build(&data)
        .await
        .unwrap();
    assert_eq!(report.documents, 50);
    assert_eq!(report.dangling, 0);
    assert_eq!(report.total_entries, report.segments_indexed);

    // A fresh handle reads what the pipeline persisted
    let reopened = LocalVectorStore::open(&index.db_dir, Arc::new(HashingEmbedder::default()))
        .await
        .unwrap();
    let results = reopened
        .similarity_search("microchips with high criticality", 3)
        .await
        .unwrap();
    assert_eq!(results.len(), 3);

    let truth: HashMap<String, Criticality> = load_materials(&data.materials_path())
        .unwrap()
        .into_iter()
        .map(|m| (m.material_id, m.criticality_level))
        .collect();

    for result in &results {
        let metadata = &result.segment.metadata;
        let material_id = metadata
            .material_id_from_source()
            .expect("source locator carries a material id");
        assert_eq!(material_id, metadata.material_id);
        assert_eq!(metadata.criticality_level, truth.get(material_id).copied());
        assert!(
            result
                .segment
                .content
                .contains(&format!("is a {} criticality", truth[material_id]))
        );
    }
    assert!(results.windows(2).all(|w| w[0].score >= w[1].score));
}
