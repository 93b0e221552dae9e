//! Subcommand implementations

use crate::cli::{NewsArgs, QueryArgs, RunArgs};
use crate::console::ConsoleEventHandler;
use anyhow::Context;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use std::sync::Arc;
use supply_agent::{RiskAnalyst, RunStatus};
use supply_core::{AppConfig, Criticality};
use supply_datagen::{SyntheticGenerator, write_dataset};
use supply_index::{IndexPipeline, LocalVectorStore, VectorStore, build_embedder};
use supply_tools::format::{format_headlines, format_retrieval};
use supply_tools::{NO_NEWS_FOUND, NO_SUPPLY_MATCH, NewsScanner, Retrieval, RetrievalMode, SupplyChainRetriever};
use tracing::info;

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

async fn open_store(config: &AppConfig) -> anyhow::Result<Arc<dyn VectorStore>> {
    let embedder = build_embedder(&config.embedding)
        .await
        .context("failed to create the embedding backend")?;
    let store = LocalVectorStore::open(&config.index.db_dir, embedder)
        .await
        .with_context(|| format!("failed to open the index at {}", config.index.db_dir.display()))?;
    Ok(Arc::new(store))
}

pub fn generate(config: &AppConfig) -> anyhow::Result<()> {
    let dataset = SyntheticGenerator::new(config.generator.clone())?.generate()?;
    let report = write_dataset(&dataset, &config.data)?;

    let mut files = table(vec!["File", "Rows"]);
    files.add_row(vec![report.suppliers_path.display().to_string(), report.suppliers_written.to_string()]);
    files.add_row(vec![report.materials_path.display().to_string(), report.materials_written.to_string()]);
    println!("{files}");

    let mut levels = table(vec!["Criticality", "Materials", "Share"]);
    for level in Criticality::ALL {
        let count = report.criticality_counts.get(&level).copied().unwrap_or(0);
        levels.add_row(vec![
            level.to_string(),
            count.to_string(),
            format!("{:.1}%", report.criticality_share(level)),
        ]);
    }
    println!("{levels}");
    println!(
        "{} of {} suppliers are referenced by at least one material.",
        report.suppliers_referenced, report.suppliers_written
    );
    Ok(())
}

pub async fn index(config: &AppConfig) -> anyhow::Result<()> {
    let store = open_store(config).await?;
    let report = IndexPipeline::new(config.index.clone(), store)?
        .build(&config.data)
        .await
        .context("index build failed")?;

    let mut summary = table(vec!["Suppliers", "Materials", "Documents", "Dangling", "Excluded", "Segments", "Index size", "Mode"]);
    summary.add_row(vec![
        report.suppliers_read.to_string(),
        report.materials_read.to_string(),
        report.documents.to_string(),
        report.dangling.to_string(),
        report.excluded.to_string(),
        report.segments_indexed.to_string(),
        report.total_entries.to_string(),
        format!("{:?}", report.write_policy).to_lowercase(),
    ]);
    println!("{summary}");
    Ok(())
}

pub async fn query(config: &AppConfig, args: &QueryArgs) -> anyhow::Result<()> {
    let mode = RetrievalMode::from_top_k(config.retrieval.top_k);
    let retrieval = SupplyChainRetriever::new(open_store(config).await?)
        .query(&args.query, mode.k())
        .await?;

    if args.tool_output {
        println!("{}", format_retrieval(&retrieval, mode));
        return Ok(());
    }

    match &retrieval {
        Retrieval::NoMatches => println!("{NO_SUPPLY_MATCH}"),
        Retrieval::Matches(matches) => {
            let mut results = table(vec!["#", "Score", "Source", "Criticality", "Content"]);
            for (rank, m) in matches.iter().enumerate() {
                results.add_row(vec![
                    (rank + 1).to_string(),
                    format!("{:.3}", m.score),
                    m.segment.metadata.source.clone(),
                    m.segment.metadata.criticality_label().to_string(),
                    m.segment.content.clone(),
                ]);
            }
            println!("{results}");
        }
    }
    Ok(())
}

pub async fn news(config: &AppConfig, args: &NewsArgs) -> anyhow::Result<()> {
    let scanner = NewsScanner::from_config(&config.news);
    let articles = scanner.scan(&args.query).await;
    if articles.is_empty() {
        println!("{NO_NEWS_FOUND}");
        return Ok(());
    }

    let mut headlines = table(vec!["Title", "Source", "Published", "URL"]);
    for article in &articles {
        headlines.add_row(vec![
            article.title.clone(),
            article.source.clone().unwrap_or_default(),
            article.published_at.clone().unwrap_or_default(),
            article.url.clone(),
        ]);
    }
    println!("{headlines}");
    info!(text = %format_headlines(&articles), "News tool text");
    Ok(())
}

pub async fn run(config: &AppConfig, args: &RunArgs) -> anyhow::Result<()> {
    let analyst = RiskAnalyst::from_config(config)
        .await
        .context("failed to set up the risk analyst (is OPENROUTER_API_KEY set?)")?
        .with_event_handler(Arc::new(ConsoleEventHandler {
            show_observations: !args.json,
        }));

    println!("\n--- Running Supply Chain Agent ({}) ---\n", config.llm.model);
    let run = match &args.task {
        Some(task) => analyst.run(task).await?,
        None => analyst.run_master_task().await?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&run)?);
        return Ok(());
    }

    if run.status == RunStatus::IterationLimit {
        eprintln!("Stopped after {} iterations without a final answer.", run.iterations);
    }
    println!("Final Answer:\n{}", run.answer);
    Ok(())
}
