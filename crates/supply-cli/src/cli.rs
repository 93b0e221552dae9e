//! Command-line arguments

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use supply_core::{
    AppConfig, DanglingSupplierPolicy, EmbeddingBackend, StrategyKind, WritePolicy,
};

#[derive(Parser, Debug)]
#[command(name = "supply-risk")]
#[command(about = "Supply-chain risk analyst: synthetic data, vector index and news-driven agent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding suppliers.csv and materials.csv
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Directory holding the vector index
    #[arg(long, global = true)]
    pub db_dir: Option<PathBuf>,

    /// Embedding backend: hashing, openai or minilm
    #[arg(long, global = true)]
    pub embedding: Option<EmbeddingBackend>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = supply_core::logging::DEFAULT_DIRECTIVE)]
    pub log: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate synthetic supplier and material tables
    Generate(GenerateArgs),
    /// Build the vector index from the tables
    Index(IndexArgs),
    /// Query the supply-chain index directly
    Query(QueryArgs),
    /// Scan the news API for disruption headlines
    News(NewsArgs),
    /// Run the risk analyst agent
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Number of suppliers
    #[arg(long)]
    pub suppliers: Option<usize>,

    /// Number of materials
    #[arg(long)]
    pub materials: Option<usize>,

    /// Seed for a reproducible dataset
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Args, Debug)]
pub struct IndexArgs {
    /// Clear the index before writing instead of appending
    #[arg(long)]
    pub replace: bool,

    /// Treatment of materials whose supplier is missing: blank, placeholder or exclude
    #[arg(long)]
    pub dangling: Option<DanglingSupplierPolicy>,
}

#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Location, company or material to look up
    pub query: String,

    /// Number of matches
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Print the text the agent's retriever tool would return
    #[arg(long)]
    pub tool_output: bool,
}

#[derive(Args, Debug)]
pub struct NewsArgs {
    /// Search term
    pub query: String,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Task for the agent; defaults to the standing risk-analysis mission
    #[arg(long)]
    pub task: Option<String>,

    /// News query the standing mission starts from
    #[arg(long)]
    pub news_query: Option<String>,

    /// Decision strategy: react or function_calling
    #[arg(long)]
    pub strategy: Option<StrategyKind>,

    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Print the full run, including every step, as JSON
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Fold command-line overrides into `config`
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            config.data.data_dir.clone_from(dir);
        }
        if let Some(dir) = &self.db_dir {
            config.index.db_dir.clone_from(dir);
        }
        if let Some(backend) = self.embedding {
            config.embedding.backend = backend;
        }

        match &self.command {
            Commands::Generate(args) => {
                if let Some(n) = args.suppliers {
                    config.generator.supplier_count = n;
                }
                if let Some(n) = args.materials {
                    config.generator.material_count = n;
                }
                if args.seed.is_some() {
                    config.generator.seed = args.seed;
                }
            }
            Commands::Index(args) => {
                if args.replace {
                    config.index.write_policy = WritePolicy::Replace;
                }
                if let Some(policy) = args.dangling {
                    config.index.dangling_policy = policy;
                }
            }
            Commands::Query(args) => {
                if let Some(k) = args.top_k {
                    config.retrieval.top_k = k;
                }
            }
            Commands::News(_) => {}
            Commands::Run(args) => {
                if let Some(query) = &args.news_query {
                    config.agent.news_query.clone_from(query);
                }
                if let Some(strategy) = args.strategy {
                    config.agent.strategy = strategy;
                }
                if let Some(n) = args.max_iterations {
                    config.agent.max_iterations = n;
                }
                if let Some(model) = &args.model {
                    config.llm.model.clone_from(model);
                }
            }
        }
    }
}
