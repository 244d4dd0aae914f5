use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use retrieval::{open_source, DocumentStore, RecordSchema, Retriever, SharedRetriever, DEFAULT_TOP_K};
use std::path::{Path, PathBuf};
use tools::{default_registry, HttpConfig};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "galactl")]
#[command(about = "Query the gala guest corpus and run agent tools", long_about = None)]
struct Cli {
    /// Guest corpus: a .json/.jsonl file or a directory of them
    #[arg(long, global = true, env = "GALA_CORPUS", default_value = "./data/guests.jsonl")]
    corpus: PathBuf,
    /// Record schema: "guest" or "text:<field>[:<id_field>]"
    #[arg(long, global = true, env = "GALA_SCHEMA", default_value = "guest")]
    schema: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank guest profiles against a free-text query
    Retrieve {
        #[arg(long)]
        query: String,
        #[arg(long, default_value_t = DEFAULT_TOP_K)]
        k: usize,
        /// Print scores instead of the tool output
        #[arg(long, default_value_t = false)]
        scores: bool,
    },
    /// Print one guest profile by id
    Lookup {
        #[arg(long)]
        id: String,
    },
    /// Corpus and index statistics
    Stats,
    /// Print tool descriptors as JSON
    Tools,
    /// Invoke a tool with JSON arguments
    Call {
        #[arg(long)]
        tool: String,
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Retrieve { query, k, scores } => {
            let retriever = load(&cli.corpus, &cli.schema)?;
            if scores {
                for hit in retriever.search(&query, k)? {
                    println!("{:>8.4}  {}", hit.score, hit.document.id);
                }
            } else {
                println!("{}", retriever.retrieve(&query, k)?);
            }
        }
        Commands::Lookup { id } => {
            let retriever = load(&cli.corpus, &cli.schema)?;
            println!("{}", retriever.lookup(&id)?.text);
        }
        Commands::Stats => {
            let retriever = load(&cli.corpus, &cli.schema)?;
            let index = retriever.index();
            println!("documents:   {}", index.num_docs());
            println!("vocabulary:  {}", index.vocabulary_len());
            println!("avg length:  {:.2}", index.avg_doc_len());
        }
        Commands::Tools => {
            let registry = default_registry(SharedRetriever::new(load(&cli.corpus, &cli.schema)?), &HttpConfig::default())?;
            println!("{}", serde_json::to_string_pretty(&registry.descriptors())?);
        }
        Commands::Call { tool, args } => {
            let args: serde_json::Value = serde_json::from_str(&args).context("--args must be a JSON object")?;
            let registry = default_registry(SharedRetriever::new(load(&cli.corpus, &cli.schema)?), &HttpConfig::default())?;
            let runtime = tokio::runtime::Runtime::new()?;
            println!("{}", runtime.block_on(registry.invoke(&tool, args))?);
        }
    }
    Ok(())
}

fn load(corpus: &Path, schema: &str) -> Result<Retriever> {
    let schema = RecordSchema::from_name(schema)?;
    let store = DocumentStore::load(&*open_source(corpus), &schema)?;
    tracing::info!(corpus = %corpus.display(), documents = store.len(), "corpus ready");
    Ok(Retriever::new(store))
}
