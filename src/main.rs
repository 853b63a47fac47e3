//! person-search — Binary Entrypoint
//! One-shot CLI: fans a person query out to the enabled search adapters,
//! prints the summary + detail views and persists a timestamped JSON
//! snapshot of the report.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use person_search::aggregate::{PersonSearcher, SearchOptions};
use person_search::config::SearchConfig;
use person_search::export;

#[derive(Debug, Parser)]
#[command(
    name = "person-search",
    about = "Aggregate academic papers, news and web mentions for a person"
)]
struct Cli {
    /// Full name of the person to search for.
    person_name: String,

    /// University affiliation for targeted newsroom search.
    #[arg(long)]
    university: Option<String>,

    /// Maximum results per sub-source.
    #[arg(long, default_value_t = 10)]
    max_results: usize,

    /// Include the social-media platform sub-sources (web category).
    #[arg(long)]
    include_social: bool,

    /// Skip the academic papers category.
    #[arg(long)]
    no_papers: bool,

    /// Skip the news category.
    #[arg(long)]
    no_news: bool,

    /// Skip the general web category.
    #[arg(long)]
    no_web: bool,

    /// Directory for the persisted JSON snapshot.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Print only, do not write a snapshot.
    #[arg(long)]
    no_save: bool,

    /// Records shown per source in the detail view.
    #[arg(long, default_value_t = 5)]
    max_display: usize,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("person_search=info,warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    let config = SearchConfig::from_env();

    if config.tavily_api_key.is_none() {
        tracing::warn!("no TAVILY_API_KEY configured, web search degrades to basic scraping");
    }
    if config.serpapi_key.is_none() {
        tracing::warn!("no SERPAPI_KEY configured, scholar/news search degrades to basic scraping");
    }

    let options = SearchOptions {
        university: cli.university.clone(),
        max_results_per_source: cli.max_results,
        include_social: cli.include_social,
        search_papers: !cli.no_papers,
        search_news: !cli.no_news,
        search_web: !cli.no_web,
    };

    let searcher = PersonSearcher::new(&config);
    let report = searcher.build_report(&cli.person_name, &options).await?;

    println!("{}", export::render_summary(&report));
    println!("{}", export::render_detail(&report, cli.max_display));

    if !cli.no_save {
        let path = export::persist(&report, &cli.out_dir)?;
        println!("Results saved to {}", path.display());
    }

    Ok(())
}
