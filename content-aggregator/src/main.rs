use anyhow::Context;
use clap::Parser;
use content_aggregator::{
    Domain, FetchConfig, FetchDispatcher, InterestProfile, ItemSink, JsonFileSink, PipelineConfig, SourceDescriptor,
};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "content-aggregator", about = "Fetch, extract and rank items from configured sources")]
struct Args {
    /// JSON file with `sources` and optional `interests`
    #[arg(short, long)]
    config: PathBuf,

    /// Where to write the ranked items
    #[arg(short, long, default_value = "data/items.json")]
    output: PathBuf,

    /// news, jobs or events
    #[arg(short, long, default_value = "news")]
    domain: Domain,

    #[arg(long, default_value_t = 10)]
    max_per_source: usize,

    #[arg(long, default_value_t = 6)]
    workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

#[derive(Debug, Deserialize)]
struct RunConfig {
    #[serde(alias = "rss_feeds", alias = "job_boards", alias = "event_sources")]
    sources: Vec<SourceDescriptor>,
    #[serde(default)]
    interests: InterestProfile,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let raw = std::fs::read_to_string(&args.config)
        .with_context(|| format!("reading config {}", args.config.display()))?;
    let run: RunConfig =
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", args.config.display()))?;

    info!("Starting {} run over {} sources", args.domain, run.sources.len());

    let pipeline = PipelineConfig {
        max_items_per_source: args.max_per_source,
        worker_pool_size: args.workers,
        ..PipelineConfig::for_domain(args.domain)
    };
    let fetch = FetchConfig {
        timeout_seconds: args.timeout,
        ..FetchConfig::default()
    };

    let dispatcher = FetchDispatcher::with_http(fetch, pipeline, &run.interests)?;
    let items = dispatcher.run(&run.sources).await;
    if items.is_empty() {
        warn!("Run produced no items");
    }

    JsonFileSink::new(&args.output)
        .write_items(&items)
        .with_context(|| format!("writing {}", args.output.display()))?;

    info!("Done: {} items", items.len());
    Ok(())
}
