//! medtechone - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use medtechone_retrieval::{
    cli::{Args, Commands, Verbosity},
    config::Config,
    rag::{passages_to_json, render_resources, RetrievalPipeline, SearchReport},
    types::Passage,
    Credentials,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let verbosity = args.verbosity();
    init_logging(verbosity);

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match &args.command {
        Commands::Search {
            query,
            timeout_ms,
            json,
        } => {
            let pipeline = build_pipeline(&config)?;
            let report = match timeout_ms {
                Some(ms) => {
                    pipeline
                        .search_with_timeout(query, Duration::from_millis(*ms))
                        .await
                }
                None => pipeline.search_detailed(query).await,
            };
            print_search(&report, *json, verbosity)?;
        }
        Commands::Resources { filter } => {
            let pipeline = build_pipeline(&config)?;
            let listing = pipeline.resources(filter.as_deref()).await;
            if listing.outcome.is_failure() {
                eprintln!("{}", "Catalog unavailable".yellow());
            }
            if listing.resources.is_empty() {
                println!("No resources found in the database.");
            } else {
                println!("{}", render_resources(&listing.resources));
            }
        }
        Commands::Pages => {
            let pipeline = build_pipeline(&config)?;
            let pages = pipeline.list_documentation_pages().await;
            if pages.is_empty() {
                println!("No documentation pages found.");
            }
            for url in pages {
                println!("{}", url);
            }
        }
        Commands::Page { url } => {
            let pipeline = build_pipeline(&config)?;
            println!("{}", pipeline.page_content(url).await?);
        }
        Commands::Config => show_config(&args, &config)?,
    }

    Ok(())
}

fn build_pipeline(config: &Config) -> Result<RetrievalPipeline> {
    RetrievalPipeline::from_config(config, &Credentials::from_env())
        .context("Failed to initialize retrieval pipeline")
}

/// RUST_LOG wins over the -v/-q flags
fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_search(report: &SearchReport, json: bool, verbosity: Verbosity) -> Result<()> {
    if verbosity.show_stages() {
        eprintln!("{}", "Stages:".bold());
        eprintln!("  Embedding:   {:?}", report.embedding);
        eprintln!("  PDF vector:  {:?}", report.pdf_vector);
        eprintln!("  PDF keyword: {:?}", report.pdf_keyword);
        eprintln!("  Web vector:  {:?}", report.web_vector);
        eprintln!();
    }

    if report.cancelled {
        eprintln!("{}", "Search timed out; showing partial results".yellow());
    }
    if report.backend_failed() {
        eprintln!("{}", "Some retrieval backends failed".yellow());
    }

    if json {
        println!("{}", passages_to_json(&report.passages)?);
        return Ok(());
    }

    if report.is_empty() {
        println!("No passages found.");
        return Ok(());
    }

    for (rank, passage) in report.passages.iter().enumerate() {
        print_passage(rank + 1, passage);
    }
    Ok(())
}

fn print_passage(rank: usize, passage: &Passage) {
    let score = passage
        .similarity
        .map(|s| format!("{:.3}", s))
        .unwrap_or_else(|| "keyword".to_string());

    println!(
        "{} {} [{}] {}",
        format!("{}.", rank).bold(),
        passage.title.cyan(),
        passage.kind,
        score.dimmed()
    );
    if !passage.source_url.is_empty() {
        println!("   {}", passage.source_url.blue());
    }
    println!("   {}", snippet(&passage.content, 240));
    println!();
}

fn snippet(text: &str, max_chars: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max_chars {
        flat
    } else {
        format!("{}...", flat.chars().take(max_chars).collect::<String>())
    }
}

fn show_config(args: &Args, config: &Config) -> Result<()> {
    println!("{}", "medtechone Configuration".bold());
    println!();

    let path = match &args.config {
        Some(path) => path.clone(),
        None => Config::config_path()?,
    };
    println!("File: {}", path.display());
    println!();

    println!("{}", toml::to_string_pretty(config)?);

    let credentials = Credentials::from_env();
    println!("Credentials:");
    for (name, value) in [
        (Credentials::OPENAI_API_KEY, &credentials.openai_api_key),
        (Credentials::SUPABASE_URL, &credentials.supabase_url),
        (Credentials::SUPABASE_SERVICE_KEY, &credentials.supabase_service_key),
        (Credentials::AIRTABLE_TOKEN, &credentials.airtable_token),
        (Credentials::AIRTABLE_BASE_ID, &credentials.airtable_base_id),
    ] {
        let state = if value.is_some() {
            "set".green()
        } else {
            "missing".red()
        };
        println!("  {:<22} {}", name, state);
    }
    println!("  Verbosity: {}", args.verbosity().as_str());

    Ok(())
}
