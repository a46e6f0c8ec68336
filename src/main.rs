use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;

use cinder::aggregate::summarize_posts;
use cinder::config::Config;
use cinder::insight::analysis::{enrich_posts, summarize_news};
use cinder::insight::registry::{BackendKind, BackendRegistry};
use cinder::reddit::client::RedditClient;
use cinder::reddit::posts;
use cinder::web::AppState;

/// Cinder: sentiment intelligence for Reddit.
///
/// Fetches posts from Reddit, runs them through a configurable
/// chat-completions backend for sentiment, keywords and summaries, and
/// aggregates the results — as an HTTP API or one-shot terminal runs.
#[derive(Parser)]
#[command(name = "cinder", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
    },

    /// Summarize the current hot news once and print the result
    HotNews {
        /// Number of posts to fetch (the hot listing caps at 100)
        #[arg(long, default_value = "10")]
        n_posts: u32,

        /// Backend model to use (defaults to CINDER_BACKEND)
        #[arg(long)]
        backend: Option<BackendKind>,
    },

    /// Run a sentiment search once and print the aggregate
    Sentiment {
        /// Search query text
        query: String,

        /// Number of posts to analyze
        #[arg(long, default_value = "10")]
        n_posts: u32,

        /// Backend model to use (defaults to CINDER_BACKEND)
        #[arg(long)]
        backend: Option<BackendKind>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cinder=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Serve { port, bind } => {
            config.require_reddit()?;
            let backends = BackendRegistry::from_config(&config)?;
            let reddit = Arc::new(RedditClient::new(&config)?);
            let state = AppState::new(config, reddit, backends);
            cinder::web::run_server(state, port, &bind).await?;
        }

        Commands::HotNews { n_posts, backend } => {
            config.require_reddit()?;
            let kind = backend.unwrap_or(config.default_backend);
            let backends = BackendRegistry::from_config(&config)?;
            let client = backends.get(kind)?;
            let reddit = RedditClient::new(&config)?;

            let news = posts::fetch_hot(&reddit, n_posts).await?;
            let summary = summarize_news(client.as_ref(), &news).await?;

            println!("{}", format!("Hot news summary ({kind})").bold());
            println!("{summary}");
        }

        Commands::Sentiment {
            query,
            n_posts,
            backend,
        } => {
            config.require_reddit()?;
            let kind = backend.unwrap_or(config.default_backend);
            let backends = BackendRegistry::from_config(&config)?;
            let client = backends.get(kind)?;
            let reddit = RedditClient::new(&config)?;

            let found = posts::search(&reddit, &query, n_posts).await?;
            let enriched = enrich_posts(client, found).await?;
            let summary = summarize_posts(&enriched)?;

            println!(
                "{}",
                format!("Sentiment for {query:?} ({kind})").bold()
            );
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
