/*
newsdeck - single-binary main.rs
Thin CLI over the orchestration core: search, AI summaries, URL
summarization, category feeds and the service health watcher.
*/

use anyhow::Result;
use clap::{Parser, Subcommand};
use common::Config;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use newsdeck::api::{ArticleService, RemoteArticleService};
use newsdeck::category::Category;
use newsdeck::feed::{ArticleFeedStore, LATEST_KEY};
use newsdeck::health::HealthMonitor;
use newsdeck::query::{QueryOrchestrator, QueryOutcome, QueryState};
use newsdeck::rank::{SortKey, SortOrder};
use newsdeck::types::Article;

#[derive(Parser, Debug)]
#[command(name = "newsdeck", about = "Newsdeck news-discovery client")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search ranked articles for a free-text query
    Search {
        query: String,

        /// Number of articles to request (1-10)
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(1..=10))]
        max_articles: u8,

        #[arg(long, value_enum, default_value = "relevance")]
        sort_by: SortKey,

        #[arg(long, value_enum, default_value = "desc")]
        order: SortOrder,
    },

    /// Ask for an AI-generated synthesis of a small article set
    Ask {
        query: String,

        /// Number of articles to synthesize from (1-10)
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=10))]
        max_articles: u8,
    },

    /// Summarize a single article by URL
    SummarizeUrl { url: String },

    /// Show a category feed from the local articles table
    Feed {
        /// Category key (sports, technology, national, business) or "latest"
        category: String,

        /// Fetch the expanded page size instead of the collapsed one
        #[arg(long)]
        expand: bool,
    },

    /// Poll service health until ctrl-c
    Watch,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    // Resolve config paths
    let default_path = PathBuf::from("config.default.toml");

    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        Some(p)
    } else {
        let p = PathBuf::from("config.toml");
        if p.exists() {
            Some(p)
        } else {
            None
        }
    };

    let config = Config::load_with_defaults(
        if default_path.exists() { Some(&default_path) } else { None },
        override_path.as_deref(),
    )
    .await?;
    info!(default = ?default_path, config_override = ?override_path, "configuration loaded");

    let service = Arc::new(RemoteArticleService::new(config.api.base_url.clone()));

    match args.command {
        Command::Search {
            query,
            max_articles,
            sort_by,
            order,
        } => {
            let orchestrator = QueryOrchestrator::new(service);
            orchestrator.set_sort(sort_by, order);
            orchestrator.run_search(&query, max_articles).await?;
            report_query_state(orchestrator.state())
        }

        Command::Ask { query, max_articles } => {
            let orchestrator = QueryOrchestrator::new(service);
            orchestrator.run_ai_summary(&query, max_articles).await?;
            report_query_state(orchestrator.state())
        }

        Command::SummarizeUrl { url } => {
            let response = service.summarize_url(&url).await?;
            println!("{}", response.title);
            if let Some(category) = &response.category {
                println!("[{}]", Category::classify(category));
            }
            println!("\n{}\n\n{}", response.summary, response.url);
            Ok(())
        }

        Command::Feed { category, expand } => {
            let pool = common::init_db_pool(&config.database.path).await?;
            if config.admin.as_ref().and_then(|a| a.auto_migrate).unwrap_or(false) {
                info!("Auto-migrate enabled: running DB migrations");
                common::run_migrations(&pool).await?;
            }

            let store = ArticleFeedStore::new(
                pool,
                category.clone(),
                config.feed_page_size(),
                config.feed_expanded_page_size(),
            );
            if expand {
                store.expand().await;
            } else {
                store.load().await;
            }

            let heading = if category == LATEST_KEY {
                "Latest News".to_string()
            } else {
                Category::classify(&category).to_string()
            };
            let state = store.state();
            println!("== {} ==", heading);
            if state.articles.is_empty() {
                println!("No articles found in this category");
            }
            for (i, article) in state.articles.iter().enumerate() {
                print_article(i, article);
            }
            Ok(())
        }

        Command::Watch => {
            let interval = Duration::from_secs(config.api.health_poll_seconds.unwrap_or(30));
            let monitor = HealthMonitor::start(service, interval);
            info!(interval_seconds = interval.as_secs(), "health watcher started");

            let mut last = monitor.healthy();
            println!("service {}", if last { "online" } else { "offline" });
            loop {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => break,
                    _ = tokio::time::sleep(Duration::from_secs(1)) => {
                        let now = monitor.healthy();
                        if now != last {
                            println!("service {}", if now { "online" } else { "offline" });
                            last = now;
                        }
                    }
                }
            }

            info!("stopping health watcher");
            monitor.stop().await;
            Ok(())
        }
    }
}

fn report_query_state(state: QueryState) -> Result<()> {
    match state {
        QueryState::Succeeded(QueryOutcome::Articles(articles)) => {
            println!("Found {} articles", articles.len());
            for (i, article) in articles.iter().enumerate() {
                print_article(i, article);
            }
            Ok(())
        }
        QueryState::Succeeded(QueryOutcome::Summary { summary, articles_used }) => {
            println!("{}\n", summary);
            if !articles_used.is_empty() {
                println!("Sources:");
                for (i, article) in articles_used.iter().enumerate() {
                    print_article(i, article);
                }
            }
            Ok(())
        }
        QueryState::Failed(message) => Err(anyhow::anyhow!(message)),
        // A settled run_* call never leaves the orchestrator here
        QueryState::Idle | QueryState::Loading => Ok(()),
    }
}

fn print_article(index: usize, article: &Article) {
    let mut line = format!("{:2}. {}", index + 1, article.title);
    if let Some(category) = &article.category {
        line.push_str(&format!(" [{}]", category));
    }
    if let Some(score) = article.relevance_score {
        line.push_str(&format!(" ({:.2})", score));
    }
    println!("{}", line);
    if let Some(time) = &article.publish_time {
        println!("    {}", time);
    }
    println!("    {}", article.url);
}
