use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tafiti::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "tafiti",
    version,
    about = "BBC World Service language-edition crawler for news corpora",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); defaults to the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Configuration file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl categories of an edition into per-category and merged corpora
    Crawl {
        /// Edition code, alias or path name (e.g. hau, ha, hausa)
        #[arg(short, long)]
        language: String,

        /// Merged corpus file; category files are written next to it
        #[arg(short, long)]
        output_file_name: Option<PathBuf>,

        /// Number of articles to collect, -1 for all
        #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
        no_of_articles: i64,

        /// `all`, or comma-separated category names (e.g. labarai,wasanni)
        #[arg(long, default_value = "all")]
        categories: String,

        /// Do not pause between requests
        #[arg(long, default_value = "false")]
        no_time_delay: bool,

        /// Spread the article count evenly across categories
        #[arg(long, default_value = "false")]
        spread: bool,

        /// Remove category files after merging
        #[arg(long, default_value = "false")]
        cleanup: bool,
    },

    /// Print the article URLs of categories as JSON lines
    Urls {
        /// Edition code, alias or path name
        #[arg(short, long)]
        language: String,

        /// `all`, or comma-separated category names
        #[arg(long, default_value = "all")]
        categories: String,

        /// URL quota per category, -1 for all pages
        #[arg(short, long, default_value_t = -1, allow_negative_numbers = true)]
        no_of_articles: i64,

        /// Do not pause between listing pages
        #[arg(long, default_value = "false")]
        no_time_delay: bool,
    },

    /// Classify links as article or not for an edition
    Classify {
        /// Edition code, alias or path name
        #[arg(short, long)]
        language: String,

        /// Links to classify
        #[arg(required = true)]
        links: Vec<String>,
    },

    /// Merge existing category files into the corpus
    Merge {
        /// Merged corpus file
        #[arg(short, long)]
        output_file_name: Option<PathBuf>,

        /// Remove category files after merging
        #[arg(long, default_value = "false")]
        cleanup: bool,
    },

    /// List configured editions and categories
    Editions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    let log_format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&log_format, &config.logging.level, cli.verbose)?;

    tracing::info!("tafiti starting");

    match cli.command {
        Commands::Crawl {
            language,
            output_file_name,
            no_of_articles,
            categories,
            no_time_delay,
            spread,
            cleanup,
        } => {
            tracing::info!(
                language = %language,
                categories = %categories,
                no_of_articles = %no_of_articles,
                spread = %spread,
                "Starting crawl command"
            );
            let summary = commands::crawl(
                config,
                commands::CrawlParams {
                    language,
                    output_file_name,
                    no_of_articles,
                    categories,
                    no_time_delay,
                    spread,
                    cleanup,
                },
            )
            .await?;
            tracing::info!(
                rows = summary.merged_rows,
                failed = summary.failed_categories(),
                "Crawl finished"
            );
        }

        Commands::Urls {
            language,
            categories,
            no_of_articles,
            no_time_delay,
        } => {
            tracing::info!(language = %language, categories = %categories, "Starting urls command");
            commands::urls(config, language, categories, no_of_articles, no_time_delay).await?;
        }

        Commands::Classify { language, links } => {
            commands::classify(config, language, links)?;
        }

        Commands::Merge {
            output_file_name,
            cleanup,
        } => {
            tracing::info!(output = ?output_file_name, cleanup = %cleanup, "Starting merge command");
            commands::merge(config, output_file_name, cleanup)?;
        }

        Commands::Editions => {
            commands::editions(config)?;
        }
    }

    tracing::info!("tafiti completed successfully");
    Ok(())
}

/// Logs go to stderr so `urls` output stays clean on stdout
fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("tafiti=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("tafiti={level},warn"))
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tafiti=info,warn"))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }

    Ok(())
}
