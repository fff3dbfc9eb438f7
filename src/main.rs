use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use keystone::capm::estimate::EstimateReport;
use keystone::catalog::BetaKind;
use keystone::config::Config;
use keystone::sources::client::SourceClient;
use keystone::suggest::embeddings::SentenceEmbedder;
use keystone::suggest::{IndustryRanker, TextEmbedder};

/// keystone: cost of equity via CAPM, with semantic industry suggestions.
///
/// Pulls the risk-free rate from FRED and country risk premiums and
/// industry betas from Damodaran's datasets, then computes
/// Ke = Rf + β × ERP.
#[derive(Parser)]
#[command(name = "keystone", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the cost of equity for a country and industry
    Estimate {
        /// Country for the equity risk premium (default: KEYSTONE_COUNTRY or Peru)
        #[arg(long)]
        country: Option<String>,

        /// Industry for the beta lookup (default: KEYSTONE_INDUSTRY or "Metals & Mining")
        #[arg(long)]
        industry: Option<String>,

        /// Beta column: levered, unlevered, or unlevered-cash
        #[arg(long)]
        beta_kind: Option<BetaKind>,

        /// Print the estimate as JSON
        #[arg(long)]
        json: bool,
    },

    /// Suggest the closest industries for a free-text description
    Suggest {
        /// Description of the business (e.g. "company that mines copper")
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,

        /// Number of suggestions (default: KEYSTONE_TOP_K or 3)
        #[arg(long)]
        top: Option<usize>,

        /// Beta column shown next to each suggestion
        #[arg(long)]
        beta_kind: Option<BetaKind>,

        /// Print suggestions as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the estimate, then suggest industries interactively
    Session {
        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        industry: Option<String>,

        #[arg(long)]
        beta_kind: Option<BetaKind>,
    },

    /// List industries in the beta catalog
    Industries {
        /// Only show industries whose name contains this text
        #[arg(long)]
        filter: Option<String>,

        #[arg(long)]
        beta_kind: Option<BetaKind>,
    },

    /// List countries with their equity risk premiums
    Countries {
        /// Only show countries whose name contains this text
        #[arg(long)]
        filter: Option<String>,
    },

    /// Download the sentence embedding model (~90 MB)
    DownloadModel,

    /// Show configuration and model status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("keystone=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Estimate {
            country,
            industry,
            beta_kind,
            json,
        } => {
            let kind = beta_kind.unwrap_or(config.beta_kind);
            let country = country.unwrap_or_else(|| config.country.clone());
            let industry = industry.unwrap_or_else(|| config.industry.clone());

            let client = SourceClient::new()?;
            let data = with_spinner(
                "Fetching market data...",
                keystone::sources::load_market_data(&client, &config, kind),
            )
            .await?;

            let report = EstimateReport::build(&data, &country, &industry, kind)?;
            if json {
                keystone::output::print_json(&report)?;
            } else {
                keystone::output::terminal::display_estimate(&report);
            }
        }

        Commands::Suggest {
            description,
            top,
            beta_kind,
            json,
        } => {
            let kind = beta_kind.unwrap_or(config.beta_kind);
            let top_k = top.unwrap_or(config.top_k);
            let query = description.join(" ");

            config.require_embedding_model()?;
            let embedder: Arc<dyn TextEmbedder> =
                Arc::new(SentenceEmbedder::load(&config.embedding_model_dir())?);

            let client = SourceClient::new()?;
            let catalog = with_spinner(
                "Fetching industry betas...",
                keystone::sources::load_industries(&client, &config, kind),
            )
            .await?;

            let ranker = IndustryRanker::new(embedder, catalog, kind);
            let suggestions = with_spinner("Ranking industries...", async {
                ranker.rank_top(&query, top_k).await.map_err(anyhow::Error::from)
            })
            .await?;

            if json {
                keystone::output::print_json(&suggestions)?;
            } else {
                keystone::output::terminal::display_suggestions(&query, &suggestions);
            }
        }

        Commands::Session {
            country,
            industry,
            beta_kind,
        } => {
            let kind = beta_kind.unwrap_or(config.beta_kind);
            let country = country.unwrap_or_else(|| config.country.clone());
            let industry = industry.unwrap_or_else(|| config.industry.clone());

            let client = SourceClient::new()?;
            let data = with_spinner(
                "Fetching market data...",
                keystone::sources::load_market_data(&client, &config, kind),
            )
            .await?;
            let report = EstimateReport::build(&data, &country, &industry, kind)?;

            // Suggestions degrade gracefully: without a model the session
            // still shows the estimate.
            let ranker = load_embedder(&config)
                .map(|embedder| IndustryRanker::new(embedder, data.industries.clone(), kind));

            if let Some(ranker) = &ranker {
                let warm = with_spinner("Embedding industry catalog...", async {
                    ranker.warm_up().await.map_err(anyhow::Error::from)
                })
                .await;
                if let Err(e) = warm {
                    warn!(error = %e, "Catalog embedding failed; suggestions will retry on first query");
                }
            }

            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            keystone::session::run(stdin, &report, ranker.as_ref(), config.top_k).await?;
        }

        Commands::Industries { filter, beta_kind } => {
            let kind = beta_kind.unwrap_or(config.beta_kind);
            let client = SourceClient::new()?;
            let catalog = with_spinner(
                "Fetching industry betas...",
                keystone::sources::load_industries(&client, &config, kind),
            )
            .await?;
            keystone::output::terminal::display_industries(&catalog, kind, filter.as_deref());
        }

        Commands::Countries { filter } => {
            let client = SourceClient::new()?;
            let premiums = with_spinner(
                "Fetching country risk premiums...",
                keystone::sources::load_premiums(&client, &config),
            )
            .await?;
            keystone::output::terminal::display_countries(&premiums, filter.as_deref());
        }

        Commands::DownloadModel => {
            println!("Downloading sentence embedding model...");
            println!("  Destination: {}", config.embedding_model_dir().display());

            keystone::suggest::download::download_model(&config.model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `keystone suggest <description>` or `keystone session`.");
        }

        Commands::Status => {
            keystone::status::show(&config);
        }
    }

    Ok(())
}

/// Try to load the sentence embedder. Returns None (with a warning) if the
/// model isn't downloaded or fails to load.
fn load_embedder(config: &Config) -> Option<Arc<dyn TextEmbedder>> {
    if !keystone::suggest::download::embedding_files_present(&config.model_dir) {
        info!("Embedding model not downloaded; industry suggestions disabled");
        return None;
    }

    match SentenceEmbedder::load(&config.embedding_model_dir()) {
        Ok(e) => {
            info!("Loaded sentence embedding model");
            Some(Arc::new(e))
        }
        Err(e) => {
            warn!("Failed to load embedding model, suggestions disabled: {e:#}");
            None
        }
    }
}

/// Run `fut` while showing a spinner on stderr.
async fn with_spinner<T, F>(message: &'static str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner} {msg}")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));

    let result = fut.await;
    pb.finish_and_clear();
    result
}
