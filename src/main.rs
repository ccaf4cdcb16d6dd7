use lexrank::cli::{Cli, Commands, ConfigAction, IndexAction};
use lexrank::config::Config;
use lexrank::error::{LexrankError, Result};
use lexrank::pipeline::{FastEmbedEncoder, PipelineEngine, QueryRequest};
use lexrank::search::{ElasticClient, SearchClient};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    init_logging();

    // Parse CLI arguments
    let cli = Cli::parse_args();

    match cli.command {
        Commands::Query {
            query,
            alias,
            limit,
            json,
        } => {
            cmd_query(cli.config, &query, &alias, limit, json).await?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, action)?;
        }
        Commands::Index { action } => {
            cmd_index(cli.config, action).await?;
        }
    }

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lexrank=info"));

    fmt().with_env_filter(filter).with_target(false).init();
}

fn config_path(path: Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p),
        None => Config::default_path(),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    Config::load(&config_path(path)?)
}

async fn cmd_query(
    config_path: Option<PathBuf>,
    query: &str,
    alias: &str,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(limit) = limit {
        config.limits.results_quantity = limit;
    }

    let client = Arc::new(ElasticClient::new(&config.search)?);
    let encoder = Arc::new(
        FastEmbedEncoder::new(&config.reranker.model)
            .map_err(|e| LexrankError::Rerank(e.to_string()))?,
    );
    let engine = PipelineEngine::new(client, encoder, &config);

    let request = QueryRequest::new(query, alias);
    let response = engine.answer(&request).await?;

    if json {
        let out = serde_json::to_string_pretty(&response).map_err(|e| LexrankError::Json {
            source: e,
            context: "Failed to serialize results".to_string(),
        })?;
        println!("{}", out);
        return Ok(());
    }

    if response.ranking_dicts.is_empty() {
        println!("No results");
        return Ok(());
    }

    for (i, result) in response.ranking_dicts.iter().enumerate() {
        println!(
            "{:2}. [{:.4}] doc {} (module {})",
            i + 1,
            result.best_score,
            result.document_id,
            result.module_id
        );
        println!("    {}", result.link);
    }

    Ok(())
}

fn cmd_config(path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init { force } => {
            let path = config_path(path)?;
            if path.exists() && !force {
                return Err(LexrankError::Config(format!(
                    "Config file already exists: {:?} (use --force to overwrite)",
                    path
                )));
            }
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|e| LexrankError::Io {
                    source: e,
                    context: format!("Failed to create config directory: {:?}", parent),
                })?;
            }
            Config::default().save(&path)?;
            println!("✓ Wrote default config to {:?}", path);
        }
        ConfigAction::Show => {
            let config = load_config(path)?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

async fn cmd_index(path: Option<PathBuf>, action: IndexAction) -> Result<()> {
    let config = load_config(path)?;
    let client = ElasticClient::new(&config.search)?;
    let default_index = config.search.index.clone();

    match action {
        IndexAction::Create { name } => {
            let index = name.unwrap_or(default_index);
            client.create_index(&index).await?;
            println!("✓ Index {} created", index);
        }
        IndexAction::Delete { name } => {
            let index = name.unwrap_or(default_index);
            client.delete_index(&index).await?;
            println!("✓ Index {} deleted", index);
        }
        IndexAction::Load { file, name } => {
            let index = name.unwrap_or(default_index);
            let content = std::fs::read_to_string(&file).map_err(|e| LexrankError::Io {
                source: e,
                context: format!("Failed to read documents file: {:?}", file),
            })?;
            let docs: Vec<serde_json::Value> =
                serde_json::from_str(&content).map_err(|e| LexrankError::Json {
                    source: e,
                    context: format!("Documents file must be a JSON array: {:?}", file),
                })?;

            let summary = client.bulk_index(&index, &docs).await?;
            println!(
                "✓ Indexed {} documents into {} ({} errors)",
                summary.indexed, index, summary.errors
            );
        }
    }
    Ok(())
}
