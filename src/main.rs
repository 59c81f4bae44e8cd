use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use beatpath::directory::Directory;
use beatpath::graph::load_gexf;
use beatpath::http::HttpServer;
use beatpath::llm::{GeminiClient, MatchupExplainer, TextGenerator};
use beatpath::roster::load_roster;
use beatpath::service::PathFinder;
use beatpath::Config;

/// Load both artifacts and assemble the path finder with the LLM fallback
/// wired in when a credential is present. Shared between serve and verify.
fn build_finder(config: &Config) -> Result<PathFinder> {
    let graph = load_gexf(config.graph_path())?;
    let roster = load_roster(config.roster_path())?;
    let directory = Directory::new(&graph, &roster);

    log::info!(
        "Loaded {} teams and {} games from {}",
        graph.team_count(),
        graph.game_count(),
        config.graph_path().display()
    );

    let generator: Option<Arc<dyn TextGenerator>> = match config.llm_api_key() {
        Some(api_key) => {
            log::info!("LLM fallback enabled (model {})", config.llm.model);
            Some(Arc::new(GeminiClient::new(
                api_key,
                config.llm.model.clone(),
                Duration::from_secs(config.llm.timeout_secs),
            )))
        }
        None => {
            log::info!("LLM fallback disabled - disconnected lookups will report it as unavailable");
            None
        }
    };

    Ok(PathFinder::new(
        graph,
        directory,
        MatchupExplainer::new(generator),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger from environment variable or default to info level
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("serve");

    match command {
        "verify" => {
            // Load the artifacts and check directory invariants
            run_verification()?;
        }
        "serve" | _ => {
            // HTTP API mode (default)
            run_server().await?;
        }
    }

    Ok(())
}

/// Run the HTTP API server
async fn run_server() -> Result<()> {
    log::info!("Starting Beatpath v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    let finder = build_finder(&config)?;

    let server = HttpServer::new(finder, config.http_server.allowed_origins.clone());
    server.run(config.http_server.port).await?;

    Ok(())
}

/// Load configuration and artifacts, then verify directory invariants
fn run_verification() -> Result<()> {
    log::info!("Starting Beatpath v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load()?;
    log::info!("Configuration loaded successfully");
    log::info!("Graph path: {}", config.graph_path().display());
    log::info!("Roster path: {}", config.roster_path().display());

    let finder = build_finder(&config)?;

    // Every enumerated team name must resolve back to an id
    let mut unresolved = 0;
    for name in finder.team_names() {
        if finder.directory().resolve(name).is_none() {
            log::error!("Team name {:?} does not resolve", name);
            unresolved += 1;
        }
    }

    if unresolved > 0 {
        anyhow::bail!("{} team names failed to resolve", unresolved);
    }

    log::info!("✓ All {} team names resolve", finder.team_names().len());
    log::info!("✓ Verification complete");

    Ok(())
}
