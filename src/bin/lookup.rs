use std::sync::Arc;
use std::time::Duration;

use beatpath::directory::Directory;
use beatpath::graph::load_gexf;
use beatpath::llm::{GeminiClient, MatchupExplainer, TextGenerator};
use beatpath::roster::load_roster;
use beatpath::service::PathFinder;
use beatpath::Config;
use clap::Parser;

/// Look up the shortest victory chain between two teams.
#[derive(Parser)]
#[command(name = "lookup", version, about)]
struct Args {
    /// Team the chain starts from (the transitive winner)
    from: String,

    /// Team the chain ends at (the transitive loser)
    to: String,

    /// Print the raw JSON result instead of text
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    // Load configuration and artifacts
    let config = Config::load()?;
    let graph = load_gexf(config.graph_path())?;
    let roster = load_roster(config.roster_path())?;
    let directory = Directory::new(&graph, &roster);

    let generator: Option<Arc<dyn TextGenerator>> = config.llm_api_key().map(|api_key| {
        Arc::new(GeminiClient::new(
            api_key,
            config.llm.model.clone(),
            Duration::from_secs(config.llm.timeout_secs),
        )) as Arc<dyn TextGenerator>
    });

    let finder = PathFinder::new(graph, directory, MatchupExplainer::new(generator));

    let result = finder.find_path(&args.from, &args.to).await.into_result();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if let Some(error) = result.error {
        anyhow::bail!("{}", error);
    }

    match result.llm_text {
        Some(text) => {
            println!("No victory chain connects {} to {}.", args.from, args.to);
            println!();
            println!("{}", text);
        }
        None => {
            println!("{}", result.path.join(" -> "));
            for edge in &result.edges {
                if let Some(label) = &edge.label {
                    println!("  {}", label);
                }
            }
        }
    }

    Ok(())
}
