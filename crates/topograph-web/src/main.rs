//! CLI entry point for the Topograph web service.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use topograph_core::AppConfig;
use topograph_graph::{GraphClient, GraphConfig};
use topograph_seed::Seeder;
use topograph_web::{AppState, HttpServer};

#[derive(Parser)]
#[command(name = "topograph")]
#[command(about = "Infrastructure graph viewer backed by Neo4j")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file prefix (default: topograph).
    #[arg(short, long, default_value = "topograph", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the index page and neighborhood API (default).
    Serve {
        /// Override the bind address from config.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Seed the graph if it is empty, print the report, and exit.
    Seed,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    let graph_config = GraphConfig::from(&config.graph);
    let graph = GraphClient::new(&graph_config)?;
    let seeder = Seeder::from_settings(graph.clone(), &config.seed, graph_config.timeout)?;

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => {
            // The database may come up after us; requests fail until it does.
            match graph.ping().await {
                Ok(()) => tracing::info!(url = %graph.base_url(), "Neo4j reachable"),
                Err(e) => tracing::warn!(url = %graph.base_url(), error = %e, "Neo4j not reachable yet"),
            }

            let bind = bind.unwrap_or(config.server.bind);
            HttpServer::new(AppState { graph, seeder }, bind).start().await?;
        }
        Command::Seed => match seeder.ensure_seeded().await? {
            Some(report) => println!("{}", serde_json::to_string(&report)?),
            None => tracing::info!("Graph already seeded, nothing to do"),
        },
    }

    Ok(())
}
