use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use portfolio_engine_core::{
    ConfigLoader, CovarianceStore, EngineConfig, OptimizationRequest, OptimizationService,
};
use portfolio_engine_web_api::{ApiContext, ApiServer};

#[derive(Parser)]
#[command(name = "portfolio-engine")]
#[command(about = "Portfolio optimization REST service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web API server
    Server {
        /// Server address (overrides config)
        #[arg(short, long)]
        addr: Option<String>,
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
    },
    /// Run a single optimization from a JSON request file and print the result
    Optimize {
        /// Path to a JSON file holding an optimization request with inline
        /// symbols and matrix
        #[arg(short, long)]
        input: String,
        /// Config file path
        #[arg(short, long, default_value = "config/Config.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server { addr, config } => {
            let config = ConfigLoader::load_from(&config)?;
            let addr = addr.unwrap_or_else(|| config.server.addr());
            tracing::info!(
                %addr,
                max_assets = config.engine.max_assets,
                "Starting portfolio engine server"
            );

            let context = Arc::new(ApiContext::new(config.engine));
            ApiServer::new(context).serve(&addr).await?;
        }
        Commands::Optimize { input, config } => {
            let engine: EngineConfig = ConfigLoader::load_from(&config)
                .map(|c| c.engine)
                .unwrap_or_default();

            let request: OptimizationRequest =
                serde_json::from_str(&std::fs::read_to_string(&input)?)?;
            let service =
                OptimizationService::new(Arc::new(CovarianceStore::new()), engine);
            let result = service.optimize(request).await?;

            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
