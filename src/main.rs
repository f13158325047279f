use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use staymetrics::api::state::AppState;
use staymetrics::calculate::ranking::{composite_ranking, rank_hotels, Metric};
use staymetrics::config::AppConfig;
use staymetrics::storage::{load_roster, HotelRepository, PerformanceRepository, StorageConfig};

#[derive(Parser)]
#[command(name = "staymetrics")]
#[command(about = "Hotel occupancy and revenue tracker with ranking analytics")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: String,

    /// Data directory path
    #[arg(long, default_value = "./data")]
    data_dir: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print hotel rankings to stdout
    Report {
        /// Metric to rank by: "revpar", "occupancy-rate", or "adr"
        #[arg(long, default_value = "revpar")]
        metric: String,

        /// Also print each hotel's composite rank line
        #[arg(long)]
        composite: bool,
    },

    /// Ensure the data directory layout and compact the stores
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting staymetrics v{}", env!("CARGO_PKG_VERSION"));

    let config_path = PathBuf::from(&cli.config);
    let config = if config_path.exists() {
        AppConfig::from_file(&config_path)?
    } else {
        tracing::debug!("No config file at {:?}, using defaults", config_path);
        AppConfig::default()
    };

    match cli.command {
        Commands::Serve { host, port } => {
            let storage = StorageConfig::new(PathBuf::from(&cli.data_dir));
            storage.ensure_layout()?;

            let state = AppState::new(storage, config.api_token.clone());
            let app = staymetrics::api::build_router(state);

            let host = host.unwrap_or(config.server.host);
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Report { metric, composite } => {
            let metric: Metric = metric
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;

            let storage = StorageConfig::new(PathBuf::from(&cli.data_dir));
            let hotels = HotelRepository::new(&storage);
            let performance = PerformanceRepository::new(&storage);
            let roster = load_roster(&hotels, &performance).await?;

            if roster.is_empty() {
                println!("No hotels in {}", cli.data_dir);
                return Ok(());
            }

            let rankings = rank_hotels(&roster, metric);
            println!("Rankings by {} ({} hotels)\n", metric.as_str(), roster.len());
            println!("{:<6} {:<28} {:>12}", "Rank", "Hotel", "Value");
            for (idx, entry) in rankings.iter().enumerate() {
                println!(
                    "{:<6} {:<28} {:>12.4}",
                    idx + 1,
                    entry.hotel.name,
                    entry.value
                );
            }

            if composite {
                println!();
                for (hotel, _) in &roster {
                    let report = composite_ranking(&roster, &hotel.id);
                    println!(
                        "{}: revpar #{}, occupancy #{}, adr #{} (pool {})",
                        hotel.name,
                        report.rev_par_rank,
                        report.occupancy_rate_rank,
                        report.adr_rank,
                        report.pool_size
                    );
                }
            }
        }
        Commands::Migrate => {
            let storage = StorageConfig::new(PathBuf::from(&cli.data_dir));
            storage.ensure_layout()?;

            let hotels = HotelRepository::new(&storage);
            let performance = PerformanceRepository::new(&storage);
            let hotel_count = hotels.compact().await?;
            let record_count = performance.compact().await?;

            println!("Data directory: {}", cli.data_dir);
            println!("Hotels:              {}", hotel_count);
            println!("Performance records: {}", record_count);
        }
    }

    Ok(())
}
