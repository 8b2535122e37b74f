use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

use larder_api::app::{build_app, services::AppServices};
use larder_infra::{AppConfig, RecordStore, SeedReport, seed};

#[derive(Parser)]
#[command(name = "larder", about = "Inventory and orders HTTP service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default).
    Serve(ServeArgs),
    /// Insert the sample records into empty collections and exit.
    Seed,
}

#[derive(Args, Default)]
struct ServeArgs {
    /// Overrides LARDER_PORT.
    #[arg(long)]
    port: Option<u16>,

    /// Seed empty collections before serving.
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    larder_observability::init();

    let cli = Cli::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;

    match cli.command.unwrap_or(Commands::Serve(ServeArgs::default())) {
        Commands::Seed => {
            let store = RecordStore::connect(&config.store)
                .await
                .context("failed to connect record store")?;
            let report = seed(&store).await.context("seeding failed")?;
            log_report(&report);
        }
        Commands::Serve(args) => serve(config, args).await?,
    }

    Ok(())
}

async fn serve(config: AppConfig, args: ServeArgs) -> anyhow::Result<()> {
    let services = AppServices::build(&config)
        .await
        .context("failed to connect record store")?;

    if args.seed {
        let report = seed(services.store()).await.context("seeding failed")?;
        log_report(&report);
    }

    let port = args.port.unwrap_or(config.port);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind 0.0.0.0:{port}"))?;

    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, build_app(services))
        .await
        .context("server error")
}

fn log_report(report: &SeedReport) {
    info!(
        orders = ?report.orders,
        inventory = ?report.inventory,
        users = ?report.users,
        "seed finished"
    );
}
