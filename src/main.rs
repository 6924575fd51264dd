use std::{collections::BTreeMap, sync::Arc};

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

use notifier::{
    config::{Cli, Command, Config, StatusArgs},
    service::StatusService,
    status::{ClientStatus, StatusStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let cmd = cli.command.clone().unwrap_or(Command::Run);

    match cmd {
        Command::Run => run_server(&cli.config).await,
        Command::Demo => run_demo(&cli.config).await,
        Command::Status(args) => print_status(&cli.config, args).await,
    }
}

async fn run_server(config: &Config) -> Result<()> {
    let service = Arc::new(StatusService::new(StatusStore::new()));

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!(bind = %listener.local_addr()?, "starting notifier");
    notifier::server::serve(listener, service, shutdown_signal()).await?;
    info!("notifier stopped");
    Ok(())
}

async fn run_demo(config: &Config) -> Result<()> {
    let mut client = notifier::client::connect(config.server).await?;
    notifier::client::run_demo(&mut client).await?;
    Ok(())
}

async fn print_status(config: &Config, args: StatusArgs) -> Result<()> {
    let mut client = notifier::client::connect(config.server).await?;
    let statuses = client.client_statuses(&args.client_id).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    print_status_lines(&statuses);
    Ok(())
}

fn print_status_lines(statuses: &BTreeMap<String, ClientStatus>) {
    if statuses.is_empty() {
        println!("no clients");
        return;
    }
    for (client_id, status) in statuses {
        println!("{client_id}: {status}");
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
