use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::{prelude::*, EnvFilter};
use volley_server::{app, commands::Command, config::read_config};


#[derive(clap::Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = read_config();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging_config)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
            let app = app(&config)?;

            tracing::info!("listening on {}", addr);
            axum::Server::bind(&addr)
                .serve(app.into_make_service())
                .await?;
        }
        command => command.run_offline(&config.engine)?,
    }

    Ok(())
}
