// taskd: process entry point

use clap::Parser;
use taskd::{Cli, Server, TaskCatalog};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let catalog = match TaskCatalog::load(&cli.catalog, cli.max_tasks) {
        Ok(catalog) => catalog,
        Err(error) => {
            error!(%error, "fatal: could not load task catalog");
            std::process::exit(1);
        }
    };

    let server = Server::new(catalog, cli.max_threads);

    info!(port = cli.port, max_threads = cli.max_threads, max_tasks = cli.max_tasks, "starting taskd");

    if let Err(error) = server.run(cli.port).await {
        error!(%error, "fatal: server exited");
        std::process::exit(1);
    }
}
