use clap::Parser;
use imgrep_web::config::{Cli, Command};
use imgrep_web::server::runtime;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(config) => {
            tracing::info!(
                "Indexing {} into {}",
                config.root_dir().display(),
                config.db_file().display()
            );
            runtime::run(config).await
        }
    }
}
