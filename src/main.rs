mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use rangefetch::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let config = match args.config {
                Some(path) => Config::load_from_path(path)?,
                None => Config::load()?,
            };
            let address = args.address.unwrap_or(config.server.bind_addr);
            rangefetch::api::run(address, config).await?;
        }
    }

    Ok(())
}
