use clap::Parser;
use feedreader::{
    cli::{commands, Cli, Commands},
    config::Settings,
    Result,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,feedreader=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env()?;
    if cli.feeds.is_some() {
        settings.feeds.config_path = cli.feeds;
    }
    settings.validate()?;

    match cli.command {
        Commands::Feeds => {
            let catalog = settings.catalog()?;
            commands::list_feeds(&catalog);
        }
        Commands::Load { id, json } => {
            info!("Loading feed {}", id);
            commands::load(&settings, id, json).await?;
        }
        Commands::Cycle => {
            commands::cycle(&settings).await?;
        }
        Commands::Render { id } => {
            commands::render(&settings, id).await?;
        }
        Commands::Validate { url } => {
            commands::validate_feed(&settings, &url).await?;
        }
    }

    Ok(())
}
