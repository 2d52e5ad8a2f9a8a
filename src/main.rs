use clap::Parser;
use course_recommender::cli::handlers::*;
use course_recommender::cli::Cli;
use course_recommender::cli::Commands;
use course_recommender::config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };

    // Initialize logging
    if cli.verbose {
        course_recommender::logging::init_logging_with_level(&config.logging, "debug")?;
    } else {
        course_recommender::logging::init_logging(&config.logging)?;
    }
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Serve {
            host,
            port,
            no_cors,
        } => handle_serve_api(&config, host, port, no_cors).await?,
        Commands::Recommend {
            query,
            chips,
            max_results,
            rules_only,
        } => handle_recommend_command(&config, query, chips, max_results, rules_only).await?,
        Commands::Catalog {
            id,
            search,
            level,
            json,
        } => handle_catalog_command(&config, id, search, level, json)?,
        Commands::Config => handle_config_command(&config)?,
    }

    Ok(())
}
