mod pricing;

use clap::{Parser, Subcommand};
use signgalaxy_core::{AppConfig, ConfigError};
use tracing_subscriber::EnvFilter;

use crate::pricing::PricingCommands;

#[derive(Debug, Parser)]
#[command(name = "signgalaxy-cli")]
#[command(about = "Sign Galaxy catalog maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database connectivity and schema
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Premium price previews and bulk re-pricing
    Pricing {
        #[command(subcommand)]
        command: PricingCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database answers
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let loaded = signgalaxy_core::load_app_config();
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback_log_level(&loaded)))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Db { command }) => run_db(command, loaded?).await,
        Some(Commands::Pricing {
            command: PricingCommands::Quote { price, json },
        }) => pricing::run_quote(price, json, &pricing::resolve_policy(&loaded)),
        Some(Commands::Pricing {
            command: PricingCommands::Reprice { dry_run },
        }) => {
            let config = loaded?;
            let pool = connect(&config).await?;
            pricing::run_reprice(&pool, &config.pricing, dry_run).await
        }
        None => {
            println!("signgalaxy-cli: run with --help to list commands");
            Ok(())
        }
    }
}

/// `SIGNGALAXY_LOG_LEVEL` when the config loaded, else `info`.
fn fallback_log_level(loaded: &Result<AppConfig, ConfigError>) -> &str {
    loaded
        .as_ref()
        .map_or("info", |config| config.log_level.as_str())
}

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = signgalaxy_db::PoolConfig::from_app_config(config);
    let pool = signgalaxy_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

async fn run_db(command: DbCommands, config: AppConfig) -> anyhow::Result<()> {
    let pool = connect(&config).await?;

    match command {
        DbCommands::Ping => {
            signgalaxy_db::health_check(&pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = signgalaxy_db::run_migrations(&pool).await?;
            tracing::info!(applied, "migrations complete");
            println!("applied {applied} migration(s)");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
