//! CLI administration tool for url-registry.
//!
//! Works directly against the PostgreSQL store, without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL (optionally with a custom code)
//! cargo run --bin admin -- shorten example.com/docs --code docs
//!
//! # Inspect a record without counting a click
//! cargo run --bin admin -- show docs
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same database and `URL_*` variables as the server; see `url_registry::config`.

use url_registry::application::services::UrlRegistry;
use url_registry::config::Config;
use url_registry::domain::entities::UrlRecord;
use url_registry::domain::errors::RegistryError;
use url_registry::infrastructure::persistence::PgUrlStore;
use url_registry::server::connect_pool;
use url_registry::utils::code_generator::validate_custom_code;
use url_registry::utils::url_normalizer::normalize_url;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing url-registry.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL
    Shorten {
        /// URL to shorten; a missing scheme defaults to https
        url: String,

        /// Custom short code
        #[arg(short, long)]
        code: Option<String>,
    },

    /// Show a record without counting a click
    Show {
        /// Short code to look up
        code: String,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = connect_pool(&config).await?;

    match cli.command {
        Commands::Shorten { url, code } => {
            shorten(&config, registry(&config, &pool), &url, code.as_deref()).await?
        }
        Commands::Show { code } => show(registry(&config, &pool), &code).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn registry(config: &Config, pool: &PgPool) -> UrlRegistry<PgUrlStore> {
    let store = Arc::new(PgUrlStore::new(Arc::new(pool.clone())));
    UrlRegistry::new(store, config.registry_settings())
}

/// Normalizes and shortens a URL, printing the resulting record.
async fn shorten(
    config: &Config,
    registry: UrlRegistry<PgUrlStore>,
    url: &str,
    code: Option<&str>,
) -> Result<()> {
    println!("{}", "Shorten URL".bright_blue().bold());
    println!();

    let normalized = normalize_url(url)?;
    let code = code.filter(|c| !c.is_empty());
    if let Some(code) = code {
        validate_custom_code(code)?;
    }

    let record = match registry.shorten(&normalized.canonical, code).await {
        Ok(record) => record,
        Err(RegistryError::CodeInUse(code)) => {
            println!("{} {}", "✗ Code already in use:".red().bold(), code.yellow());
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to shorten URL"),
    };

    print_record(&record);

    if let Some(ref base_url) = config.base_url {
        println!(
            "  Short URL:  {}/{}",
            base_url.trim_end_matches('/'),
            record.short_code.bright_yellow().bold()
        );
    }
    println!();

    Ok(())
}

/// Prints a record by code; clicks are not incremented.
async fn show(registry: UrlRegistry<PgUrlStore>, code: &str) -> Result<()> {
    match registry.lookup(code).await {
        Ok(record) => {
            print_record(&record);
            println!();
            Ok(())
        }
        Err(RegistryError::NotFound(code)) => {
            println!("{} {}", "✗ Short code not found:".red().bold(), code.yellow());
            Ok(())
        }
        Err(e) => Err(e).context("Failed to look up short code"),
    }
}

fn print_record(record: &UrlRecord) {
    let status = if record.is_expired() {
        "EXPIRED".red()
    } else {
        "ACTIVE".green()
    };

    println!("  Code:       {}", record.short_code.bright_yellow().bold());
    println!("  URL:        {}", record.original_url.cyan());
    println!("  Clicks:     {}", record.clicks.to_string().bright_white());
    println!(
        "  Created:    {}",
        record
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!(
        "  Expires:    {}",
        record
            .expires_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!("  Status:     {}", status);
}

/// Displays record and click totals.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let urls_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await?;

    let active_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls WHERE expires_at >= NOW()")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(clicks), 0)::BIGINT FROM urls")
        .fetch_one(pool)
        .await?;

    println!(
        "  URLs:          {}",
        urls_count.to_string().bright_green().bold()
    );
    println!(
        "  Active:        {}",
        active_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:        {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✓ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}
