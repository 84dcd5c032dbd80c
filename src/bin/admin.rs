//! CLI administration tool for patent-registry.
//!
//! Runs database maintenance and manages tax-number filters without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Apply migrations
//! cargo run --bin admin -- db migrate
//!
//! # View patent statistics
//! cargo run --bin admin -- stats
//!
//! # Import a filter, one tax number per line
//! cargo run --bin admin -- filter import holders.txt --name "Cluster members"
//!
//! # List and delete filters
//! cargo run --bin admin -- filter list
//! cargo run --bin admin -- filter delete 3
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the server (`DATABASE_URL` or `POSTGRES_*`,
//! `REDIS_HOST`). Writes invalidate cached statistics when Redis is reachable.

use patent_registry::AppError;
use patent_registry::application::services::FilterService;
use patent_registry::application::services::patent_service::ensure_filter;
use patent_registry::config;
use patent_registry::domain::entities::PatentCounts;
use patent_registry::domain::repositories::{PatentRepository, PersonRepository};
use patent_registry::infrastructure::database::{connect_with_retry, run_migrations};
use patent_registry::infrastructure::persistence::{
    PgFilterRepository, PgPatentRepository, PgPersonRepository,
};
use patent_registry::server::build_cache;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for managing patent-registry.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Show patent statistics
    Stats {
        /// Restrict to holders in this filter
        #[arg(short, long)]
        filter: Option<i32>,
    },

    /// Manage tax-number filters
    Filter {
        #[command(subcommand)]
        action: FilterAction,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[derive(Subcommand)]
enum FilterAction {
    /// Import a filter from a text file, one tax number per line
    Import {
        file: PathBuf,

        /// Filter name (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all filters
    List,

    /// Delete a filter
    Delete { id: i32 },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let pool = connect_with_retry(&config)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Db { action } => handle_db_action(action, &pool).await?,
        Commands::Stats { filter } => handle_stats(&pool, filter).await?,
        Commands::Filter { action } => {
            let service = FilterService::new(
                Arc::new(PgFilterRepository::new(Arc::new(pool.clone()))),
                build_cache(&config).await,
            );
            handle_filter_action(action, &service).await?
        }
    }

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
        DbAction::Migrate => {
            println!("{}", "🛠  Applying migrations...".bright_blue());
            run_migrations(pool).await?;
            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

/// Counters printed by `stats`.
struct StatsReport {
    patents: PatentCounts,
    persons: i64,
}

/// Gathers the counters `GET /patents/stats` is built from, plus the person
/// total, all scoped to `filter_id`.
async fn collect_stats(pool: &PgPool, filter_id: Option<i32>) -> Result<StatsReport, AppError> {
    let pool = Arc::new(pool.clone());
    ensure_filter(&PgFilterRepository::new(pool.clone()), filter_id).await?;

    let patents = PgPatentRepository::new(pool.clone()).counts(filter_id).await?;
    let persons = PgPersonRepository::new(pool).counts(filter_id).await?.total;

    Ok(StatsReport { patents, persons })
}

async fn handle_stats(pool: &PgPool, filter_id: Option<i32>) -> Result<()> {
    println!("{}", "📊 Patent statistics".bright_blue().bold());
    if let Some(id) = filter_id {
        println!("  Filter: {}", id.to_string().cyan());
    }
    println!();

    let report = match collect_stats(pool, filter_id).await {
        Ok(report) => report,
        Err(AppError::NotFound { .. }) => {
            println!(
                "{}",
                format!("❌ Filter {} not found", filter_id.unwrap_or_default()).red()
            );
            return Ok(());
        }
        Err(e) => return Err(anyhow::anyhow!("Failed to collect statistics: {}", e)),
    };
    let counts = &report.patents;

    println!(
        "  Patents:              {}",
        counts.total.to_string().bright_green().bold()
    );
    println!(
        "  Russian patents:      {}",
        counts.total_ru.to_string().bright_green().bold()
    );
    println!(
        "  With holders:         {}",
        counts.with_holders.to_string().bright_green().bold()
    );
    println!(
        "  Russian with holders: {}",
        counts.ru_with_holders.to_string().bright_green().bold()
    );
    println!(
        "  Persons:              {}",
        report.persons.to_string().bright_green().bold()
    );

    if !counts.by_kind.is_empty() {
        println!();
        println!("{}", "  By kind:".bright_white());
        for (kind, count) in &counts.by_kind {
            println!("    {:<4} {}", kind.to_string().cyan(), count);
        }
    }
    println!();

    Ok(())
}

async fn handle_filter_action(action: FilterAction, service: &FilterService) -> Result<()> {
    match action {
        FilterAction::Import { file, name, yes } => import_filter(service, file, name, yes).await,
        FilterAction::List => list_filters(service).await,
        FilterAction::Delete { id } => delete_filter(service, id).await,
    }
}

/// Reads tax numbers from `file` and stores them as a filter.
///
/// Blank lines are skipped and duplicates collapse. Any entry that is not a
/// 10 or 12 digit tax number aborts the import.
async fn import_filter(
    service: &FilterService,
    file: PathBuf,
    name: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "📥 Import filter".bright_blue().bold());
    println!();

    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();

    let name = name.or_else(|| {
        file.file_name()
            .map(|n| n.to_string_lossy().into_owned())
    });

    println!("  File:    {}", file.display().to_string().cyan());
    println!(
        "  Name:    {}",
        name.as_deref().unwrap_or("-").to_string().cyan()
    );
    println!("  Entries: {}", lines.len().to_string().bright_white());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Import this filter?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let filter = service.create(name, lines).await.map_err(|e| {
        let info = e.to_error_info();
        anyhow::anyhow!("{}: {}", info.message, info.details)
    })?;

    println!();
    println!("{}", "✅ Filter imported".green().bold());
    println!("  ID:          {}", filter.id.to_string().bright_yellow().bold());
    println!("  Tax numbers: {}", filter.tax_numbers.len());
    println!();
    println!(
        "  Use it with: {}",
        format!("GET /patents?filter_id={}", filter.id).bright_cyan()
    );
    println!();

    Ok(())
}

async fn list_filters(service: &FilterService) -> Result<()> {
    println!("{}", "📋 Filters".bright_blue().bold());
    println!();

    let filters = service
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list filters: {}", e))?;

    if filters.is_empty() {
        println!("{}", "  No filters found".yellow());
        println!();
        println!(
            "  Import one with: {} admin filter import <file>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<30} {:<20} {:<8}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Created".bright_white().bold(),
        "Size".bright_white().bold()
    );
    println!("  {}", "─".repeat(66).bright_black());

    for filter in &filters {
        println!(
            "  {:<5} {:<30} {:<20} {}",
            filter.id.to_string().bright_black(),
            filter.name.as_deref().unwrap_or("-").cyan(),
            filter
                .created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            filter.size
        );
    }

    println!();
    println!(
        "  Total: {}",
        filters.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn delete_filter(service: &FilterService, id: i32) -> Result<()> {
    println!("{}", "🗑  Delete filter".bright_blue().bold());
    println!();

    let filter = service
        .get(id)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("  ID:          {}", filter.id.to_string().bright_black());
    println!(
        "  Name:        {}",
        filter.name.as_deref().unwrap_or("-").cyan()
    );
    println!("  Tax numbers: {}", filter.tax_numbers.len());
    println!();

    let confirmed = Confirm::new()
        .with_prompt("Delete this filter?")
        .default(false)
        .interact()?;

    if !confirmed {
        println!("{}", "❌ Cancelled".red());
        return Ok(());
    }

    service
        .delete(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete filter: {}", e))?;

    println!();
    println!("{}", "✅ Filter deleted".green().bold());
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(pool: &PgPool) -> i32 {
        let persons = [
            ("7701234567", "1027700132195"),
            ("7702345678", "1027700132196"),
        ];
        for (tax_number, ogrn) in persons {
            sqlx::query("INSERT INTO person (tax_number, kind, ogrn, uk) VALUES ($1, 1, $2, 0)")
                .bind(tax_number)
                .bind(ogrn)
                .execute(pool)
                .await
                .unwrap();
        }
        for reg_number in [1, 2] {
            sqlx::query(
                "INSERT INTO patent (kind, reg_number, name, country_code, patent_starting_date) \
                 VALUES (1, $1, 'p', 'RU', DATE '2020-01-10')",
            )
            .bind(reg_number)
            .execute(pool)
            .await
            .unwrap();
        }
        sqlx::query(
            "INSERT INTO ownership (person_tax_number, patent_kind, patent_reg_number) \
             VALUES ('7701234567', 1, 1)",
        )
        .execute(pool)
        .await
        .unwrap();

        let id: i32 =
            sqlx::query_scalar("INSERT INTO tax_number_filter (name) VALUES ('one') RETURNING id")
                .fetch_one(pool)
                .await
                .unwrap();
        sqlx::query(
            "INSERT INTO filter_tax_number (filter_id, tax_number) VALUES ($1, '7701234567')",
        )
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
        id
    }

    #[sqlx::test]
    async fn test_collect_stats_unfiltered(pool: PgPool) {
        seed(&pool).await;

        let report = collect_stats(&pool, None).await.unwrap();
        assert_eq!(report.patents.total, 2);
        assert_eq!(report.persons, 2);
    }

    #[sqlx::test]
    async fn test_collect_stats_scopes_persons_to_filter(pool: PgPool) {
        let id = seed(&pool).await;

        let report = collect_stats(&pool, Some(id)).await.unwrap();
        assert_eq!(report.patents.total, 1);
        assert_eq!(report.persons, 1);
    }

    #[sqlx::test]
    async fn test_collect_stats_unknown_filter(pool: PgPool) {
        seed(&pool).await;

        let err = collect_stats(&pool, Some(9999)).await.err().unwrap();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
