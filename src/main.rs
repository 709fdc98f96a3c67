use clap::Parser;
use dotenvy::dotenv;
use refdata_seeder::config::{database, fixtures};
use refdata_seeder::core::batch::DEFAULT_BATCH_SIZE;
use refdata_seeder::core::runner::{self, RunOptions, SeederKind};
use refdata_seeder::errors::Result;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Loads reference data (languages, countries, currencies...) into the platform database
#[derive(Debug, Parser)]
#[command(name = "refdata-seeder")]
#[command(version, long_about = None)]
struct Cli {
    /// Database URL; falls back to DATABASE_URL, then a local SQLite file
    #[arg(long, value_name = "URL")]
    database_url: Option<String>,

    /// Fixture file to load instead of the built-in dataset
    #[arg(long, value_name = "PATH", env = "SEED_FIXTURES_PATH")]
    fixtures: Option<PathBuf>,

    /// Rows per INSERT statement for the country/language import
    #[arg(long, value_name = "ROWS", env = "SEED_BATCH_SIZE", default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Delete existing country/language associations before importing them
    #[arg(long)]
    fresh: bool,

    /// Run only this seeder (repeatable); dependency order is kept
    #[arg(long, value_name = "SEEDER")]
    only: Vec<SeederKind>,

    /// List the seeders in run order and exit
    #[arg(long)]
    list: bool,
}

impl Cli {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            batch_size: self.batch_size,
            fresh: self.fresh,
            only: self.only.clone(),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file before parsing, so env-backed flags see it
    dotenv().ok();
    let cli = Cli::parse();

    if cli.list {
        for kind in SeederKind::ALL {
            println!("{kind}");
        }
        return Ok(());
    }

    // 3. Load the fixture dataset
    let fixtures = fixtures::load_fixtures_or_embedded(cli.fixtures.as_deref())
        .inspect(|f| info!("Loaded {} fixture records.", f.record_count()))
        .inspect_err(|e| error!("Failed to load fixtures: {}", e))?;

    // 4. Connect and make sure the schema exists
    let database_url = cli
        .database_url
        .clone()
        .unwrap_or_else(database::get_database_url);
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed
    let report = runner::run(&db, &fixtures, &cli.run_options())
        .await
        .inspect(|_| info!("Seeding finished."))
        .inspect_err(|e| error!("Seeding failed: {}", e))?;

    print!("{}", runner::format_run_summary(&report));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_repeated_only() {
        let cli = Cli::try_parse_from([
            "refdata-seeder",
            "--only",
            "languages",
            "--only",
            "country-languages",
            "--batch-size",
            "50",
            "--fresh",
        ])
        .unwrap();

        let options = cli.run_options();
        assert_eq!(options.batch_size, 50);
        assert!(options.fresh);
        assert_eq!(
            options.only,
            vec![SeederKind::Languages, SeederKind::CountryLanguages]
        );
    }

    #[test]
    fn test_cli_rejects_unknown_seeder() {
        assert!(Cli::try_parse_from(["refdata-seeder", "--only", "users"]).is_err());
    }
}
