//! Print a summary of upper-air stations and reports in the database.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use storage::Catalog;
use upperair_admin::cli::CommonArgs;
use upperair_admin::commands::check_data;
use upperair_admin::Output;

#[derive(Parser, Debug)]
#[command(name = "check_upperair_data")]
#[command(about = "Check upper air data in the database")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = args.common.prepare()?;
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    info!(database = %config.redacted_database_url(), "Connecting to database");
    let catalog = Catalog::connect(&config.database_url).await?;

    let mut out = Output::stdout();
    check_data::run(&catalog, &mut out).await?;

    Ok(())
}
