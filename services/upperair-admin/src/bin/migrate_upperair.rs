//! Apply the exported-map schema migrations.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use storage::{migrations, Catalog};
use upperair_admin::cli::CommonArgs;
use upperair_admin::commands::migrate;
use upperair_admin::Output;

#[derive(Parser, Debug)]
#[command(name = "migrate_upperair")]
#[command(about = "Apply pending schema migrations for exported maps")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// PostgreSQL connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Print the migrations and their SQL without connecting
    #[arg(long)]
    plan: bool,

    /// Record the baseline migration as applied when the ledger is empty
    #[arg(long)]
    fake_initial: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = args.common.prepare()?;
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    let all = migrations::all();
    let mut out = Output::stdout();

    if args.plan {
        migrate::print_plan(&all, &mut out)?;
        return Ok(());
    }

    info!(database = %config.redacted_database_url(), "Connecting to database");
    let catalog = Catalog::connect(&config.database_url).await?;
    migrate::run(&catalog, &all, args.fake_initial, &mut out).await?;

    Ok(())
}
