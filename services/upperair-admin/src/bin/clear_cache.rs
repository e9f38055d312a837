//! Clear the application cache store, optionally listing keys first.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use storage::open_cache;
use upperair_admin::cli::CommonArgs;
use upperair_admin::commands::clear_cache;
use upperair_admin::Output;

#[derive(Parser, Debug)]
#[command(name = "clear_cache")]
#[command(about = "Clear the cache store (including upper air and surface data cache)")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Display cache keys before clearing
    #[arg(long)]
    keys: bool,

    /// Cache URL (redis://host:port or dummy://)
    #[arg(long, env = "CACHE_URL")]
    cache_url: Option<String>,

    /// Key prefix the web application's cache writes with
    #[arg(long, env = "CACHE_KEY_PREFIX")]
    cache_key_prefix: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = args.common.prepare()?;
    if let Some(url) = args.cache_url {
        config.cache_url = url;
    }
    if let Some(prefix) = args.cache_key_prefix {
        config.cache_key_prefix = prefix;
    }

    let cache = open_cache(&config.cache_url, &config.cache_key_prefix).await?;
    info!(backend = cache.name(), "Opened cache");

    let mut out = Output::stdout();
    clear_cache::run(cache.as_ref(), args.keys, &mut out).await?;

    Ok(())
}
