//! Run the upper-air fetch task now instead of waiting for the scheduler.

use anyhow::Result;
use clap::Parser;
use tracing::info;

use upperair_admin::cli::CommonArgs;
use upperair_admin::commands::fetch;
use upperair_admin::{HttpTaskTrigger, Output};

#[derive(Parser, Debug)]
#[command(name = "fetch_upperair")]
#[command(about = "Manually fetch upper air data and populate the database")]
struct Args {
    #[command(flatten)]
    common: CommonArgs,

    /// Base URL of the web application's task runner
    #[arg(long, env = "TASK_RUNNER_URL")]
    task_runner_url: Option<String>,

    /// Seconds to wait for the task to finish
    #[arg(long, env = "TASK_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut config = args.common.prepare()?;
    if let Some(url) = args.task_runner_url {
        config.task_runner_url = url;
    }
    if let Some(secs) = args.timeout_secs {
        config.task_timeout_secs = secs;
    }

    let trigger = HttpTaskTrigger::new(&config.task_runner_url, config.task_timeout())?;
    info!(endpoint = trigger.endpoint(), "Using task runner");

    let mut out = Output::stdout();
    fetch::run(&trigger, &mut out).await?;

    Ok(())
}
