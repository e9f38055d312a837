//! Flags shared by every admin binary.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::config::AdminConfig;
use crate::logging;

#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// YAML configuration file
    #[arg(long, env = "UPPERAIR_ADMIN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Disable colored output (`NO_COLOR` is honoured by the terminal styling)
    #[arg(long)]
    pub no_color: bool,
}

impl CommonArgs {
    /// Initialize logging and output styling, then load the configuration.
    pub fn prepare(&self) -> Result<AdminConfig> {
        logging::init_tracing(&self.log_level)?;

        if self.no_color {
            colored::control::set_override(false);
        }

        let config = AdminConfig::load(self.config.as_deref())?;
        Ok(config)
    }
}
