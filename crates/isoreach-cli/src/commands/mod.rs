pub mod distance;
pub mod inspect;
pub mod time;

use std::path::Path;

use anyhow::Result;
use isoreach_core::config::{ConfigSource, JobConfig};

use crate::cli::{Cli, Commands, GridFlags};
use crate::output::OutputWriter;

/// Execute the parsed command
pub fn execute(cli: Cli) -> Result<()> {
    let writer = OutputWriter::new(cli.json);
    match cli.command {
        Commands::Distance(args) => distance::run(args, cli.config.as_deref(), &writer),
        Commands::Time(args) => time::run(args, cli.config.as_deref(), &writer),
        Commands::Inspect(args) => inspect::run(args, &writer),
    }
}

/// Assemble the layered job configuration from defaults, an optional
/// config file, the environment, and the shared grid flags.
pub fn job_config(config_path: Option<&Path>, flags: &GridFlags) -> Result<JobConfig> {
    let mut config = JobConfig::with_defaults();
    if let Some(path) = config_path {
        config = config.load_from_file(path)?;
    }
    let mut config = config.load_from_env();

    if let Some(epsg) = flags.epsg {
        config.epsg.update(epsg, ConfigSource::Cli);
    }
    if let Some(cell_side) = flags.cell_side {
        config.cell_side.update(cell_side, ConfigSource::Cli);
    }
    if let Some(rounding_unit) = flags.rounding_unit {
        config.rounding_unit.update(rounding_unit, ConfigSource::Cli);
    }

    Ok(config)
}
