use std::env;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::batch::run_batch;
use crate::config::{RunConfig, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use crate::error::Result;
use crate::store::GridStore;

/// Config file location: `$PRODUCTIVITY_LOSS_CONFIG` or the default path.
pub fn config_path_from_env() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Run every job of `config` in order, stopping at the first failure.
pub fn run_config<S: GridStore>(store: &S, config: &RunConfig) -> Result<()> {
    // resolve every template before touching the filesystem
    let jobs = config.jobs()?;
    for job in jobs {
        if let Some(scenario) = &job.scenario {
            info!("Scenario: {scenario}");
        }
        info!("Input : {}", job.batch.input_dir.display());
        info!("Output: {}", job.batch.output_dir.display());
        run_batch(store, &job.batch)?;
    }
    Ok(())
}

/// Load the config at `config_path` and run it. Returns the process exit code.
pub fn run<S: GridStore>(store: &S, config_path: &Path) -> i32 {
    let config = match RunConfig::load(config_path) {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            return 1;
        }
    };
    match run_config(store, &config) {
        Ok(()) => 0,
        Err(err) => {
            error!("batch run failed: {err}");
            1
        }
    }
}
