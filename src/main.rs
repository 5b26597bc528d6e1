use std::process;

use productivity_loss::cli;
use productivity_loss::store::NetcdfStore;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .init();

    let config_path = cli::config_path_from_env();
    process::exit(cli::run(&NetcdfStore::new(), &config_path));
}
