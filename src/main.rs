use clap::Parser;
use xpost::cli::{self, Config, Runner};

#[tokio::main]
async fn main() {
    let config = Config::parse();
    env_logger::Builder::from_default_env()
        .filter_level(config.verbosity().log_level_filter())
        .init();

    if let Err(err) = Runner::new(config).run().await {
        cli::die(err.exit_code(), &err.to_string());
    }
}
