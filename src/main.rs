use clap::Parser;
use reddump::cli::{Config, Runner, die};
use reddump::conf;

#[tokio::main]
async fn main() {
    conf::load_env();
    let config = Config::parse();

    env_logger::Builder::new()
        .filter_level(config.verbosity().log_level_filter())
        .init();

    match Runner::new(config) {
        Ok(runner) => runner.run().await,
        Err(err) => die(1, &format!("Could not set up HTTP client: {err}")),
    }
}
