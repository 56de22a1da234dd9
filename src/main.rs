use std::path::Path;

use clap::Parser;
use log::info;

use csvql::api::CsvqlApi;
use csvql::conf::Config;
use csvql::core::{CliArgs, setup_logging};
use csvql::service::CsvqlService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    info!(args = args; "csvql started.");

    let config = match &args.config {
        Some(path) => Config::from_file(Path::new(path))?,
        None => Config::from_env()?,
    };
    let addr = config.server.addr();

    CsvqlApi::new(CsvqlService::new(config)).serve(&addr).await?;
    info!("csvql stopped.");
    Ok(())
}
