mod config;
mod dataset;
mod definitions;
mod hard_coded;
mod mediawiki_api;
mod nationality;
mod pipeline;
mod reqwest_client;
mod retry;
mod roster;
#[cfg(test)]
mod test_source;
mod wikitext;

use std::process::ExitCode;

use chrono::Utc;
use dotenv::dotenv;

use crate::{config::Config, dataset::Dataset, pipeline::Pipeline, reqwest_client::RustClient};

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();
    dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let client = match RustClient::new(&config.user_agent) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build http client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let players = Pipeline::new(&client, &config).run().await;
    let dataset = Dataset::assemble(players, Utc::now());

    if let Err(e) = dataset.write_to_file(&config.output_path) {
        log::error!("Failed to write {}: {}", config.output_path.display(), e);
        return ExitCode::FAILURE;
    }
    log::info!("{}", dataset.saved_line(&config.output_path));
    ExitCode::SUCCESS
}
