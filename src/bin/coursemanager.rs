use lib::course_client::{backend::RestBackend, models::Args, run_tool};

use std::{error::Error, io, time::Duration};

use clap::Parser;
use log::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    /* Setup logging */
    env_logger::builder()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .init();

    /* Get all the required resources */
    let args = Args::parse();
    let config = run_tool::read_config(&args.config_json_path)?;
    let mut http_client = reqwest::Client::builder();
    if let Some(secs) = config.request_timeout_secs {
        http_client = http_client.timeout(Duration::from_secs(secs));
    }
    let backend = RestBackend::new(http_client.build()?, &config.api_base_url);
    info!("Using course manager at {}", config.api_base_url);

    /* Drive the requested screen */
    run_tool::run(backend, &args.command, &config, &mut io::stdout()).await
}
