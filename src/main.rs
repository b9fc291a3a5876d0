use std::process::ExitCode;

use clap::Parser;
use slack_uploader::cli::Args;
use slack_uploader::core::config::AppConfig;
use slack_uploader::{SlackClient, Uploader};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    slack_uploader::setup_logging(args.log_format());

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    let uploader = Uploader::new(SlackClient::new(&config)?);

    let outcome = uploader.upload(&args.to_request()).await?;
    info!("Upload finished: {:?}", outcome);

    Ok(())
}
