mod app;

use app::Command;
use clap::Parser;
use std::process::ExitCode;

const VERSION: &str = concat!(
    env!("GCP_IAP_SSH_VERSION"),
    " ",
    env!("GCP_IAP_SSH_BUILD_HASH")
);

#[derive(Parser)]
#[command(
    name = "gcp-iap-ssh",
    version = VERSION,
    about = "Configure SSH access to Compute Engine instances through IAP"
)]
struct Arguments {
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let arguments = Arguments::parse();

    match app::run(arguments.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{e:?}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
