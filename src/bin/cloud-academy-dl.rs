//! cloud-academy-dl CLI - download a Cloud Academy course module.

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::process::ExitCode;

use clap::Parser;
use cloud_academy_dl::cli::{self, Args};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    cli::init_logging(args.verbose);

    match cli::run(&args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.is_config() {
                log::debug!("{e:?}");
            }
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
