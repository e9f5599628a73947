use partcheck_core::logging;

mod cli;

use crate::cli::{CliCommand, Outcome};

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; stderr if the log file is unavailable.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    // Parse CLI and dispatch. 1 = checksum mismatch, 2 = could not verify.
    match CliCommand::run_from_args().await {
        Ok(Outcome::Matched) => {}
        Ok(Outcome::Mismatched) => std::process::exit(1),
        Err(err) => {
            eprintln!("partcheck error: {:#}", err);
            std::process::exit(2);
        }
    }
}
