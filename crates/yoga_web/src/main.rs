//! Registration server entry point.

use log::error;
use std::process::ExitCode;
use yoga_core::init_logging;
use yoga_web::{run, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::default();

    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("logging disabled: {err}");
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=server_exit module=web status=error error={err}");
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
