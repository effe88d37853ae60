use std::process::ExitCode;

use tracing::error;

mod bootstrap;
mod loop_runner;

pub(crate) fn run() -> ExitCode {
    match bootstrap::build_app() {
        Ok(session) => loop_runner::run(session),
        Err(err) => {
            error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}
