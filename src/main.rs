use std::process::ExitCode;

mod app;
mod cli;
mod commands;
mod context;
mod error;
mod models;
mod provision;
mod schema;
mod seed;
mod storage;
mod tracing;

fn main() -> ExitCode {
    tracing::init();

    match app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
