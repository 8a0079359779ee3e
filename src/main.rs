mod app;
mod chart;
mod cli;
mod color;
mod data;
mod error;
mod pipeline;
mod render;
mod sink;
mod ui;

use std::process::ExitCode;

use clap::Parser;

use crate::error::DataLoadError;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = cli::Cli::parse();
    let config = cli.command.into_config();

    match pipeline::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("error: {err:#}");
            if err.chain().any(|cause| cause.is::<DataLoadError>()) {
                eprintln!(
                    "hint: check that the simulator wrote its output as CSV \
                     (header row, comma separated) in the encoding passed with --encoding"
                );
            }
            ExitCode::FAILURE
        }
    }
}
