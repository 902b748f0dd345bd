use std::io;
use clap::Parser;
use dotenv::dotenv;
use tracing::info;
use crate::config::Config;

pub mod config;
pub mod controller;
pub mod helpers;
pub mod models;
pub mod repositories;

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let config = Config::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(config.log_level)
        .init();

    if config.show_trace {
        return controller::show_trace(&config);
    }

    let outcome = controller::run_session(&config)?;
    info!("Session finished: {:?}", outcome);
    Ok(())
}
