//! The binary's side of wrk: argument parsing, wiring production components together,
//! and printing. The only code that touches stdout.

mod render;
mod setup;
mod styles;

use chrono::Utc;
use clap::Parser;
use setup::Cli;
use wrk::api::WrkApi;
use wrk::config::{WrkConfig, WrkPaths};
use wrk::error::Result;
use wrk::gateway::trello::TrelloGateway;
use wrk::logging;
use wrk::store::fs_backend::FsBackend;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(logging::resolve_filter(cli.verbose))?;
    styles::configure_colors(cli.no_color);

    if cli.wants_usage() {
        print!("{}", setup::usage());
        return Ok(());
    }

    let paths = WrkPaths::resolve()?;
    let config = WrkConfig::load(&paths.config_dir)?.with_env_overrides();
    tracing::debug!(
        config_dir = %paths.config_dir.display(),
        data_dir = %paths.data_dir.display(),
        api_base = %config.api_base,
        "paths resolved"
    );

    let api = WrkApi::new(FsBackend::new(paths.data_dir), TrelloGateway::new(&config)?);
    let result = api.dispatch(&cli.command)?;
    print!("{}", render::render(&result, Utc::now()));
    Ok(())
}
