mod error;
mod graphics;
mod input;
mod math;
mod settings;
mod state;
mod terminal;
mod theme;
mod widget;

use clap::Parser;
use settings::{Args, Settings};

/// Main function
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let settings = Settings::from_args(Args::parse())?;
    log::debug!("starting with {settings:?}");

    terminal::run(&settings)?;

    Ok(())
}
