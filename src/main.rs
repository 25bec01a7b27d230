//! This crate contains the source code for the binary for the game mazerun.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use log::info;
use mazerun::{logging, App, Config};

fn main() -> Result<()> {
    install()?;

    let config = Config::parse();
    logging::init(config.log_file.as_deref())?;
    let mut app = App::new(&config)?;
    info!(
        "starting {} {}x{} game at wall probability {}",
        config.mode,
        config.width,
        config.height,
        config.wall_probability()
    );

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    result
}
