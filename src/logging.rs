//! Log backend setup.
//!
//! The terminal belongs to the user interface while the game runs, so log records are only
//! written when a log file is requested. The filter defaults to `info` and follows `RUST_LOG`.

use std::{fs::File, path::Path};

use color_eyre::eyre::{Result, WrapErr as _};
use env_logger::{Builder, Env, Target};

/// Installs the global logger writing to `path`, if one is given.
///
/// # Errors
///
/// This function returns an error if the file cannot be created or if a global logger is already
/// installed.
pub fn init(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };

    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .wrap_err("failed to install logger")
}
