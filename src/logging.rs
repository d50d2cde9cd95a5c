//! Log output setup.

use std::{fs::File, sync::Mutex};

use color_eyre::eyre::{eyre, Result, WrapErr as _};

use crate::Config;

/// Installs the global log subscriber described by the configuration.
///
/// The terminal belongs to the game while it runs, so logs only ever go to the configured file.
/// Without a log file no subscriber is installed and every log statement is a no-op.
///
/// # Errors
///
/// This function returns an error if the log file cannot be created or a global subscriber is
/// already installed.
pub fn init_logging(config: &Config) -> Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(config.log_level)
        .try_init()
        .map_err(|err| eyre!("failed to install log subscriber: {err}"))
}
