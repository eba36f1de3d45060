use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the daybook home directory with an initial `config.json` and an empty storage
/// directory.
///
/// # Errors
/// - Returns an error if the directory is already initialized or any file operation fails.
pub fn init(home: &Path) -> Result<Out<()>> {
    let config =
        Config::create(home).context("Unable to create the data directory and config")?;
    Ok(format!(
        "Successfully created the daybook directory at '{}'",
        config.root().display()
    )
    .into())
}
