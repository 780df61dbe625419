use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, its backups subdirectory and an initial `config.json`.
///
/// # Arguments
/// - `home` - The directory that will be the root of data directory, e.g. `$HOME/expense-tracker`
///
/// # Errors
/// - Returns an error if the directory has already been initialized.
/// - Returns an error if any file operations fail.
pub async fn init(home: &Path) -> Result<Out<()>> {
    let config = Config::create(home)
        .await
        .context("Unable to create the data directory and configs")?;
    Ok(format!(
        "Successfully created the expense tracker directory at {}",
        config.root().display()
    )
    .into())
}
