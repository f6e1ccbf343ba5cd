pub mod add;
pub mod answer;
pub mod init;
pub mod modules;
pub mod take;
pub mod validate;

use std::path::PathBuf;

use anyhow::Result;

use quizkit_core::config::{load_config_from, QuizkitConfig};

/// The bank given on the command line, else the configured one.
pub(crate) fn resolve_bank(
    bank: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<(PathBuf, QuizkitConfig)> {
    let config = load_config_from(config_path.as_deref())?;
    let bank = bank.unwrap_or_else(|| config.bank_path.clone());
    Ok((bank, config))
}
