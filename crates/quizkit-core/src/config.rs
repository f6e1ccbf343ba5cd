//! quizkit configuration.
//!
//! Read from `quizkit.toml`. Every field has a default so an absent file is
//! a valid configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level quizkit configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizkitConfig {
    /// Question bank JSON file.
    #[serde(default = "default_bank_path")]
    pub bank_path: PathBuf,
    /// Where reports are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Questions per quiz when not given on the command line.
    #[serde(default = "default_count")]
    pub default_count: usize,
    #[serde(default = "default_true")]
    pub shuffle: bool,
    #[serde(default)]
    pub include_generated: bool,
    #[serde(default)]
    pub hide_module_info: bool,
    /// First line of the PDF report.
    #[serde(default = "default_report_title")]
    pub report_title: String,
    /// Refresh interval of the live question timer.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
}

fn default_bank_path() -> PathBuf {
    PathBuf::from("data/questions.json")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./quizkit-results")
}
fn default_count() -> usize {
    10
}
fn default_true() -> bool {
    true
}
fn default_report_title() -> String {
    "Quiz Summary".to_string()
}
fn default_tick_interval() -> u64 {
    250
}

impl Default for QuizkitConfig {
    fn default() -> Self {
        Self {
            bank_path: default_bank_path(),
            output_dir: default_output_dir(),
            default_count: default_count(),
            shuffle: true,
            include_generated: false,
            hide_module_info: false,
            report_title: default_report_title(),
            tick_interval_ms: default_tick_interval(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not expanded again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut cursor = 0;
    while let Some(offset) = result[cursor..].find("${") {
        let start = cursor + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result = format!(
            "{}{}{}",
            &result[..start],
            value,
            &result[start + end + 1..]
        );
        cursor = start + value.len();
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizkit.toml` in the current directory
/// 2. `~/.config/quizkit/config.toml`
///
/// `QUIZKIT_BANK` overrides the bank path.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizkitConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizkit.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => parse_config_file(&path)?,
        None => QuizkitConfig::default(),
    };

    if let Ok(bank) = std::env::var("QUIZKIT_BANK") {
        config.bank_path = PathBuf::from(bank);
    }

    config.bank_path = resolve_path(&config.bank_path);
    config.output_dir = resolve_path(&config.output_dir);
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

fn parse_config_file(path: &Path) -> Result<QuizkitConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<QuizkitConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizkit"))
}
