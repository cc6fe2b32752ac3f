//! Settings resolution: CLI flag, then config file, then default.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eduacces_client::{DEFAULT_BASE_URL, SessionStore, session::state_dir};
use serde::Deserialize;

/// Rows per table page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Shape of the optional TOML config file.
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
  #[serde(default)]
  pub url:          Option<String>,
  #[serde(default)]
  pub session_path: Option<PathBuf>,
  #[serde(default)]
  pub page_size:    Option<usize>,
}

impl ConfigFile {
  pub fn load(path: &Path) -> Result<Self> {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config file {}", path.display()))
  }
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
  pub base_url:     String,
  pub session_path: PathBuf,
  pub page_size:    usize,
  pub log_file:     PathBuf,
}

/// The pieces of [`Settings`] that can come from the command line.
#[derive(Debug, Default)]
pub struct Overrides {
  pub url:      Option<String>,
  pub session:  Option<PathBuf>,
  pub log_file: Option<PathBuf>,
}

impl Settings {
  pub fn resolve(cli: Overrides, file: ConfigFile) -> Result<Self> {
    let base_url = cli
      .url
      .or(file.url)
      .filter(|u| !u.trim().is_empty())
      .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let session_path = match cli.session.or(file.session_path) {
      Some(path) => path,
      None => SessionStore::default_path()
        .context("cannot locate a state directory; pass --session or set HOME")?,
    };

    let log_file = match cli.log_file {
      Some(path) => path,
      None => state_dir()
        .map(|dir| dir.join("eduacces.log"))
        .context("cannot locate a state directory; pass --log-file or set HOME")?,
    };

    let page_size = file.page_size.filter(|n| *n > 0).unwrap_or(DEFAULT_PAGE_SIZE);

    Ok(Self { base_url, session_path, page_size, log_file })
  }
}
