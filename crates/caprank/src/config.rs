//! Layered configuration for the server and seed binaries.
//!
//! Sources, lowest precedence first: built-in defaults, the optional TOML
//! file named by `--config`, then `CAPRANK_*` environment variables
//! (`CAPRANK_STORE_PATH`, `CAPRANK_HOST`, `CAPRANK_PORT`).

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "caprank.toml";
pub const DEFAULT_STORE_PATH: &str = "data/market_caps.sqlite";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// Bind address for the HTTP server.
  pub host:       String,
  pub port:       u16,
  /// SQLite file shared by the seed and server processes. A leading `~/` is
  /// expanded against `$HOME`.
  pub store_path: PathBuf,
}

impl Settings {
  /// Read settings from `path` (if it exists) and the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .set_default("host", DEFAULT_HOST)?
      .set_default("port", i64::from(DEFAULT_PORT))?
      .set_default("store_path", DEFAULT_STORE_PATH)?
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("CAPRANK"))
      .build()?
      .try_deserialize()
  }

  /// The store path with `~` expanded.
  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }

  /// `host:port`, ready for `TcpListener::bind`.
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~/` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
