use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Environment variable consulted for the provider API key.
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

/// API key baked in at build time, if `VIDCAT_API_KEY` was set for `cargo build`.
const BUILD_API_KEY: Option<&str> = option_env!("VIDCAT_API_KEY");

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub theme_name: Option<String>,
  pub api_key: Option<String>,
  pub api_base_url: Option<String>,
}

fn project_dirs() -> Option<ProjectDirs> {
  ProjectDirs::from("", "", "vidcat")
}

/// Directory for the log file; falls back to the temp dir.
pub fn log_dir() -> PathBuf {
  project_dirs().map(|d| d.cache_dir().to_path_buf()).unwrap_or_else(std::env::temp_dir)
}

impl Config {
  pub fn load() -> Self {
    if let Some(proj_dirs) = project_dirs() {
      let config_file = proj_dirs.config_dir().join("prefs.toml");
      if let Ok(content) = std::fs::read_to_string(&config_file) {
        match toml::from_str(&content) {
          Ok(config) => return config,
          Err(e) => warn!(path = %config_file.display(), err = %e, "config: ignoring unreadable prefs"),
        }
      }
    }
    Self::default()
  }

  pub fn save(&self) {
    if let Some(proj_dirs) = project_dirs() {
      let config_dir = proj_dirs.config_dir();
      if std::fs::create_dir_all(config_dir).is_ok() {
        let config_file = config_dir.join("prefs.toml");
        if let Ok(content) = toml::to_string(self) {
          let _ = std::fs::write(config_file, content);
        }
      }
    }
  }

  /// Pick the API key: CLI flag, then environment, then prefs file, then
  /// the build-time key. Blank values are skipped.
  pub fn resolve_api_key(&self, cli: Option<&str>, env: Option<&str>) -> Option<String> {
    [cli, env, self.api_key.as_deref(), BUILD_API_KEY]
      .into_iter()
      .flatten()
      .map(str::trim)
      .find(|k| !k.is_empty())
      .map(str::to_string)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn with_key(key: Option<&str>) -> Config {
    Config { api_key: key.map(str::to_string), ..Config::default() }
  }

  #[test]
  fn cli_key_wins() {
    let config = with_key(Some("file"));
    assert_eq!(config.resolve_api_key(Some("cli"), Some("env")), Some("cli".to_string()));
  }

  #[test]
  fn env_key_beats_file() {
    let config = with_key(Some("file"));
    assert_eq!(config.resolve_api_key(None, Some("env")), Some("env".to_string()));
  }

  #[test]
  fn file_key_used_last() {
    let config = with_key(Some("file"));
    assert_eq!(config.resolve_api_key(None, None), Some("file".to_string()));
  }

  #[test]
  fn blank_keys_are_skipped() {
    let config = with_key(Some("file"));
    assert_eq!(config.resolve_api_key(Some("  "), Some("")), Some("file".to_string()));
  }

  #[test]
  fn prefs_round_trip_through_toml() {
    let config = Config {
      theme_name: Some("Forest".to_string()),
      api_key: None,
      api_base_url: Some("http://localhost:8080".to_string()),
    };
    let text = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
  }

  #[test]
  fn prefs_fields_are_optional() {
    let parsed: Config = toml::from_str("theme_name = \"Ocean\"\n").unwrap();
    assert_eq!(parsed.theme_name.as_deref(), Some("Ocean"));
    assert!(parsed.api_key.is_none());
  }
}
