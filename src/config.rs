use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct Config {
  pub api_key: Option<String>,
  pub theme_name: Option<String>,
}

impl Config {
  pub fn load() -> Self {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "scout") {
      let config_file = proj_dirs.config_dir().join("prefs.toml");
      if let Ok(content) = std::fs::read_to_string(config_file)
        && let Ok(config) = toml::from_str(&content)
      {
        return config;
      }
    }
    Self::default()
  }

  pub fn save(&self) {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "scout") {
      let config_dir = proj_dirs.config_dir();
      if std::fs::create_dir_all(config_dir).is_ok() {
        let config_file = config_dir.join("prefs.toml");
        if let Ok(content) = toml::to_string(self) {
          let _ = std::fs::write(config_file, content);
        }
      }
    }
  }
}

/// Resolve the API key: `--api-key` flag first, then the `YT_API_KEY`
/// environment variable, then the prefs file. Blank values are ignored so a
/// stray empty export doesn't mask the stored key.
pub fn resolve_api_key(flag: Option<&str>, env: Option<&str>, stored: Option<&str>) -> Option<String> {
  [flag, env, stored]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|k| !k.is_empty())
    .map(str::to_string)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn flag_wins_over_env_and_stored() {
    assert_eq!(resolve_api_key(Some("flag"), Some("env"), Some("stored")), Some("flag".to_string()));
  }

  #[test]
  fn env_wins_over_stored() {
    assert_eq!(resolve_api_key(None, Some("env"), Some("stored")), Some("env".to_string()));
  }

  #[test]
  fn blank_values_are_skipped() {
    assert_eq!(resolve_api_key(Some("  "), Some(""), Some("stored")), Some("stored".to_string()));
    assert_eq!(resolve_api_key(None, None, None), None);
  }
}
