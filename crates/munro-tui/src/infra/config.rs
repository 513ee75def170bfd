//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::warn;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));

/// Layered configuration loaded from defaults, the user config file, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: Api,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub keybindings: Keybindings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Api {
    #[serde(default = "Api::default_url")]
    pub url: String,
    #[serde(default = "Api::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Api {
    fn default_url() -> String {
        "https://munroapi.herokuapp.com/munros".to_owned()
    }

    fn default_timeout_secs() -> u64 {
        30
    }
}

impl Default for Api {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            timeout_secs: Self::default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ui {
    #[serde(default = "Ui::default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

impl Ui {
    fn default_tick_rate_ms() -> u64 {
        120
    }
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            tick_rate_ms: Self::default_tick_rate_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keybindings {
    #[serde(default = "Keybindings::default_up")]
    pub up: String,
    #[serde(default = "Keybindings::default_down")]
    pub down: String,
    #[serde(default = "Keybindings::default_select")]
    pub select: String,
    #[serde(default = "Keybindings::default_filter")]
    pub filter: String,
    #[serde(default = "Keybindings::default_retry")]
    pub retry: String,
}

impl Keybindings {
    fn default_up() -> String {
        "k".into()
    }

    fn default_down() -> String {
        "j".into()
    }

    fn default_select() -> String {
        "enter".into()
    }

    fn default_filter() -> String {
        "/".into()
    }

    fn default_retry() -> String {
        "r".into()
    }
}

impl Default for Keybindings {
    fn default() -> Self {
        Self {
            up: Self::default_up(),
            down: Self::default_down(),
            select: Self::default_select(),
            filter: Self::default_filter(),
            retry: Self::default_retry(),
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    url: Option<String>,
    timeout_secs: Option<u64>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            url: env::var("MUNRO_API_URL").ok(),
            timeout_secs: env::var("MUNRO_API_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| parse_timeout_override(&raw)),
        }
    }

    #[cfg(test)]
    fn for_tests(url: &str, timeout_secs: u64) -> Self {
        Self {
            url: Some(url.to_owned()),
            timeout_secs: Some(timeout_secs),
        }
    }
}

impl Config {
    /// Load configuration from defaults, the user config file, and env
    /// overrides, in increasing precedence.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        Self::load_with_layers(user_config_path(), env)
    }

    fn load_with_layers(user: Option<PathBuf>, env_overrides: EnvOverrides) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(user_path) = user.filter(|path| path.exists()) {
            layers.push(Self::from_file(&user_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            api: merge_api(self.api, other.api),
            ui: merge_ui(self.ui, other.ui),
            keybindings: merge_keybindings(self.keybindings, other.keybindings),
        }
    }
}

fn merge_api(base: Api, overlay: Api) -> Api {
    Api {
        url: if overlay.url != Api::default_url() {
            overlay.url
        } else {
            base.url
        },
        timeout_secs: if overlay.timeout_secs != Api::default_timeout_secs() {
            overlay.timeout_secs
        } else {
            base.timeout_secs
        },
    }
}

fn merge_ui(base: Ui, overlay: Ui) -> Ui {
    Ui {
        tick_rate_ms: if overlay.tick_rate_ms != Ui::default_tick_rate_ms() {
            overlay.tick_rate_ms
        } else {
            base.tick_rate_ms
        },
    }
}

fn merge_keybindings(base: Keybindings, overlay: Keybindings) -> Keybindings {
    Keybindings {
        up: choose_keybinding(base.up, overlay.up, Keybindings::default_up),
        down: choose_keybinding(base.down, overlay.down, Keybindings::default_down),
        select: choose_keybinding(base.select, overlay.select, Keybindings::default_select),
        filter: choose_keybinding(base.filter, overlay.filter, Keybindings::default_filter),
        retry: choose_keybinding(base.retry, overlay.retry, Keybindings::default_retry),
    }
}

fn choose_keybinding(base: String, overlay: String, default_fn: fn() -> String) -> String {
    if overlay != default_fn() { overlay } else { base }
}

fn parse_timeout_override(raw: &str) -> Option<u64> {
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(value = raw, "ignoring unparsable MUNRO_API_TIMEOUT_SECS");
            None
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("munro-tui/config.toml"))
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(url) = env.url {
        config.api.url = url;
    }
    if let Some(timeout_secs) = env.timeout_secs {
        config.api.timeout_secs = timeout_secs;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config =
            Config::load_with_layers(None, EnvOverrides::default()).expect("load default config");
        assert_eq!(config.api.url, "https://munroapi.herokuapp.com/munros");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.keybindings.select, "enter");
    }

    #[test]
    fn user_file_overrides_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let user = temp.path().join("config.toml");
        fs::write(
            &user,
            r#"
[api]
url = "http://localhost:8080/munros"
[keybindings]
select = "space"
"#,
        )?;

        let config = Config::load_with_layers(Some(user), EnvOverrides::default())?;

        assert_eq!(config.api.url, "http://localhost:8080/munros");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.keybindings.select, "space");
        assert_eq!(config.keybindings.up, "k");

        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("http://127.0.0.1:9999/munros", 5);
        let config = Config::load_with_layers(None, overrides)?;
        assert_eq!(config.api.url, "http://127.0.0.1:9999/munros");
        assert_eq!(config.api.timeout_secs, 5);
        Ok(())
    }

    #[test]
    fn unparsable_timeout_override_is_dropped() {
        assert_eq!(parse_timeout_override("5"), Some(5));
        assert_eq!(parse_timeout_override("five"), None);
        assert_eq!(parse_timeout_override(""), None);
        assert_eq!(parse_timeout_override("-1"), None);
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = Config::from_file(&file);
        assert!(result.is_err());
        Ok(())
    }
}
