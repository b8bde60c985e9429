use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_API_BASE_URL: &str = "https://hack-or-snooze-v3.herokuapp.com";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub api_base_url: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,
    pub page_path: Option<PathBuf>,
    pub open_command: Option<String>,
    pub header: Option<String>,
}

/// Login details read from config. Both halves must be present.
#[derive(Debug, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub api_base_url: String,
    pub credentials: Option<Credentials>,
    pub page_path: PathBuf,
    pub open_command: Option<String>,
    pub header: Option<String>,
}

pub fn load(
    config_override: Option<String>,
    page_override: Option<String>,
) -> Result<RuntimeConfig> {
    let parsed = match config_override {
        Some(path_str) => {
            let p = PathBuf::from(&path_str);
            if !p.is_file() {
                bail!("config file not found: {}", path_str);
            }
            read_config(&p)?
        }
        None => match default_config_path() {
            Some(path) if path.is_file() => read_config(&path)?,
            _ => AppConfig::default(),
        },
    };
    resolve(parsed, page_override.map(PathBuf::from))
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let txt = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str(&txt).with_context(|| format!("failed to parse toml: {}", path.display()))
}

fn resolve(cfg: AppConfig, page_override: Option<PathBuf>) -> Result<RuntimeConfig> {
    let credentials = match (cfg.username, cfg.token) {
        (Some(username), Some(token)) if !username.is_empty() && !token.is_empty() => {
            Some(Credentials { username, token })
        }
        (Some(_), None) | (None, Some(_)) => {
            bail!("config needs both `username` and `token` to log in")
        }
        _ => None,
    };
    Ok(RuntimeConfig {
        api_base_url: cfg
            .api_base_url
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        credentials,
        page_path: page_override
            .or(cfg.page_path)
            .unwrap_or_else(|| env::temp_dir().join("snooze-news.html")),
        open_command: cfg.open_command,
        header: cfg.header,
    })
}

fn default_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let mut p = PathBuf::from(xdg);
        p.push("snooze-news");
        p.push("config.toml");
        return Some(p);
    }
    if let Ok(home) = env::var("HOME") {
        let mut p = PathBuf::from(home);
        p.push(".config");
        p.push("snooze-news");
        p.push("config.toml");
        return Some(p);
    }
    None
}
