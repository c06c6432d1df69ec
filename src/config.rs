use anyhow::{Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-sonnet-20240620";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

const CONFIG_DIR_NAME: &str = "imobchat";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub config_path: PathBuf,
    pub config_is_explicit: bool,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
    pub anthropic_base_url: String,
    pub listings_file: Option<PathBuf>,
    pub visits_file: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFileConfig {
    anthropic_api_key: Option<String>,
    anthropic_model: Option<String>,
    anthropic_base_url: Option<String>,
    listings_file: Option<PathBuf>,
    visits_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_path(None)
    }

    pub fn load_with_path(explicit_path: Option<&Path>) -> Result<Self> {
        let (config_path, config_is_explicit) = match explicit_path {
            Some(path) => (path.to_path_buf(), true),
            None => (discover_config_path()?, false),
        };

        if config_is_explicit && !config_path.is_file() {
            bail!(
                "Failed to load config {}: file not found",
                config_path.display()
            );
        }

        let file_config = load_file_config(&config_path)?;

        // .env values only fill in variables the shell did not set.
        dotenvy::dotenv().ok();

        let file_api_key = file_config
            .as_ref()
            .and_then(|cfg| cfg.anthropic_api_key.as_ref())
            .and_then(|value| non_empty(value).map(ToOwned::to_owned));
        let file_model = file_config
            .as_ref()
            .and_then(|cfg| cfg.anthropic_model.as_ref())
            .and_then(|value| non_empty(value).map(ToOwned::to_owned));
        let file_base_url = file_config
            .as_ref()
            .and_then(|cfg| cfg.anthropic_base_url.as_ref())
            .and_then(|value| non_empty(value).map(ToOwned::to_owned));
        let listings_file = file_config
            .as_ref()
            .and_then(|cfg| cfg.listings_file.clone());
        let visits_file = file_config.as_ref().and_then(|cfg| cfg.visits_file.clone());

        Ok(Self {
            config_path,
            config_is_explicit,
            anthropic_api_key: env_non_empty("ANTHROPIC_API_KEY").or(file_api_key),
            anthropic_model: env_non_empty("ANTHROPIC_MODEL")
                .or(file_model)
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
            anthropic_base_url: env_non_empty("ANTHROPIC_BASE_URL")
                .or(file_base_url)
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_BASE_URL.to_string()),
            listings_file,
            visits_file,
        })
    }
}

fn discover_config_path() -> Result<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let trimmed = xdg.trim();
        if trimmed.is_empty() {
            bail!("Failed to resolve config path: XDG_CONFIG_HOME is set but empty");
        }

        return Ok(PathBuf::from(trimmed)
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME));
    }

    let home = dirs::home_dir()
        .ok_or_else(|| anyhow!("Failed to resolve config path: HOME directory is unavailable"))?;

    Ok(home
        .join(".config")
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME))
}

fn load_file_config(config_path: &Path) -> Result<Option<RawFileConfig>> {
    if !config_path.is_file() {
        return Ok(None);
    }

    let config_text = fs::read_to_string(config_path).map_err(|err| {
        anyhow!(
            "Failed to load config {}: unable to read file: {err}",
            config_path.display()
        )
    })?;

    toml::from_str(&config_text)
        .map(Some)
        .map_err(|err| anyhow!("Failed to load config {}: {err}", config_path.display()))
}

fn env_non_empty(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}
