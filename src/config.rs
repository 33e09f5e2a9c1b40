use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub client_id: String,
    #[serde(default = "default_callback_port")]
    pub callback_port: u16,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_accounts_url")]
    pub accounts_url: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_callback_port() -> u16 {
    8888
}

fn default_scope() -> String {
    "user-modify-playback-state user-read-playback-state".to_string()
}

fn default_accounts_url() -> String {
    "https://accounts.spotify.com".to_string()
}

fn default_api_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            client_id: "630ac25f2b4241e980dfe5b825b24980".to_string(),
            callback_port: default_callback_port(),
            scope: default_scope(),
            accounts_url: default_accounts_url(),
            api_url: default_api_url(),
        }
    }
}

impl AppConfig {
    pub fn config_dir() -> AppResult<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AppError::Config("Cannot find home directory".into()))?;
        Ok(home.join(".spottray"))
    }

    pub fn config_path() -> AppResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    pub fn token_path() -> AppResult<PathBuf> {
        Ok(Self::config_dir()?.join("tokens.json"))
    }

    pub fn prefs_path() -> AppResult<PathBuf> {
        Ok(Self::config_dir()?.join("prefs.json"))
    }

    pub fn load() -> AppResult<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Err(AppError::Config("Config file not found".into()));
        }
        let content = std::fs::read_to_string(&path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> AppResult<()> {
        let dir = Self::config_dir()?;
        std::fs::create_dir_all(&dir)?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(Self::config_path()?, content)?;
        Ok(())
    }

    /// Redirect URI registered with the provider, pointing at the loopback listener.
    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.callback_port)
    }

    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_url)
    }

    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.accounts_url)
    }
}

/// User preferences, kept in their own file with an independent lifecycle
/// from the token store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPrefs {
    #[serde(default)]
    pub auto_launch: bool,
}

impl UserPrefs {
    pub fn load() -> AppResult<Self> {
        let path = AppConfig::prefs_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)?;
        let prefs: Self = serde_json::from_str(&content)?;
        Ok(prefs)
    }

    pub fn save(&self) -> AppResult<()> {
        let dir = AppConfig::config_dir()?;
        std::fs::create_dir_all(&dir)?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(AppConfig::prefs_path()?, content)?;
        Ok(())
    }
}
