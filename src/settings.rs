//! 有効フラグの永続化
//!
//! `{"extensionEnabled": true, "2kki": false}` のようなJSONファイル。
//! キーが無ければ有効とみなす。

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};

use crate::error::RelayError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "extensionEnabled", default = "default_enabled")]
    pub extension_enabled: bool,

    /// ゲームID → 有効フラグ。bool以外の値は無視して保持する
    #[serde(flatten)]
    pub games: BTreeMap<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extension_enabled: default_enabled(),
            games: BTreeMap::new(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

impl Settings {
    /// 明示的に `false` が保存されていない限り有効
    pub fn is_game_enabled(&self, game_type: &str) -> bool {
        self.games
            .get(game_type)
            .and_then(Value::as_bool)
            .unwrap_or(true)
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 読み込みに失敗した場合は既定値
    pub async fn load(&self) -> Settings {
        match self.try_load().await {
            Ok(settings) => settings,
            Err(err) => {
                warn!(
                    error = %err,
                    path = %self.path.display(),
                    "Failed to load settings, using defaults"
                );
                Settings::default()
            }
        }
    }

    pub async fn try_load(&self) -> Result<Settings, RelayError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Settings file not found, using defaults");
                return Ok(Settings::default());
            }
            Err(err) => return Err(err.into()),
        };
        serde_json::from_str(&contents)
            .map_err(|err| RelayError::Settings(format!("Failed to parse settings: {err}")))
    }

    pub async fn save(&self, settings: &Settings) -> Result<(), RelayError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }

    /// `extensionEnabled` を更新して保存。読めないファイルは上書きしない
    pub async fn set_enabled(&self, enabled: bool) -> Result<(), RelayError> {
        let mut settings = self.try_load().await?;
        settings.extension_enabled = enabled;
        self.save(&settings).await
    }

    pub async fn set_game_enabled(&self, game_type: &str, enabled: bool) -> Result<(), RelayError> {
        let mut settings = self.try_load().await?;
        settings
            .games
            .insert(game_type.to_string(), Value::Bool(enabled));
        self.save(&settings).await
    }
}
