use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

pub const DEFAULT_RECEIVER_URL: &str = "http://localhost:3000";
pub const DEFAULT_GAME_URL: &str = "https://ynoproject.net/2kki/";
pub const DEFAULT_INTERVAL_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// 受信サーバーのベースURL
    pub receiver_url: String,
    /// スクレイプ対象のゲームページ
    pub game_url: String,
    /// ポーリング間隔
    pub interval: Duration,
    /// 対応ゲームID（空なら全て許可）
    pub supported_games: BTreeSet<String>,
    pub headless: bool,
    /// 起動済みChromeのDevTools WebSocket URL（指定時は起動せず接続する）
    pub debugger_url: Option<String>,
    pub http_timeout: Duration,
    pub channel_capacity: usize,
    /// 有効フラグ等を保存するJSONファイル
    pub settings_path: PathBuf,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            receiver_url: DEFAULT_RECEIVER_URL.to_string(),
            game_url: DEFAULT_GAME_URL.to_string(),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            supported_games: BTreeSet::from(["2kki".to_string()]),
            headless: false,
            debugger_url: None,
            http_timeout: Duration::from_secs(5),
            channel_capacity: 16,
            settings_path: PathBuf::from("./settings.json"),
        }
    }
}

impl RelayConfig {
    pub fn new(receiver_url: impl Into<String>) -> Self {
        Self {
            receiver_url: receiver_url.into(),
            ..Default::default()
        }
    }

    /// 環境変数で既定値を上書きした設定を作成
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(url) = get("PRESENCE_RECEIVER_URL") {
            config.receiver_url = url;
        }
        if let Some(url) = get("PRESENCE_GAME_URL") {
            config.game_url = url;
        }
        if let Some(secs) = get("PRESENCE_INTERVAL_SECS") {
            match secs.parse::<u64>() {
                Ok(secs) if secs > 0 => config.interval = Duration::from_secs(secs),
                _ => warn!(value = %secs, "Invalid PRESENCE_INTERVAL_SECS, using default"),
            }
        }
        if let Some(games) = get("PRESENCE_GAMES") {
            config.supported_games = parse_game_list(&games);
        }
        if let Some(headless) = get("PRESENCE_HEADLESS") {
            config.headless = matches!(headless.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Some(url) = get("CHROME_DEBUGGER_URL") {
            config.debugger_url = Some(url);
        }
        if let Some(path) = get("PRESENCE_SETTINGS") {
            config.settings_path = PathBuf::from(path);
        }

        config
    }

    pub fn with_game_url(mut self, url: impl Into<String>) -> Self {
        self.game_url = url.into();
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_supported_games<I, S>(mut self, games: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_games = games.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_debugger_url(mut self, url: impl Into<String>) -> Self {
        self.debugger_url = Some(url.into());
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    pub fn with_settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = path.into();
        self
    }

    /// `GET` 生存確認エンドポイント
    pub fn status_url(&self) -> String {
        format!("{}/status", self.receiver_url.trim_end_matches('/'))
    }

    /// `POST` 受信エンドポイント
    pub fn receive_url(&self) -> String {
        format!("{}/receive_from_2kki", self.receiver_url.trim_end_matches('/'))
    }
}

fn parse_game_list(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = RelayConfig::default();
        assert_eq!(config.receiver_url, "http://localhost:3000");
        assert_eq!(config.interval, Duration::from_secs(15));
        assert!(config.supported_games.contains("2kki"));
        assert!(config.debugger_url.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = RelayConfig::new("http://localhost:7789/")
            .with_interval(Duration::from_secs(5))
            .with_supported_games(["2kki", "yume"])
            .with_headless(true)
            .with_settings_path("/tmp/presence.json");

        assert_eq!(config.status_url(), "http://localhost:7789/status");
        assert_eq!(config.receive_url(), "http://localhost:7789/receive_from_2kki");
        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.supported_games.len(), 2);
        assert!(config.headless);
        assert_eq!(config.settings_path, PathBuf::from("/tmp/presence.json"));
    }

    #[test]
    fn test_config_from_lookup() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("PRESENCE_RECEIVER_URL", "http://localhost:7789"),
            ("PRESENCE_INTERVAL_SECS", "2"),
            ("PRESENCE_GAMES", "2kki, flow ,,"),
            ("PRESENCE_HEADLESS", "true"),
            ("CHROME_DEBUGGER_URL", "  "),
        ]);
        let config = RelayConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.receiver_url, "http://localhost:7789");
        assert_eq!(config.interval, Duration::from_secs(2));
        assert_eq!(
            config.supported_games,
            BTreeSet::from(["2kki".to_string(), "flow".to_string()])
        );
        assert!(config.headless);
        assert!(config.debugger_url.is_none());
    }

    #[test]
    fn test_invalid_interval_keeps_default() {
        let config = RelayConfig::from_lookup(|key| {
            (key == "PRESENCE_INTERVAL_SECS").then(|| "0".to_string())
        });
        assert_eq!(config.interval, Duration::from_secs(DEFAULT_INTERVAL_SECS));
    }
}
