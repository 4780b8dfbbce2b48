use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("ブラウザ初期化エラー: {0}")]
    BrowserInit(String),

    #[error("ナビゲーションエラー: {0}")]
    Navigation(String),

    #[error("ページ評価エラー: {0}")]
    Evaluate(String),

    #[error("受信サーバーに接続できません: {0}")]
    ReceiverUnavailable(String),

    #[error("送信失敗: status={status}")]
    Delivery { status: u16 },

    #[error("HTTPエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("未対応のゲーム: {0}")]
    UnsupportedGame(String),

    #[error("このゲームのプレゼンスは無効です: {0}")]
    GameDisabled(String),

    #[error("送信キューが一杯です")]
    ChannelFull,

    #[error("チャネルが閉じられました")]
    ChannelClosed,

    #[error("設定エラー: {0}")]
    Settings(String),

    #[error("ファイル操作エラー: {0}")]
    FileIO(#[from] std::io::Error),

    #[error("JSONエラー: {0}")]
    Json(#[from] serde_json::Error),
}

impl RelayError {
    /// 失敗ではなくサイクルのスキップとして扱うエラーか
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            RelayError::UnsupportedGame(_) | RelayError::GameDisabled(_) | RelayError::ChannelFull
        )
    }
}
