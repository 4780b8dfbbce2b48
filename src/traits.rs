use async_trait::async_trait;

use crate::error::RelayError;
use crate::snapshot::PresenceSnapshot;

/// リンク要素の表示テキストと絶対URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkElement {
    pub text: String,
    pub href: String,
}

/// 読み込み済みページのDOMへのアクセス
///
/// 要素が存在しない場合は `Ok(None)`。`Err` はブラウザとの通信失敗など
/// DOM以外の問題に限る。
#[async_trait]
pub trait PageDom: Send + Sync {
    /// `window.location.pathname`
    async fn pathname(&self) -> Result<String, RelayError>;

    /// id指定要素の表示テキスト
    async fn element_text(&self, id: &str) -> Result<Option<String>, RelayError>;

    /// id指定要素の最初の `<a>` 子要素
    async fn child_link(&self, id: &str) -> Result<Option<LinkElement>, RelayError>;

    /// セレクタに一致する要素の `background-image` 値
    async fn background_image(&self, selector: &str) -> Result<Option<String>, RelayError>;
}

/// プレゼンスの受信サーバー
#[async_trait]
pub trait Receiver: Send + Sync {
    /// 生存確認。結果はキャッシュしない
    async fn is_live(&self) -> bool;

    /// スナップショットを送信し、HTTPステータスを返す
    async fn deliver(&self, snapshot: &PresenceSnapshot) -> Result<u16, RelayError>;

    fn base_url(&self) -> &str;
}

/// ポーラーが周期実行する処理
#[async_trait]
pub trait PollTask: Send + Sync + 'static {
    async fn tick(&self);
}
