//! YNOプレゼンス中継ライブラリ
//!
//! - ゲームページのDOMから現在地・人数・バッジを定期取得
//! - ローカル受信サーバー (`/status`, `/receive_from_2kki`) へJSONで送信
//!
//! # 使用例
//!
//! ```rust,ignore
//! use yume_presence_relay::{ChromePage, HttpReceiver, PresenceApp, RelayConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = RelayConfig::from_env();
//!     let page = ChromePage::open(&config).await.unwrap();
//!     let receiver = HttpReceiver::from_config(&config).unwrap();
//!
//!     let app = PresenceApp::start(&config, page, receiver).await;
//!     tokio::signal::ctrl_c().await.unwrap();
//!     app.shutdown().await;
//! }
//! ```
//!
//! # 単発スクレイプ
//!
//! ```rust,ignore
//! use yume_presence_relay::{HtmlPage, PresenceScraper};
//!
//! let page = HtmlPage::from_file("https://ynoproject.net/2kki/", "page.html").await?;
//! let snapshot = PresenceScraper::new(page).scrape().await?;
//! println!("{:?}", snapshot.location);
//! ```

pub mod app;
pub mod config;
pub mod error;
pub mod message;
pub mod pipeline;
pub mod poller;
pub mod relay;
pub mod scrape;
pub mod service;
pub mod settings;
pub mod snapshot;
pub mod traits;

#[cfg(test)]
mod test_support;

// 主要な型をリエクスポート
pub use app::PresenceApp;
pub use config::RelayConfig;
pub use error::RelayError;
pub use message::Message;
pub use pipeline::{Controller, PresencePipeline, RelayWorker};
pub use poller::Poller;
pub use relay::{check_server_status, HttpReceiver, Relay, RelayOutcome};
pub use scrape::{ChromePage, GameFilter, HtmlPage, PresenceScraper};
pub use service::RelayService;
pub use settings::{Settings, SettingsStore};
pub use snapshot::{LocationData, PresenceSnapshot};
pub use traits::{LinkElement, PageDom, PollTask, Receiver};
