//! Chromium上のゲームページに対する `PageDom` 実装

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::traits::{LinkElement, PageDom};

/// ブラウザとゲームページのセッション
pub struct ChromePage {
    // ページが生きている間はブラウザ接続を保持する
    _browser: Browser,
    page: Page,
}

#[derive(Deserialize)]
struct RawLink {
    text: String,
    href: String,
}

impl ChromePage {
    /// ブラウザを起動（または既存のChromeに接続）し、ゲームページを開く
    pub async fn open(config: &RelayConfig) -> Result<Self, RelayError> {
        let (browser, mut handler) = match &config.debugger_url {
            Some(url) => {
                info!("Connecting to running browser: {}", url);
                Browser::connect(url.as_str())
                    .await
                    .map_err(|e| RelayError::BrowserInit(e.to_string()))?
            }
            None => {
                info!("ブラウザを起動中...");
                let mut builder = BrowserConfig::builder().window_size(1280, 800);
                if let Ok(path) = std::env::var("CHROME_PATH") {
                    builder = builder.chrome_executable(path);
                }
                if !config.headless {
                    builder = builder.with_head();
                }
                let browser_config = builder.build().map_err(|e| {
                    RelayError::BrowserInit(format!("ブラウザ設定エラー: {}", e))
                })?;
                Browser::launch(browser_config)
                    .await
                    .map_err(|e| RelayError::BrowserInit(e.to_string()))?
            }
        };

        // ブラウザイベントハンドラをバックグラウンドで実行
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        let page = Self::find_or_open_page(&browser, &config.game_url).await?;
        info!("ゲームページ準備完了: {}", config.game_url);

        Ok(Self {
            _browser: browser,
            page,
        })
    }

    /// 既にゲームURLを開いているタブがあればそれを使う
    async fn find_or_open_page(browser: &Browser, game_url: &str) -> Result<Page, RelayError> {
        let pages = browser
            .pages()
            .await
            .map_err(|e| RelayError::BrowserInit(e.to_string()))?;

        for page in pages {
            if let Ok(Some(url)) = page.url().await {
                if url.starts_with(game_url) {
                    debug!("既存のタブを使用: {}", url);
                    return Ok(page);
                }
            }
        }

        let page = browser
            .new_page(game_url)
            .await
            .map_err(|e| RelayError::Navigation(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| RelayError::Navigation(e.to_string()))?;
        Ok(page)
    }

    /// `JSON.stringify` した結果を評価してデシリアライズする
    async fn eval_json<T: DeserializeOwned>(&self, expression: &str) -> Result<T, RelayError> {
        let script = format!("JSON.stringify({})", expression);
        let raw: String = self
            .page
            .evaluate(script.as_str())
            .await
            .map_err(|e| RelayError::Evaluate(e.to_string()))?
            .into_value()
            .map_err(|e| RelayError::Evaluate(e.to_string()))?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub async fn close(self) -> Result<(), RelayError> {
        self.page
            .close()
            .await
            .map_err(|e| RelayError::BrowserInit(e.to_string()))
    }
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

#[async_trait]
impl PageDom for ChromePage {
    async fn pathname(&self) -> Result<String, RelayError> {
        self.eval_json("window.location.pathname").await
    }

    async fn element_text(&self, id: &str) -> Result<Option<String>, RelayError> {
        let expression = format!(
            "(function() {{ var el = document.getElementById({}); return el ? el.innerText : null; }})()",
            js_string(id)
        );
        self.eval_json(&expression).await
    }

    async fn child_link(&self, id: &str) -> Result<Option<LinkElement>, RelayError> {
        let expression = format!(
            r#"(function() {{
                var el = document.getElementById({});
                var link = el ? el.querySelector("a") : null;
                return link ? {{ text: link.innerText, href: link.href }} : null;
            }})()"#,
            js_string(id)
        );
        let link: Option<RawLink> = self.eval_json(&expression).await?;
        Ok(link.map(|raw| LinkElement {
            text: raw.text.trim().to_string(),
            href: raw.href,
        }))
    }

    async fn background_image(&self, selector: &str) -> Result<Option<String>, RelayError> {
        let expression = format!(
            r#"(function() {{
                var el = document.querySelector({});
                return el ? window.getComputedStyle(el).backgroundImage : null;
            }})()"#,
            js_string(selector)
        );
        self.eval_json(&expression).await
    }
}
