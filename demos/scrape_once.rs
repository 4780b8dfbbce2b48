//! 保存済みHTMLの単発スクレイプ
//!
//! `cargo run --example scrape_once` で起動する。`Cargo.toml` の `[[example]]` で
//! 登録しているが、ソースは `examples/` ではなく `demos/` に置いている。

use yume_presence_relay::{HtmlPage, PresenceScraper};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // 保存済みHTMLファイルとそのURL
    let path = std::env::args()
        .nth(1)
        .expect("usage: scrape_once <page.html> [url]");
    let url = std::env::args()
        .nth(2)
        .unwrap_or_else(|| "https://ynoproject.net/2kki/".to_string());

    let page = match HtmlPage::from_file(&url, &path).await {
        Ok(page) => page,
        Err(e) => {
            eprintln!("エラー: {}", e);
            return;
        }
    };

    match PresenceScraper::new(page).scrape().await {
        Ok(snapshot) => match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("エラー: {}", e),
        },
        Err(e) => eprintln!("エラー: {}", e),
    }
}
