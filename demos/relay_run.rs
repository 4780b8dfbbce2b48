//! ライブ実行
//!
//! `cargo run --example relay_run` で起動する。`Cargo.toml` の `[[example]]` で
//! 登録しているが、ソースは `examples/` ではなく `demos/` に置いている。

use tokio::io::{AsyncBufReadExt, BufReader};
use yume_presence_relay::{
    check_server_status, ChromePage, HttpReceiver, PresenceApp, RelayConfig,
};

#[tokio::main]
async fn main() {
    // ログ設定
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,yume_presence_relay=debug".into()),
        )
        .init();

    // 環境変数から設定を取得
    let config = RelayConfig::from_env();

    println!("=== Presence Relay ===");
    println!("receiver: {}", config.receiver_url);
    println!("commands: on / off / status / quit");

    let page = match ChromePage::open(&config).await {
        Ok(page) => page,
        Err(e) => {
            eprintln!("エラー: {}", e);
            return;
        }
    };
    let receiver = match HttpReceiver::from_config(&config) {
        Ok(receiver) => receiver,
        Err(e) => {
            eprintln!("エラー: {}", e);
            return;
        }
    };

    let app = PresenceApp::start(&config, page, receiver).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                match line.trim() {
                    "on" => { let _ = app.toggle(true).await; }
                    "off" => { let _ = app.toggle(false).await; }
                    "status" => {
                        if check_server_status(&config.status_url()).await {
                            println!("Server is up and running!");
                        } else {
                            println!("Server is not running!");
                        }
                    }
                    "quit" => break,
                    "" => {}
                    other => println!("unknown command: {}", other),
                }
            }
        }
    }

    app.shutdown().await;
}
