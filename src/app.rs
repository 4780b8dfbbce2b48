use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::message::Message;
use crate::pipeline::{Controller, PresencePipeline, RelayWorker};
use crate::poller::Poller;
use crate::scrape::{GameFilter, PresenceScraper};
use crate::service::RelayService;
use crate::settings::SettingsStore;
use crate::traits::{PageDom, Receiver};

/// 起動済みの中継処理一式
pub struct PresenceApp {
    commands: mpsc::Sender<Message>,
    controller: JoinHandle<()>,
    worker: JoinHandle<()>,
}

impl PresenceApp {
    /// 保存済みの有効フラグを読み、コントローラーとリレーワーカーを起動する
    pub async fn start<D, R>(config: &RelayConfig, dom: D, receiver: R) -> Self
    where
        D: PageDom + 'static,
        R: Receiver + 'static,
    {
        let settings = SettingsStore::new(&config.settings_path);
        let capacity = config.channel_capacity.max(1);
        let (relay_tx, relay_rx) = mpsc::channel(capacity);
        let (command_tx, command_rx) = mpsc::channel(capacity);

        let pipeline = PresencePipeline::new(
            PresenceScraper::new(dom),
            GameFilter::new(config.supported_games.clone()),
            relay_tx,
        )
        .with_settings(settings.clone());

        let enabled = settings.load().await.extension_enabled;
        let poller = Poller::from_flag(Arc::new(pipeline), config.interval, enabled);
        info!(
            receiver = %config.receiver_url,
            enabled,
            "Presence relay started"
        );

        let controller = Controller::new(poller, command_rx).with_settings(settings);
        let controller = tokio::spawn(controller.run());
        let worker = tokio::spawn(RelayWorker::new(relay_rx, RelayService::new(receiver)).run());

        Self {
            commands: command_tx,
            controller,
            worker,
        }
    }

    pub async fn toggle(&self, enabled: bool) -> Result<(), RelayError> {
        self.commands
            .send(Message::toggle(enabled))
            .await
            .map_err(|_| RelayError::ChannelClosed)
    }

    /// 収集を止め、送信中のリレーが終わるまで待つ
    pub async fn shutdown(self) {
        drop(self.commands);
        if let Err(err) = self.controller.await {
            warn!("Controller task failed: {}", err);
        }
        if let Err(err) = self.worker.await {
            warn!("Relay worker task failed: {}", err);
        }
        info!("Presence relay stopped");
    }
}
