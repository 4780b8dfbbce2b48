//! スクレイパー → リレー、トグル → ポーラーの配線

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinSet;
use tower::Service;
use tracing::{debug, error, info, warn};

use crate::error::RelayError;
use crate::message::Message;
use crate::poller::Poller;
use crate::relay::RelayOutcome;
use crate::scrape::{GameFilter, PresenceScraper};
use crate::service::RelayService;
use crate::settings::SettingsStore;
use crate::snapshot::PresenceSnapshot;
use crate::traits::{PageDom, PollTask, Receiver};

/// 1サイクル分の処理（ゲーム判定 → スクレイプ → リレーへ送信）
pub struct PresencePipeline<D> {
    scraper: PresenceScraper<D>,
    filter: GameFilter,
    settings: Option<SettingsStore>,
    outbox: mpsc::Sender<Message>,
}

impl<D: PageDom> PresencePipeline<D> {
    pub fn new(
        scraper: PresenceScraper<D>,
        filter: GameFilter,
        outbox: mpsc::Sender<Message>,
    ) -> Self {
        Self {
            scraper,
            filter,
            settings: None,
            outbox,
        }
    }

    /// ゲームごとの有効フラグを参照する
    pub fn with_settings(mut self, settings: SettingsStore) -> Self {
        self.settings = Some(settings);
        self
    }

    pub async fn run_cycle(&self) -> Result<PresenceSnapshot, RelayError> {
        let game_type = self.scraper.get_game_type().await?;
        let game = self.filter.check(game_type.as_deref())?;

        if let Some(store) = &self.settings {
            if !store.load().await.is_game_enabled(&game) {
                return Err(RelayError::GameDisabled(game));
            }
        }

        let snapshot = self.scraper.scrape_for(Some(game)).await?;

        self.outbox
            .try_send(Message::GameData(snapshot.clone()))
            .map_err(|err| match err {
                TrySendError::Full(_) => RelayError::ChannelFull,
                TrySendError::Closed(_) => RelayError::ChannelClosed,
            })?;

        Ok(snapshot)
    }
}

#[async_trait]
impl<D: PageDom + 'static> PollTask for PresencePipeline<D> {
    async fn tick(&self) {
        match self.run_cycle().await {
            Ok(snapshot) => debug!(location = ?snapshot.location, "Presence queued"),
            Err(err) if err.is_skip() => warn!("Data not sent: {}", err),
            Err(err) => error!("Presence cycle failed: {}", err),
        }
    }
}

/// `2KKI_DATA` を受けて受信サーバーへ送るワーカー
pub struct RelayWorker<R> {
    inbox: mpsc::Receiver<Message>,
    service: RelayService<R>,
}

impl<R: Receiver + 'static> RelayWorker<R> {
    pub fn new(inbox: mpsc::Receiver<Message>, service: RelayService<R>) -> Self {
        Self { inbox, service }
    }

    /// チャネルが閉じるまで処理する。各送信は独立したタスクで実行し、
    /// チャネルが閉じた後は送信中のものが全て終わるまで待つ
    pub async fn run(mut self) {
        let mut deliveries = JoinSet::new();
        loop {
            tokio::select! {
                message = self.inbox.recv() => match message {
                    Some(Message::GameData(snapshot)) => {
                        deliveries.spawn(log_delivery(self.service.call(snapshot)));
                    }
                    Some(other) => debug!(?other, "Ignoring non-data message"),
                    None => break,
                },
                Some(joined) = deliveries.join_next(), if !deliveries.is_empty() => {
                    if let Err(err) = joined {
                        warn!("Relay task failed: {}", err);
                    }
                }
            }
        }

        debug!(in_flight = deliveries.len(), "Relay channel closed");
        while let Some(joined) = deliveries.join_next().await {
            if let Err(err) = joined {
                warn!("Relay task failed: {}", err);
            }
        }
    }
}

async fn log_delivery(
    delivery: impl std::future::Future<Output = Result<RelayOutcome, RelayError>>,
) {
    match delivery.await {
        Ok(outcome) => debug!(?outcome, "Relay finished"),
        Err(err) => error!("Relay failed: {}", err),
    }
}

/// `TOGGLE_EXTENSION` を受けて有効フラグを保存し、ポーラーを開始/停止する
pub struct Controller {
    poller: Poller,
    settings: Option<SettingsStore>,
    inbox: mpsc::Receiver<Message>,
}

impl Controller {
    pub fn new(poller: Poller, inbox: mpsc::Receiver<Message>) -> Self {
        Self {
            poller,
            settings: None,
            inbox,
        }
    }

    pub fn with_settings(mut self, settings: SettingsStore) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    pub async fn handle(&mut self, message: Message) {
        match message {
            Message::ToggleExtension { enabled } => {
                if let Some(store) = &self.settings {
                    if let Err(err) = store.set_enabled(enabled).await {
                        warn!("Failed to persist enabled flag: {}", err);
                    }
                }
                if enabled {
                    self.poller.start();
                } else {
                    self.poller.stop();
                }
            }
            other => debug!(?other, "Ignoring non-toggle message"),
        }
    }

    /// チャネルが閉じたら収集を止めて終了
    pub async fn run(mut self) {
        while let Some(message) = self.inbox.recv().await {
            self.handle(message).await;
        }
        self.poller.stop();
        info!("Controller stopped");
    }
}
