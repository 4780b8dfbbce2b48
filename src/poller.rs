//! 周期実行タイマー
//!
//! Idle / Active の2状態。Activeの間は一定間隔で `PollTask::tick` を
//! 独立したタスクとして起動する。

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::traits::PollTask;

pub struct Poller {
    task: Arc<dyn PollTask>,
    interval: Duration,
    ticker: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new(task: Arc<dyn PollTask>, interval: Duration) -> Self {
        Self {
            task,
            interval,
            ticker: None,
        }
    }

    /// 保存済みの有効フラグに従って初期状態を決める
    ///
    /// tokioランタイム内で呼ぶこと。
    pub fn from_flag(task: Arc<dyn PollTask>, interval: Duration, enabled: bool) -> Self {
        let mut poller = Self::new(task, interval);
        if enabled {
            poller.start();
        }
        poller
    }

    pub fn is_active(&self) -> bool {
        self.ticker.is_some()
    }

    /// 収集開始。既にActiveなら何もしない（戻り値は状態が変わったか）
    pub fn start(&mut self) -> bool {
        if self.ticker.is_some() {
            return false;
        }

        let task = self.task.clone();
        let period = self.interval;
        self.ticker = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let task = task.clone();
                // 前回のサイクルが終わっていなくても次を起動する
                tokio::spawn(async move { task.tick().await });
            }
        }));

        info!(interval_secs = period.as_secs_f64(), "Collection started");
        true
    }

    /// 収集停止。実行中のサイクルは中断しない
    pub fn stop(&mut self) -> bool {
        match self.ticker.take() {
            Some(handle) => {
                handle.abort();
                info!("Collection stopped");
                true
            }
            None => {
                debug!("Collection already stopped");
                false
            }
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.take() {
            handle.abort();
        }
    }
}
