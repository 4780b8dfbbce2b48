use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tower::Service;
use tracing::debug;

use crate::error::RelayError;
use crate::relay::{Relay, RelayOutcome};
use crate::snapshot::PresenceSnapshot;
use crate::traits::Receiver;

/// tower::Serviceを実装したリレーサービス
///
/// 呼び出しごとに独立したFutureを返すため、前回の送信が終わる前に
/// 次の送信を始めてもよい。
pub struct RelayService<R> {
    relay: Arc<Relay<R>>,
}

impl<R> Clone for RelayService<R> {
    fn clone(&self) -> Self {
        Self {
            relay: self.relay.clone(),
        }
    }
}

impl<R: Receiver> RelayService<R> {
    pub fn new(receiver: R) -> Self {
        Self {
            relay: Arc::new(Relay::new(receiver)),
        }
    }

    pub fn relay(&self) -> &Relay<R> {
        &self.relay
    }
}

impl<R: Receiver + 'static> Service<PresenceSnapshot> for RelayService<R> {
    type Response = RelayOutcome;
    type Error = RelayError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, snapshot: PresenceSnapshot) -> Self::Future {
        debug!(game = ?snapshot.game_type, "リレー要求受信");
        let relay = self.relay.clone();
        Box::pin(async move { relay.relay(&snapshot).await })
    }
}
