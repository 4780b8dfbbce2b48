use tracing::debug;

use crate::error::RelayError;
use crate::snapshot::PresenceSnapshot;
use crate::traits::Receiver;

/// 送信結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Delivered { status: u16 },
}

/// 生存確認してからスナップショットを送る。リトライはしない
pub struct Relay<R> {
    receiver: R,
}

impl<R: Receiver> Relay<R> {
    pub fn new(receiver: R) -> Self {
        Self { receiver }
    }

    pub fn receiver(&self) -> &R {
        &self.receiver
    }

    pub async fn relay(&self, snapshot: &PresenceSnapshot) -> Result<RelayOutcome, RelayError> {
        if !self.receiver.is_live().await {
            return Err(RelayError::ReceiverUnavailable(
                self.receiver.base_url().to_string(),
            ));
        }

        let status = self.receiver.deliver(snapshot).await?;
        if !(200..300).contains(&status) {
            return Err(RelayError::Delivery { status });
        }

        debug!(status, "Presence delivered");
        Ok(RelayOutcome::Delivered { status })
    }
}
