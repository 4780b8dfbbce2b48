//! リレーモジュール
//!
//! 受信サーバーの生存確認 → スナップショットのPOST

mod forward;
mod http;

pub use forward::{Relay, RelayOutcome};
pub use http::{check_server_status, HttpReceiver, RECEIVE_PATH, STATUS_PATH};
