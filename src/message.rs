//! コンポーネント間メッセージ
//!
//! トグル → ポーラー、スクレイパー → リレーの両方向で同じ型を流し、
//! 受け手が `type` で処理対象を選ぶ。

use serde::{Deserialize, Serialize};

use crate::snapshot::PresenceSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// 収集の開始/停止
    #[serde(rename = "TOGGLE_EXTENSION")]
    ToggleExtension { enabled: bool },

    /// スクレイプ結果
    #[serde(rename = "2KKI_DATA")]
    GameData(PresenceSnapshot),
}

impl Message {
    pub fn toggle(enabled: bool) -> Self {
        Message::ToggleExtension { enabled }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_toggle_wire_format() {
        let msg: Message =
            serde_json::from_value(json!({"type": "TOGGLE_EXTENSION", "enabled": false})).unwrap();
        assert_eq!(msg, Message::toggle(false));
    }

    #[test]
    fn test_game_data_fields_are_flattened() {
        let msg = Message::GameData(PresenceSnapshot {
            location: Some("Nexus".into()),
            players_online: 40,
            game_type: Some("2kki".into()),
            ..Default::default()
        });
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["type"], "2KKI_DATA");
        assert_eq!(value["location"], "Nexus");
        assert_eq!(value["playersOnline"], 40);
        assert_eq!(value["gameType"], "2kki");
    }
}
