//! プレゼンスデータの型定義

use serde::{Deserialize, Serialize};

/// 1回のポーリングで取得したプレゼンス情報
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceSnapshot {
    pub location: Option<String>,
    pub wiki_page_url: Option<String>,
    #[serde(default)]
    pub players_online: u32,
    #[serde(default)]
    pub players_on_map: u32,
    pub badge_image_url: Option<String>,
    /// スナップショットを生成したゲームID（例: "2kki"）
    pub game_type: Option<String>,
}

/// `#locationText` 内リンクの表示テキストとリンク先
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationData {
    pub location: Option<String>,
    pub wiki_page_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_wire_format() {
        let snapshot = PresenceSnapshot {
            location: Some("Forest".into()),
            wiki_page_url: Some("http://wiki/x".into()),
            players_online: 12,
            players_on_map: 3,
            badge_image_url: None,
            game_type: Some("2kki".into()),
        };

        assert_eq!(
            serde_json::to_value(&snapshot).unwrap(),
            json!({
                "location": "Forest",
                "wikiPageUrl": "http://wiki/x",
                "playersOnline": 12,
                "playersOnMap": 3,
                "badgeImageUrl": null,
                "gameType": "2kki",
            })
        );
    }

    #[test]
    fn test_missing_counts_default_to_zero() {
        let snapshot: PresenceSnapshot = serde_json::from_value(json!({
            "location": null,
            "wikiPageUrl": null,
            "badgeImageUrl": null,
            "gameType": "2kki",
        }))
        .unwrap();

        assert_eq!(snapshot.players_online, 0);
        assert_eq!(snapshot.players_on_map, 0);
    }
}
