//! ページからプレゼンス情報を組み立てる

use tracing::debug;

use crate::error::RelayError;
use crate::snapshot::{LocationData, PresenceSnapshot};
use crate::traits::PageDom;

use super::extract::{extract_background_url, extract_count, game_type_from_path};

pub const LOCATION_ELEMENT_ID: &str = "locationText";
pub const PLAYER_COUNT_ID: &str = "playerCountLabel";
pub const MAP_PLAYER_COUNT_ID: &str = "mapPlayerCountLabel";
pub const BADGE_SELECTOR: &str = "#badgeButton .badge";

/// プレゼンススクレイパー
///
/// 要素が見つからない項目は `None` / 0 になり、エラーにはならない。
pub struct PresenceScraper<D> {
    dom: D,
}

impl<D: PageDom> PresenceScraper<D> {
    pub fn new(dom: D) -> Self {
        Self { dom }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub async fn get_game_type(&self) -> Result<Option<String>, RelayError> {
        let pathname = self.dom.pathname().await?;
        Ok(game_type_from_path(&pathname))
    }

    pub async fn get_location_data(&self) -> Result<LocationData, RelayError> {
        let data = match self.dom.child_link(LOCATION_ELEMENT_ID).await? {
            Some(link) => LocationData {
                location: Some(link.text),
                wiki_page_url: Some(link.href),
            },
            None => LocationData::default(),
        };
        Ok(data)
    }

    pub async fn get_player_count(&self, element_id: &str) -> Result<u32, RelayError> {
        let text = self.dom.element_text(element_id).await?;
        Ok(text.as_deref().map(extract_count).unwrap_or(0))
    }

    /// セレクタに一致する要素の背景画像URL
    pub async fn get_background_image_url(
        &self,
        selector: &str,
    ) -> Result<Option<String>, RelayError> {
        let value = self.dom.background_image(selector).await?;
        Ok(value.as_deref().and_then(extract_background_url))
    }

    /// 現在のページのスナップショットを取得
    pub async fn scrape(&self) -> Result<PresenceSnapshot, RelayError> {
        let game_type = self.get_game_type().await?;
        self.scrape_for(game_type).await
    }

    /// ゲームIDが判明済みの場合
    pub async fn scrape_for(
        &self,
        game_type: Option<String>,
    ) -> Result<PresenceSnapshot, RelayError> {
        let LocationData {
            location,
            wiki_page_url,
        } = self.get_location_data().await?;
        let players_online = self.get_player_count(PLAYER_COUNT_ID).await?;
        let players_on_map = self.get_player_count(MAP_PLAYER_COUNT_ID).await?;
        let badge_image_url = self.get_background_image_url(BADGE_SELECTOR).await?;

        debug!(
            game = ?game_type,
            location = ?location,
            players_online,
            players_on_map,
            "Scraped presence"
        );

        Ok(PresenceSnapshot {
            location,
            wiki_page_url,
            players_online,
            players_on_map,
            badge_image_url,
            game_type,
        })
    }
}
