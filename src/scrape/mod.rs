//! ページスクレイパーモジュール
//!
//! ゲームページのDOMから現在地・人数・バッジを取得する

mod chrome;
mod extract;
mod game;
mod html;
mod presence;

pub use chrome::ChromePage;
pub use extract::{extract_background_url, extract_count, game_type_from_path};
pub use game::GameFilter;
pub use html::HtmlPage;
pub use presence::{
    PresenceScraper, BADGE_SELECTOR, LOCATION_ELEMENT_ID, MAP_PLAYER_COUNT_ID, PLAYER_COUNT_ID,
};
