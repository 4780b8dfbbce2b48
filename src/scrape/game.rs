use std::collections::BTreeSet;

use crate::error::RelayError;

/// 対応ゲームIDの許可リスト。空なら全て許可
#[derive(Debug, Clone, Default)]
pub struct GameFilter {
    supported: BTreeSet<String>,
}

impl GameFilter {
    pub fn new(supported: BTreeSet<String>) -> Self {
        Self { supported }
    }

    pub fn allow_all() -> Self {
        Self::default()
    }

    /// ゲームIDが対応していればそれを返す
    pub fn check(&self, game_type: Option<&str>) -> Result<String, RelayError> {
        let game = game_type
            .filter(|g| !g.is_empty())
            .ok_or_else(|| RelayError::UnsupportedGame("(不明)".into()))?;

        if self.supported.is_empty() || self.supported.contains(game) {
            Ok(game.to_string())
        } else {
            Err(RelayError::UnsupportedGame(game.to_string()))
        }
    }
}
