//! DOMから取得した文字列の値抽出

use std::sync::OnceLock;

use regex::Regex;

fn digits_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").expect("digit pattern"))
}

fn css_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"url\(["']?([^"']*)["']?\)"#).expect("css url pattern"))
}

/// 文字列中の最初の数字列を整数として返す（無ければ0）
pub fn extract_count(text: &str) -> u32 {
    digits_re()
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// `background-image` の値から `url(...)` の中身を取り出す
pub fn extract_background_url(css_value: &str) -> Option<String> {
    css_url_re()
        .captures(css_value)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// URLパスからゲームIDを得る（`/2kki/` → `2kki`）
pub fn game_type_from_path(pathname: &str) -> Option<String> {
    let id: String = pathname.chars().filter(|c| *c != '/').collect();
    (!id.is_empty()).then_some(id)
}
