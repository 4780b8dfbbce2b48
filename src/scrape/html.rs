//! 静的HTMLに対する `PageDom` 実装
//!
//! 計算済みスタイルは取得できないため、`background-image` は要素の
//! インライン `style` 属性から読む。

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::RelayError;
use crate::traits::{LinkElement, PageDom};

/// 保存済みHTMLとそのURL
///
/// `scraper::Html` は `Send` ではないため、ソース文字列を保持して
/// 問い合わせごとにパースする。
#[derive(Debug, Clone)]
pub struct HtmlPage {
    url: Url,
    source: String,
}

impl HtmlPage {
    pub fn new(url: &str, source: impl Into<String>) -> Result<Self, RelayError> {
        let url = Url::parse(url)
            .map_err(|e| RelayError::Navigation(format!("URLが不正です: {} ({})", url, e)))?;
        Ok(Self {
            url,
            source: source.into(),
        })
    }

    pub async fn from_file(
        url: &str,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, RelayError> {
        let source = tokio::fs::read_to_string(path).await?;
        Self::new(url, source)
    }

    fn query<T>(
        &self,
        selector: &str,
        f: impl FnOnce(ElementRef<'_>) -> T,
    ) -> Result<Option<T>, RelayError> {
        let selector = parse_selector(selector)?;
        let document = Html::parse_document(&self.source);
        let found = document.select(&selector).next().map(f);
        Ok(found)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, RelayError> {
    Selector::parse(selector)
        .map_err(|e| RelayError::Evaluate(format!("セレクタが不正です: {} ({})", selector, e)))
}

fn id_selector(id: &str) -> String {
    format!(r#"[id="{}"]"#, id.replace('"', "\\\""))
}

fn visible_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// インラインスタイルから指定プロパティの値を取り出す
fn inline_style_property(style: &str, property: &str) -> Option<String> {
    declarations(style).into_iter().find_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case(property)
            .then(|| value.trim().to_string())
    })
}

/// 括弧と引用符の外にある `;` で宣言を区切る
///
/// `url(data:image/png;base64,...)` の中の `;` では区切らない。
fn declarations(style: &str) -> Vec<&str> {
    let mut decls = Vec::new();
    let mut depth = 0usize;
    let mut quote = None;
    let mut start = 0;
    for (i, c) in style.char_indices() {
        match (quote, c) {
            (Some(q), _) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, ';') if depth == 0 => {
                decls.push(&style[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    decls.push(&style[start..]);
    decls
}

#[async_trait]
impl PageDom for HtmlPage {
    async fn pathname(&self) -> Result<String, RelayError> {
        Ok(self.url.path().to_string())
    }

    async fn element_text(&self, id: &str) -> Result<Option<String>, RelayError> {
        self.query(&id_selector(id), visible_text)
    }

    async fn child_link(&self, id: &str) -> Result<Option<LinkElement>, RelayError> {
        let link_selector = parse_selector("a")?;
        let base = self.url.clone();
        let link = self.query(&id_selector(id), |container| {
            container.select(&link_selector).next().map(|link| {
                let raw_href = link.value().attr("href").unwrap_or_default();
                let href = base
                    .join(raw_href)
                    .map(|u| u.to_string())
                    .unwrap_or_else(|_| raw_href.to_string());
                LinkElement {
                    text: visible_text(link),
                    href,
                }
            })
        })?;
        Ok(link.flatten())
    }

    async fn background_image(&self, selector: &str) -> Result<Option<String>, RelayError> {
        let value = self.query(selector, |element| {
            element
                .value()
                .attr("style")
                .and_then(|style| inline_style_property(style, "background-image"))
                .unwrap_or_else(|| "none".to_string())
        })?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <span id="locationText"><a href="/wiki/Forest_World">Forest World</a></span>
          <div id="playerCountLabel">12 players</div>
          <div id="badgeButton">
            <div class="badge" style="width: 16px; background-image: url('https://ynoproject.net/2kki/images/badge/red.png')"></div>
          </div>
        </body></html>
    "#;

    fn page() -> HtmlPage {
        HtmlPage::new("https://ynoproject.net/2kki/", PAGE).unwrap()
    }

    #[tokio::test]
    async fn test_pathname() {
        assert_eq!(page().pathname().await.unwrap(), "/2kki/");
    }

    #[tokio::test]
    async fn test_element_text() {
        let page = page();
        assert_eq!(
            page.element_text("playerCountLabel").await.unwrap(),
            Some("12 players".to_string())
        );
        assert_eq!(page.element_text("mapPlayerCountLabel").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_child_link_resolves_relative_href() {
        let link = page().child_link("locationText").await.unwrap().unwrap();
        assert_eq!(link.text, "Forest World");
        assert_eq!(link.href, "https://ynoproject.net/wiki/Forest_World");
    }

    #[tokio::test]
    async fn test_child_link_without_anchor() {
        let page = HtmlPage::new(
            "https://ynoproject.net/2kki/",
            r#"<span id="locationText">Unknown</span>"#,
        )
        .unwrap();
        assert_eq!(page.child_link("locationText").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_background_image_from_inline_style() {
        let page = page();
        assert_eq!(
            page.background_image("#badgeButton .badge").await.unwrap(),
            Some("url('https://ynoproject.net/2kki/images/badge/red.png')".to_string())
        );
        assert_eq!(page.background_image("#missing .badge").await.unwrap(), None);
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(matches!(
            HtmlPage::new("not a url", ""),
            Err(RelayError::Navigation(_))
        ));
    }

    #[test]
    fn test_inline_style_property() {
        assert_eq!(
            inline_style_property("color: red; Background-Image: url(x.png)", "background-image"),
            Some("url(x.png)".to_string())
        );
        assert_eq!(inline_style_property("color: red", "background-image"), None);
    }

    #[test]
    fn test_inline_style_keeps_data_url_intact() {
        let style = "width: 16px; background-image: url(data:image/png;base64,iVBORw0KGgo=); height: 16px";
        assert_eq!(
            inline_style_property(style, "background-image"),
            Some("url(data:image/png;base64,iVBORw0KGgo=)".to_string())
        );
        assert_eq!(inline_style_property(style, "height"), Some("16px".to_string()));

        let quoted = r#"background-image: url("data:image/svg+xml;utf8,<svg/>")"#;
        assert_eq!(
            inline_style_property(quoted, "background-image"),
            Some(r#"url("data:image/svg+xml;utf8,<svg/>")"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_background_image_with_data_url() {
        let page = HtmlPage::new(
            "https://ynoproject.net/2kki/",
            r#"<div id="badgeButton"><div class="badge" style="background-image: url(data:image/png;base64,AAAA)"></div></div>"#,
        )
        .unwrap();
        assert_eq!(
            page.background_image("#badgeButton .badge").await.unwrap(),
            Some("url(data:image/png;base64,AAAA)".to_string())
        );
    }
}
