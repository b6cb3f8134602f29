use anyhow::{Result, anyhow};
use log::debug;
use scraper::{ElementRef, Html, Selector};

use crate::models::TokenRecord;

/// CSS markers locating the token list in the board markup
#[derive(Debug, Clone)]
pub struct BoardLayout {
    pub container: String,
    pub entry: String,
    pub name: String,
    pub symbol: String,
    pub mint: String,
    pub social_link: String,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            container: "div.board".to_string(),
            entry: "div.token-entry".to_string(),
            name: "span.token-name".to_string(),
            symbol: "span.token-symbol".to_string(),
            mint: "span.token-mint".to_string(),
            social_link: "a.social-link".to_string(),
        }
    }
}

/// Turns board markup into token records
pub struct TokenExtractor {
    container: Selector,
    entry: Selector,
    name: Selector,
    symbol: Selector,
    mint: Selector,
    social_link: Selector,
}

fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Invalid selector '{}': {:?}", css, e))
}

impl TokenExtractor {
    pub fn new(layout: &BoardLayout) -> Result<Self> {
        Ok(Self {
            container: parse_selector(&layout.container)?,
            entry: parse_selector(&layout.entry)?,
            name: parse_selector(&layout.name)?,
            symbol: parse_selector(&layout.symbol)?,
            mint: parse_selector(&layout.mint)?,
            social_link: parse_selector(&layout.social_link)?,
        })
    }

    /// Extract every token entry of the first board container.
    ///
    /// Missing fields stay `None`; markup without a container yields no tokens.
    pub fn extract(&self, html: &str) -> Vec<TokenRecord> {
        let document = Html::parse_document(html);

        let Some(board) = document.select(&self.container).next() else {
            debug!("No board container found in page markup");
            return Vec::new();
        };

        board
            .select(&self.entry)
            .map(|entry| TokenRecord {
                name: first_text(&entry, &self.name),
                symbol: first_text(&entry, &self.symbol),
                mint_address: first_text(&entry, &self.mint),
                social_links: entry
                    .select(&self.social_link)
                    .filter_map(|link| link.value().attr("href"))
                    .map(str::to_string)
                    .collect(),
            })
            .collect()
    }
}

fn first_text(entry: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    let element = entry.select(selector).next()?;
    let text = element.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> TokenExtractor {
        TokenExtractor::new(&BoardLayout::default()).unwrap()
    }

    const BOARD: &str = r#"
        <html><body>
          <div class="board">
            <div class="token-entry">
              <span class="token-name"> Moon Cat </span>
              <span class="token-symbol">MCAT</span>
              <span class="token-mint">7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU</span>
              <a class="social-link" href="https://x.com/mooncat">x</a>
              <a class="social-link" href="https://t.me/mooncat">tg</a>
              <a class="social-link">no href</a>
            </div>
            <div class="token-entry">
              <span class="token-symbol">NONAME</span>
            </div>
          </div>
        </body></html>
    "#;

    #[test]
    fn extracts_entries_in_page_order() {
        let tokens = extractor().extract(BOARD);
        assert_eq!(tokens.len(), 2);

        let first = &tokens[0];
        assert_eq!(first.name.as_deref(), Some("Moon Cat"));
        assert_eq!(first.symbol.as_deref(), Some("MCAT"));
        assert_eq!(
            first.mint_address.as_deref(),
            Some("7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU")
        );
        assert_eq!(first.social_links, vec!["https://x.com/mooncat", "https://t.me/mooncat"]);
    }

    #[test]
    fn missing_fields_are_absent_not_errors() {
        let tokens = extractor().extract(BOARD);
        let second = &tokens[1];
        assert_eq!(second.name, None);
        assert_eq!(second.mint_address, None);
        assert_eq!(second.symbol.as_deref(), Some("NONAME"));
        assert!(second.social_links.is_empty());
    }

    #[test]
    fn markup_without_container_is_empty() {
        let extractor = extractor();
        for html in [
            "",
            "<html><body><div class=\"token-entry\">loose</div></body></html>",
            "<<<div class=board",
            "not html at all",
        ] {
            assert!(extractor.extract(html).is_empty(), "unexpected tokens for {:?}", html);
        }
    }

    #[test]
    fn custom_layout_is_honoured() {
        let layout = BoardLayout {
            container: "ul#coins".to_string(),
            entry: "li".to_string(),
            ..BoardLayout::default()
        };
        let html = r#"<ul id="coins"><li><span class="token-mint">abc</span></li></ul>"#;
        let tokens = TokenExtractor::new(&layout).unwrap().extract(html);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].mint_address.as_deref(), Some("abc"));
    }

    #[test]
    fn rejects_invalid_selectors() {
        let layout = BoardLayout { container: "div[".to_string(), ..BoardLayout::default() };
        assert!(TokenExtractor::new(&layout).is_err());
    }
}
