use anyhow::{Context, Result};
use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::domain::RawBattle;
use crate::errors::ScrapeError;

/// Class token substring marking a round heading, e.g. "tournament-02"
const ROUND_MARKER: &str = "tournament";

/// Substring a battle node carries once its outcome is final
const WIN_MARKER: &str = "win";

/// Extracts battle nodes from the event page markup.
///
/// Each battle is an `li.tournaments-battle` carrying four `<p>` texts
/// (hero A, score A, hero B, score B) and is attributed to the round
/// announced by the nearest enclosing article's heading classes.
pub struct BattleParser {
    battle_selector: Selector,
    field_selector: Selector,
    heading_selector: Selector,
    round_suffix_regex: Regex,
}

impl BattleParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            battle_selector: Selector::parse("li.tournaments-battle")
                .expect("battle selector is valid"),
            field_selector: Selector::parse("p").expect("field selector is valid"),
            heading_selector: Selector::parse("h2").expect("heading selector is valid"),
            round_suffix_regex: Self::compile_round_regex()?,
        })
    }

    /// Parse the page body into battle nodes in document order
    pub fn parse(&self, body: &str) -> Result<Vec<RawBattle>, ScrapeError> {
        let html = Html::parse_document(body);

        let mut battles = Vec::new();
        for node in html.select(&self.battle_selector) {
            battles.push(self.parse_battle(node)?);
        }

        debug!("Parsed {} battle nodes", battles.len());
        Ok(battles)
    }

    fn parse_battle(&self, node: ElementRef) -> Result<RawBattle, ScrapeError> {
        let fields = self.extract_fields(node);
        if fields.len() < 4 {
            return Err(ScrapeError::MalformedBattle {
                found: fields.len(),
            });
        }

        let mut fields = fields.into_iter();
        Ok(RawBattle {
            round: self.extract_round(node),
            first_hero: fields.next().unwrap_or_default(),
            first_score_text: fields.next().unwrap_or_default(),
            second_hero: fields.next().unwrap_or_default(),
            second_score_text: fields.next().unwrap_or_default(),
            concluded: node.html().contains(WIN_MARKER),
        })
    }

    fn extract_fields(&self, node: ElementRef) -> Vec<String> {
        node.select(&self.field_selector)
            .map(|p| p.text().collect::<String>())
            .collect()
    }

    /// Round number from the enclosing article's heading classes.
    ///
    /// The first class token containing the round marker carries the
    /// round as its numeric suffix; anything else yields the round 0
    /// sentinel ("round not determined").
    fn extract_round(&self, node: ElementRef) -> u32 {
        let Some(heading) = self.find_round_heading(node) else {
            return 0;
        };

        for class in heading.value().classes() {
            if !class.contains(ROUND_MARKER) {
                continue;
            }
            return self.parse_round_suffix(class);
        }

        0
    }

    fn find_round_heading<'a>(&self, node: ElementRef<'a>) -> Option<ElementRef<'a>> {
        let article = node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "article")?;

        article.select(&self.heading_selector).next()
    }

    fn parse_round_suffix(&self, class: &str) -> u32 {
        self.round_suffix_regex
            .captures(class)
            .and_then(|caps| caps.get(1))
            .and_then(|suffix| suffix.as_str().parse().ok())
            .unwrap_or(0)
    }

    fn compile_round_regex() -> Result<Regex> {
        Regex::new(r"-(\d+)$").context("Failed to compile round suffix regex")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(inner: &str) -> String {
        format!("<html><body>{inner}</body></html>")
    }

    fn battle_node(hero_a: &str, score_a: &str, hero_b: &str, score_b: &str) -> String {
        format!(
            "<li class=\"tournaments-battle\">\
             <p>{hero_a}</p><p>{score_a}</p><p>{hero_b}</p><p>{score_b}</p>\
             </li>"
        )
    }

    #[test]
    fn extracts_four_fields_in_order() {
        let parser = BattleParser::new().unwrap();
        let body = page(&format!(
            "<article><h2 class=\"tournament-01\"></h2><ul>{}</ul></article>",
            battle_node("Alice", "12,345", "Bob", "9,876")
        ));

        let battles = parser.parse(&body).unwrap();

        assert_eq!(battles.len(), 1);
        assert_eq!(battles[0].first_hero, "Alice");
        assert_eq!(battles[0].first_score_text, "12,345");
        assert_eq!(battles[0].second_hero, "Bob");
        assert_eq!(battles[0].second_score_text, "9,876");
    }

    #[test]
    fn round_comes_from_heading_class_token() {
        let parser = BattleParser::new().unwrap();
        let body = page(&format!(
            "<article><h2 class=\"title tournament-02\"></h2><ul>{}</ul></article>",
            battle_node("Alice", "100", "Bob", "")
        ));

        let battles = parser.parse(&body).unwrap();
        assert_eq!(battles[0].round, 2);
    }

    #[test]
    fn missing_round_marker_defaults_to_sentinel() {
        let parser = BattleParser::new().unwrap();
        let body = page(&format!(
            "<article><h2 class=\"title\"></h2><ul>{}</ul></article>",
            battle_node("Alice", "100", "Bob", "50")
        ));

        let battles = parser.parse(&body).unwrap();
        assert_eq!(battles[0].round, 0);
    }

    #[test]
    fn fewer_than_four_fields_is_malformed() {
        let parser = BattleParser::new().unwrap();
        let body = page(
            "<article><h2 class=\"tournament-01\"></h2>\
             <ul><li class=\"tournaments-battle\"><p>Alice</p><p>100</p></li></ul></article>",
        );

        assert_eq!(
            parser.parse(&body),
            Err(ScrapeError::MalformedBattle { found: 2 })
        );
    }

    #[test]
    fn win_marker_flags_battle_as_concluded() {
        let parser = BattleParser::new().unwrap();
        let body = page(&format!(
            "<article><h2 class=\"tournament-03\"></h2><ul>\
             <li class=\"tournaments-battle win\"><p>Alice</p><p>100</p><p>Bob</p><p>50</p></li>\
             {}</ul></article>",
            battle_node("Carol", "70", "Dave", "30")
        ));

        let battles = parser.parse(&body).unwrap();
        assert!(battles[0].concluded);
        assert!(!battles[1].concluded);
    }

    #[test]
    fn parsing_is_deterministic() {
        let parser = BattleParser::new().unwrap();
        let body = page(&format!(
            "<article><h2 class=\"tournament-01\"></h2><ul>{}{}</ul></article>",
            battle_node("Alice", "100", "Bob", "50"),
            battle_node("Carol", "70", "Dave", "30")
        ));

        let first = parser.parse(&body).unwrap();
        let second = parser.parse(&body).unwrap();
        assert_eq!(first.len(), second.len());
        assert_eq!(first[1].first_hero, second[1].first_hero);
    }
}
