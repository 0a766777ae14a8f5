use std::collections::BTreeMap;

use crate::domain::{Battle, HeroScore, RawBattle};
use crate::errors::ScrapeError;

/// Per-poll snapshot of decided battles grouped by round.
///
/// Built fresh on every poll; nothing carries over between cycles.
#[derive(Debug, Default)]
pub struct Scoreboard {
    rounds: BTreeMap<u32, Vec<Battle>>,
    undecided_nodes: usize,
}

impl Scoreboard {
    /// Fold parsed battle nodes into the round map.
    ///
    /// A battle whose first score text is empty is not decided yet: it
    /// is skipped, but its round key is still created so "round exists
    /// with no decided battles" is distinguishable from "round never
    /// observed". Battles keep encounter order within a round.
    pub fn build(raw_battles: &[RawBattle]) -> Result<Self, ScrapeError> {
        let mut scoreboard = Self::default();

        for raw in raw_battles {
            scoreboard.fold_battle(raw)?;
        }

        Ok(scoreboard)
    }

    fn fold_battle(&mut self, raw: &RawBattle) -> Result<(), ScrapeError> {
        let battles = self.rounds.entry(raw.round).or_default();

        if !raw.concluded {
            self.undecided_nodes += 1;
        }

        if raw.first_score_text.is_empty() {
            return Ok(());
        }

        battles.push(Battle {
            first: HeroScore {
                hero: raw.first_hero.clone(),
                score: parse_score(&raw.first_score_text)?,
            },
            second: HeroScore {
                hero: raw.second_hero.clone(),
                score: parse_score(&raw.second_score_text)?,
            },
        });

        Ok(())
    }

    pub fn rounds(&self) -> &BTreeMap<u32, Vec<Battle>> {
        &self.rounds
    }

    /// Highest round observed in the markup; None when no battle node
    /// was found at all
    pub fn current_round(&self) -> Option<u32> {
        self.rounds.keys().next_back().copied()
    }

    /// Decided battles of the current round.
    ///
    /// `EventNotOpen` when the current round has no decided battles
    /// yet, or when every scraped node has concluded (the event is
    /// closed pending a new round). Callers treat it as "nothing to do
    /// this cycle", not as a failure.
    pub fn current_scoreboard(&self) -> Result<&[Battle], ScrapeError> {
        let battles = self
            .current_round()
            .and_then(|round| self.rounds.get(&round))
            .map(Vec::as_slice)
            .unwrap_or_default();

        if battles.is_empty() || self.undecided_nodes == 0 {
            return Err(ScrapeError::EventNotOpen);
        }

        Ok(battles)
    }
}

/// Parse a score text as an integer after stripping thousands separators
fn parse_score(text: &str) -> Result<u64, ScrapeError> {
    text.replace(',', "")
        .parse()
        .map_err(|_| ScrapeError::MalformedScore(text.to_string()))
}
