use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One side of a head-to-head battle
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HeroScore {
    pub hero: String,
    pub score: u64,
}

/// One head-to-head matchup within a round, sides in encounter order.
///
/// Content equality and ordering derive from the (hero, score) pairs;
/// this is what keys persisted captures and sorts report output.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Battle {
    pub first: HeroScore,
    pub second: HeroScore,
}

impl Battle {
    pub fn new(first_hero: impl Into<String>, first_score: u64,
               second_hero: impl Into<String>, second_score: u64) -> Self {
        Self {
            first: HeroScore { hero: first_hero.into(), score: first_score },
            second: HeroScore { hero: second_hero.into(), score: second_score },
        }
    }

    /// Score recorded for the given hero in this battle, if it appears
    pub fn score_for(&self, hero: &str) -> Option<u64> {
        if self.first.hero == hero {
            Some(self.first.score)
        } else if self.second.hero == hero {
            Some(self.second.score)
        } else {
            None
        }
    }
}

/// Battle node as extracted from the markup, before score parsing.
///
/// `round` is 0 when no round marker token was found on the enclosing
/// heading; callers must treat 0 as "round not determined", never as a
/// real round. `concluded` is set when the node carries the terminal
/// win marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBattle {
    pub round: u32,
    pub first_hero: String,
    pub first_score_text: String,
    pub second_hero: String,
    pub second_score_text: String,
    pub concluded: bool,
}

/// A persisted observation of a battle with capture metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRecord {
    pub event: i64,
    pub round: u32,
    pub battle: Battle,
    pub capture_date: NaiveDate,
    pub capture_hour: u32,
}
