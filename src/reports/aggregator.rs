use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Battle, CaptureRecord};

/// Row of the chronological export; event is implied by the file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRecord {
    pub round: u32,
    pub battle: Battle,
    pub date: NaiveDate,
    pub hour: u32,
}

impl From<&CaptureRecord> for ExportRecord {
    fn from(record: &CaptureRecord) -> Self {
        Self {
            round: record.round,
            battle: record.battle.clone(),
            date: record.capture_date,
            hour: record.capture_hour,
        }
    }
}

/// One deduplicated best battle of the leaderboard view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub date: NaiveDate,
    pub round: u32,
    pub battle: Battle,
}

/// Chronological export of the persisted history; input order
/// (round, battle content, date, hour) is preserved.
pub fn chronological_export(records: &[CaptureRecord]) -> Vec<ExportRecord> {
    records.iter().map(ExportRecord::from).collect()
}

/// Best-score-per-hero-per-round reduction.
///
/// For every (round, hero) keep the record where that hero's score is
/// maximal (first record wins ties), then deduplicate the resulting
/// (round, battle) pairs, sorted by round and battle content.
pub fn leaderboard(records: &[CaptureRecord]) -> Vec<LeaderboardEntry> {
    let best = best_per_hero(records);
    dedup_and_sort(best)
}

fn best_per_hero<'a>(
    records: &'a [CaptureRecord],
) -> HashMap<(u32, &'a str), &'a CaptureRecord> {
    let mut best: HashMap<(u32, &str), &CaptureRecord> = HashMap::new();

    for record in records {
        for side in [&record.battle.first, &record.battle.second] {
            let entry = best
                .entry((record.round, side.hero.as_str()))
                .or_insert(record);

            let current = entry.battle.score_for(&side.hero).unwrap_or(0);
            if side.score > current {
                *entry = record;
            }
        }
    }

    best
}

fn dedup_and_sort(best: HashMap<(u32, &str), &CaptureRecord>) -> Vec<LeaderboardEntry> {
    let mut deduped: BTreeMap<(u32, Battle), NaiveDate> = BTreeMap::new();

    for record in best.into_values() {
        deduped
            .entry((record.round, record.battle.clone()))
            .or_insert(record.capture_date);
    }

    deduped
        .into_iter()
        .map(|((round, battle), date)| LeaderboardEntry { date, round, battle })
        .collect()
}
