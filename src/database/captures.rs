use anyhow::{Context, Result};
use rusqlite::params;

use super::connection::DbConn;
use crate::domain::{Battle, CaptureRecord, HeroScore};

/// What a capture upsert did.
///
/// Insert-only semantics: a record keyed by (round, battle content)
/// is written at most once, and metadata keeps its first-seen values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Duplicate,
}

/// Insert the capture unless a record with the same (round, battle
/// content) already exists. Safe under repeated and concurrent polls;
/// the conflict check is atomic in SQLite.
pub fn upsert_capture(conn: &mut DbConn, record: &CaptureRecord) -> Result<UpsertOutcome> {
    let sql = "INSERT INTO captures (event, round, first_hero, first_score, second_hero, second_score, capture_date, capture_hour) \
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
               ON CONFLICT (round, first_hero, first_score, second_hero, second_score) DO NOTHING";

    let changed = conn
        .execute(
            sql,
            params![
                record.event,
                record.round,
                record.battle.first.hero,
                record.battle.first.score,
                record.battle.second.hero,
                record.battle.second.score,
                record.capture_date,
                record.capture_hour,
            ],
        )
        .context("Failed to upsert capture record")?;

    Ok(if changed == 0 {
        UpsertOutcome::Duplicate
    } else {
        UpsertOutcome::Inserted
    })
}

/// All captures for an event, sorted by (round, battle content,
/// capture date, capture hour)
pub fn list_by_event(conn: &mut DbConn, event: i64) -> Result<Vec<CaptureRecord>> {
    let sql = "SELECT event, round, first_hero, first_score, second_hero, second_score, capture_date, capture_hour \
               FROM captures WHERE event = ?1 \
               ORDER BY round, first_hero, first_score, second_hero, second_score, capture_date, capture_hour";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![event], parse_capture_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn event_has_records(conn: &mut DbConn, event: i64) -> Result<bool> {
    let sql = "SELECT EXISTS(SELECT 1 FROM captures WHERE event = ?1)";
    conn.query_row(sql, params![event], |row| row.get(0))
        .context("Failed to check for event records")
}

/// Highest event id present in the store, if any
pub fn latest_event(conn: &mut DbConn) -> Result<Option<i64>> {
    let sql = "SELECT MAX(event) FROM captures";
    conn.query_row(sql, [], |row| row.get(0))
        .context("Failed to query latest event")
}

fn parse_capture_row(row: &rusqlite::Row) -> rusqlite::Result<CaptureRecord> {
    Ok(CaptureRecord {
        event: row.get(0)?,
        round: row.get(1)?,
        battle: Battle {
            first: HeroScore {
                hero: row.get(2)?,
                score: row.get(3)?,
            },
            second: HeroScore {
                hero: row.get(4)?,
                score: row.get(5)?,
            },
        },
        capture_date: row.get(6)?,
        capture_hour: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::connection::create_memory_pool;
    use crate::database::setup::ensure_schema;
    use chrono::NaiveDate;

    fn test_conn() -> DbConn {
        let pool = create_memory_pool().unwrap();
        let mut conn = pool.get().unwrap();
        ensure_schema(&mut conn).unwrap();
        conn
    }

    fn record(event: i64, round: u32, battle: Battle, day: u32, hour: u32) -> CaptureRecord {
        CaptureRecord {
            event,
            round,
            battle,
            capture_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            capture_hour: hour,
        }
    }

    #[test]
    fn repeated_upsert_of_same_battle_stores_one_record() {
        let mut conn = test_conn();
        let capture = record(42, 1, Battle::new("Alice", 12345, "Bob", 9876), 1, 8);

        assert_eq!(
            upsert_capture(&mut conn, &capture).unwrap(),
            UpsertOutcome::Inserted
        );
        assert_eq!(
            upsert_capture(&mut conn, &capture).unwrap(),
            UpsertOutcome::Duplicate
        );

        let stored = list_by_event(&mut conn, 42).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].battle, capture.battle);
    }

    #[test]
    fn duplicate_keeps_first_seen_metadata() {
        let mut conn = test_conn();
        let battle = Battle::new("Alice", 100, "Bob", 50);

        upsert_capture(&mut conn, &record(42, 1, battle.clone(), 1, 8)).unwrap();
        upsert_capture(&mut conn, &record(42, 1, battle, 2, 20)).unwrap();

        let stored = list_by_event(&mut conn, 42).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].capture_date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(stored[0].capture_hour, 8);
    }

    #[test]
    fn same_battle_content_in_another_round_is_distinct() {
        let mut conn = test_conn();
        let battle = Battle::new("Alice", 100, "Bob", 50);

        upsert_capture(&mut conn, &record(42, 1, battle.clone(), 1, 8)).unwrap();
        assert_eq!(
            upsert_capture(&mut conn, &record(42, 2, battle, 1, 8)).unwrap(),
            UpsertOutcome::Inserted
        );

        assert_eq!(list_by_event(&mut conn, 42).unwrap().len(), 2);
    }

    #[test]
    fn list_sorts_by_round_then_battle_then_time() {
        let mut conn = test_conn();

        upsert_capture(&mut conn, &record(7, 2, Battle::new("Bob", 10, "Carol", 5), 1, 8)).unwrap();
        upsert_capture(&mut conn, &record(7, 1, Battle::new("Carol", 70, "Dave", 30), 1, 8)).unwrap();
        upsert_capture(&mut conn, &record(7, 1, Battle::new("Alice", 100, "Bob", 50), 2, 9)).unwrap();

        let stored = list_by_event(&mut conn, 7).unwrap();
        let order: Vec<(u32, &str)> = stored
            .iter()
            .map(|r| (r.round, r.battle.first.hero.as_str()))
            .collect();

        assert_eq!(order, vec![(1, "Alice"), (1, "Carol"), (2, "Bob")]);
    }

    #[test]
    fn latest_event_and_existence_checks() {
        let mut conn = test_conn();
        assert_eq!(latest_event(&mut conn).unwrap(), None);

        upsert_capture(&mut conn, &record(41, 1, Battle::new("Alice", 1, "Bob", 2), 1, 0)).unwrap();
        upsert_capture(&mut conn, &record(42, 1, Battle::new("Carol", 3, "Dave", 4), 1, 0)).unwrap();

        assert_eq!(latest_event(&mut conn).unwrap(), Some(42));
        assert!(event_has_records(&mut conn, 41).unwrap());
        assert!(!event_has_records(&mut conn, 99).unwrap());
    }
}
