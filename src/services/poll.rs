use anyhow::Result;
use chrono::{Local, NaiveDate, Timelike};
use log::{info, warn};

use crate::config::AppConfig;
use crate::database::{self, captures, DbConn, UpsertOutcome};
use crate::domain::CaptureRecord;
use crate::errors::ScrapeError;
use crate::fetchers::EventPageFetcher;
use crate::reports::formatter;
use crate::scoreboard::{BattleParser, Scoreboard};

/// One full poll cycle: fetch the event page, extract the scoreboard,
/// persist newly observed results and print the report for the
/// downstream notifier.
pub struct PollService {
    config: AppConfig,
}

#[derive(Default)]
struct PersistStats {
    inserted: usize,
    duplicates: usize,
    failures: usize,
}

impl PollService {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<()> {
        info!("=== Starting Poll Cycle ===\n");

        let now = Local::now();
        let capture_date = now.date_naive();
        let capture_hour = now.hour();

        let fetcher = EventPageFetcher::new(&self.config.scraper)?;
        let page = fetcher.fetch_current().await?;

        let parser = BattleParser::new()?;
        let raw_battles = parser.parse(&page.body)?;
        info!("  → Parsed {} battle nodes\n", raw_battles.len());

        let scoreboard = Scoreboard::build(&raw_battles)?;

        let Some(round) = scoreboard.current_round() else {
            info!("Event {} has no rounds yet, nothing to do this cycle", page.event_id);
            return Ok(());
        };

        let battles = match scoreboard.current_scoreboard() {
            Ok(battles) => battles,
            Err(ScrapeError::EventNotOpen) => {
                // Expected between rounds and after the event concludes
                info!("Event {} is not open, nothing to do this cycle", page.event_id);
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        self.persist_scoreboard(&scoreboard, page.event_id, capture_date, capture_hour);

        let report =
            formatter::render_poll_report(page.event_id, round, battles, capture_date, capture_hour);
        println!("{report}");

        info!("=== Poll Cycle Complete ===");
        Ok(())
    }

    /// Best-effort persistence: storage trouble is logged and the
    /// cycle continues to the report either way.
    fn persist_scoreboard(
        &self,
        scoreboard: &Scoreboard,
        event: i64,
        capture_date: NaiveDate,
        capture_hour: u32,
    ) {
        let mut conn = match self.open_connection() {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Skipping persistence: {:#}", e);
                return;
            }
        };

        let stats = self.upsert_all(&mut conn, scoreboard, event, capture_date, capture_hour);
        info!(
            "  → Persisted scoreboard: {} new, {} already stored, {} failed\n",
            stats.inserted, stats.duplicates, stats.failures
        );
    }

    fn open_connection(&self) -> Result<DbConn> {
        let pool = database::create_pool(&self.config.database.path)?;
        let mut conn = database::get_connection(&pool)?;
        database::setup::ensure_schema(&mut conn)?;
        Ok(conn)
    }

    fn upsert_all(
        &self,
        conn: &mut DbConn,
        scoreboard: &Scoreboard,
        event: i64,
        capture_date: NaiveDate,
        capture_hour: u32,
    ) -> PersistStats {
        let mut stats = PersistStats::default();

        for (round, battles) in scoreboard.rounds() {
            for battle in battles {
                let record = CaptureRecord {
                    event,
                    round: *round,
                    battle: battle.clone(),
                    capture_date,
                    capture_hour,
                };

                match captures::upsert_capture(conn, &record) {
                    Ok(UpsertOutcome::Inserted) => stats.inserted += 1,
                    Ok(UpsertOutcome::Duplicate) => stats.duplicates += 1,
                    Err(e) => {
                        stats.failures += 1;
                        warn!("Failed to store battle in round {}: {:#}", round, e);
                    }
                }
            }
        }

        stats
    }
}
