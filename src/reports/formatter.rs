use chrono::NaiveDate;

use crate::domain::Battle;

/// Fixed display width for hero names (padded or truncated).
/// Width is counted in chars, not terminal columns, so wide glyphs
/// (CJK names) can still occupy more than one column each.
const HERO_WIDTH: usize = 8;

/// Display width for right-aligned scores with grouping separators
const SCORE_WIDTH: usize = 15;

/// Display name for a round; round 3 is conventionally the final phase
pub fn round_label(round: u32) -> String {
    match round {
        3 => "Final Round".to_string(),
        n => format!("Round {n}"),
    }
}

/// Format an integer with thousands separators, e.g. 1234567 → "1,234,567"
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}

/// One report line per battle: names left-aligned in a fixed column,
/// scores right-aligned with separators, the two sides joined by "VS"
pub fn battle_line(battle: &Battle) -> String {
    format!(
        "{:<hero$}{:>score$}    VS    {:<hero$}{:>score$}",
        clip_hero(&battle.first.hero),
        group_thousands(battle.first.score),
        clip_hero(&battle.second.hero),
        group_thousands(battle.second.score),
        hero = HERO_WIDTH,
        score = SCORE_WIDTH,
    )
}

/// Human-readable report for the current round, rendered for the
/// downstream notifier
pub fn render_poll_report(
    event: i64,
    round: u32,
    battles: &[Battle],
    date: NaiveDate,
    hour: u32,
) -> String {
    let timestamp = format!("{} {}:00:00", date.format("%Y%m%d"), hour);

    let mut lines = Vec::with_capacity(battles.len() + 3);
    lines.push(format!(
        "Voting Gauntlet #{event} {} - {timestamp}",
        round_label(round)
    ));
    lines.extend(battles.iter().map(battle_line));
    lines.push(String::new());
    lines.push(timestamp);

    lines.join("\n")
}

fn clip_hero(hero: &str) -> String {
    hero.chars().take(HERO_WIDTH).collect()
}
