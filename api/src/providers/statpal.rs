//! StatPal livescore entries.
//!
//! StatPal reuses `status` for the running minute ("67") and sends kickoff
//! as separate `date` and `time` fields in local time.

use super::Draft;
use crate::fields;
use crate::kickoff;
use crate::odds;
use serde_json::Value;

pub(super) fn extract(raw: &Value) -> Draft {
    let home = raw.get("home");
    let away = raw.get("away");
    let league = raw.get("league");

    let (home_score, away_score) = scores(raw);
    let mut draft = Draft {
        id: fields::text_of(raw, &["main_id", "id", "fixture_id"]),
        league: fields::name_of(raw, &["league", "competition"]),
        league_flag: league.and_then(|l| fields::text_of(l, &["logo", "flag"])),
        country: fields::name_of(raw, &["country"])
            .or_else(|| league.and_then(|l| fields::name_of(l, &["country"]))),
        home_team: home.and_then(team_name),
        away_team: away.and_then(team_name),
        home_team_logo: home.and_then(|t| fields::text_of(t, &["logo", "image", "image_path"])),
        away_team_logo: away.and_then(|t| fields::text_of(t, &["logo", "image", "image_path"])),
        home_score,
        away_score,
        status: fields::text_of(raw, &["status"]),
        is_live: fields::flag_of(raw, &["is_live", "live"]),
        kickoff: fields::text_of(raw, &["date", "formatted_date"])
            .and_then(|date| kickoff::parse_date_time(&date, fields::text_of(raw, &["time"]).as_deref())),
        stats: fields::passthrough(raw.get("stats")),
        events: fields::passthrough_list(raw.get("events")),
        lineups: fields::passthrough_list(raw.get("lineups")),
        ..Draft::default()
    };

    let (home_name, away_name) = draft.teams();
    let (home_name, away_name) = (home_name.to_owned(), away_name.to_owned());
    let (primary, book) = odds::from_flat(fields::list(raw, "odds"), &home_name, &away_name);
    draft.odds = primary;
    draft.book = book;

    draft
}

fn team_name(team: &Value) -> Option<String> {
    match team {
        Value::Object(_) => fields::text_of(team, &["name"]),
        other => fields::text(other),
    }
}

/// First complete pair from: full-time result, current goals, the `score`
/// string, the half-time result.
fn scores(raw: &Value) -> (Option<u32>, Option<u32>) {
    let goals = || {
        let home = raw.get("home").and_then(|t| fields::count_of(t, &["goals"]))?;
        let away = raw.get("away").and_then(|t| fields::count_of(t, &["goals"]))?;
        Some((home, away))
    };
    let score_string = || fields::text_of(raw, &["score"]).and_then(|s| fields::score_pair(&s));

    raw.get("ft")
        .and_then(period_result)
        .or_else(goals)
        .or_else(score_string)
        .or_else(|| raw.get("ht").and_then(period_result))
        .map_or((None, None), |(h, a)| (Some(h), Some(a)))
}

/// `{"home_goals": 2, "away_goals": 1}`, `{"score": "2-1"}` or `"2-1"`.
fn period_result(period: &Value) -> Option<(u32, u32)> {
    if let Value::String(s) = period {
        return fields::score_pair(s);
    }
    let home = fields::count_of(period, &["home_goals", "home"]);
    let away = fields::count_of(period, &["away_goals", "away"]);
    home.zip(away)
        .or_else(|| fields::text_of(period, &["score"]).and_then(|s| fields::score_pair(&s)))
}
