//! Records our backend has already normalized (snake_case), and this crate's
//! own output (camelCase).

use super::Draft;
use crate::fields;
use crate::kickoff;
use crate::odds;
use serde_json::Value;

pub(super) fn extract(raw: &Value) -> Draft {
    let league = raw.get("league");
    let mut draft = Draft {
        id: fields::text_of(raw, &["id", "match_id", "fixture_id"]),
        league: fields::name_of(raw, &["league", "league_name"]),
        league_flag: fields::text_of(raw, &["league_flag", "leagueFlag", "league_logo"])
            .or_else(|| league.and_then(|l| fields::text_of(l, &["logo", "flag", "image_path"]))),
        country: fields::name_of(raw, &["country"])
            .or_else(|| league.and_then(|l| fields::name_of(l, &["country"]))),
        sport_key: fields::text_of(raw, &["sport_key", "sportKey"]),
        home_team: fields::name_of(raw, &["home_team", "homeTeam"]),
        away_team: fields::name_of(raw, &["away_team", "awayTeam"]),
        home_team_logo: fields::text_of(raw, &["home_team_logo", "homeTeamLogo", "home_logo"]),
        away_team_logo: fields::text_of(raw, &["away_team_logo", "awayTeamLogo", "away_logo"]),
        status: fields::text_of(raw, &["status"]),
        completed: fields::flag_of(raw, &["is_finished", "isFinished"]),
        is_live: fields::flag_of(raw, &["is_live", "isLive"]),
        minute: fields::count_of(raw, &["minute", "elapsed"]),
        stats: fields::passthrough(raw.get("stats")),
        events: fields::passthrough_list(raw.get("events")),
        lineups: fields::passthrough_list(raw.get("lineups")),
        ..Draft::default()
    };

    (draft.home_score, draft.away_score) = scores(raw);
    draft.kickoff = fields::first(raw, &["commence_time", "starting_at", "start_time", "timestamp", "kickoff"])
        .and_then(kickoff::from_value)
        .or_else(|| {
            let date = fields::text_of(raw, &["date"])?;
            kickoff::parse_date_time(&date, fields::text_of(raw, &["time"]).as_deref())
        });

    let (home, away) = draft.teams();
    let (home, away) = (home.to_owned(), away.to_owned());

    let grouped = fields::list(raw, "markets");
    let (primary, book) = if grouped.is_empty() {
        odds::from_flat(fields::list(raw, "odds"), &home, &away)
    } else {
        odds::from_grouped(grouped, &home, &away)
    };
    draft.book = book;
    draft.odds = primary.or_else(|| raw.get("odds").and_then(odds::from_object));

    draft
}

fn scores(raw: &Value) -> (Option<u32>, Option<u32>) {
    let home = fields::count_of(raw, &["home_score", "homeScore"]);
    let away = fields::count_of(raw, &["away_score", "awayScore"]);
    if home.is_some() || away.is_some() {
        return (home, away);
    }
    match raw.get("scores") {
        Some(obj @ Value::Object(_)) => (fields::count_of(obj, &["home"]), fields::count_of(obj, &["away"])),
        _ => fields::text_of(raw, &["score"])
            .and_then(|s| fields::score_pair(&s))
            .map_or((None, None), |(h, a)| (Some(h), Some(a))),
    }
}
