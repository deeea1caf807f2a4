//! The Odds API events (`/v4/sports/{sport}/odds` and `/scores`).
//!
//! Also the fallback for anything no other shape claimed, so every field
//! is read leniently and a non-object payload simply yields defaults.

use super::Draft;
use crate::fields;
use crate::kickoff;
use crate::odds::{self, MarketBook, Quote, ThreeWay};
use log::debug;
use serde_json::Value;

pub(super) fn extract(raw: &Value) -> Draft {
    let score_list = fields::list(raw, "scores");
    let mut draft = Draft {
        id: fields::text_of(raw, &["id"]),
        league: fields::text_of(raw, &["sport_title"]),
        sport_key: fields::text_of(raw, &["sport_key"]),
        home_team: fields::text_of(raw, &["home_team"]),
        away_team: fields::text_of(raw, &["away_team"]),
        status: fields::text_of(raw, &["status"]),
        completed: fields::flag_of(raw, &["completed"]),
        is_live: fields::flag_of(raw, &["is_live"]),
        has_scores: !score_list.is_empty(),
        kickoff: raw.get("commence_time").and_then(kickoff::from_value),
        last_update: raw.get("last_update").and_then(kickoff::from_value),
        ..Draft::default()
    };

    let (home, away) = draft.teams();
    let (home, away) = (home.to_owned(), away.to_owned());

    (draft.home_score, draft.away_score) = scores(score_list, &home, &away);

    let bookmakers = fields::list(raw, "bookmakers");
    draft.odds = head_to_head(bookmakers, &home, &away);
    draft.book = other_markets(bookmakers, &home, &away);

    draft
}

/// Scores arrive as `[{name, score}]` in no particular order; names decide
/// which side each belongs to.
fn scores(list: &[Value], home: &str, away: &str) -> (Option<u32>, Option<u32>) {
    let names: Vec<String> = list
        .iter()
        .map(|s| fields::text_of(s, &["name"]).unwrap_or_default())
        .collect();
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let mut result = (None, None);
    for (entry, side) in list.iter().zip(odds::assign_sides(&name_refs, home, away)) {
        let goals = fields::count_of(entry, &["score"]);
        match side {
            Some(odds::Side::Home) if result.0.is_none() => result.0 = goals,
            Some(odds::Side::Away) if result.1.is_none() => result.1 = goals,
            _ => {}
        }
    }
    result
}

fn outcomes(market: &Value) -> &[Value] {
    fields::list(market, "outcomes")
}

/// The h2h market from the first bookmaker whose outcomes resolve.
fn head_to_head(bookmakers: &[Value], home: &str, away: &str) -> Option<ThreeWay> {
    bookmakers.iter().find_map(|bookmaker| {
        let market = fields::list(bookmaker, "markets")
            .iter()
            .find(|m| fields::text_of(m, &["key"]).as_deref() == Some("h2h"))?;

        let names: Vec<String> = outcomes(market)
            .iter()
            .map(|o| fields::text_of(o, &["name"]).unwrap_or_default())
            .collect();
        let quotes: Vec<Quote<'_>> = names
            .iter()
            .zip(outcomes(market))
            .map(|(name, o)| Quote {
                name: name.as_str(),
                price: o.get("price").and_then(fields::number),
            })
            .collect();

        let resolved = odds::resolve_three_way(&quotes, home, away);
        if resolved.is_none() {
            debug!(
                "bookmaker {:?}: h2h outcomes unusable, trying next",
                fields::text_of(bookmaker, &["key", "title"])
            );
        }
        resolved
    })
}

/// Every market other than h2h, merged across bookmakers.
fn other_markets(bookmakers: &[Value], home: &str, away: &str) -> MarketBook {
    let mut book = MarketBook::new();
    for bookmaker in bookmakers {
        for market in fields::list(bookmaker, "markets") {
            let Some(key) = fields::text_of(market, &["key"]) else {
                continue;
            };
            if key == "h2h" {
                continue;
            }

            let outcomes = outcomes(market);
            let names: Vec<String> = outcomes
                .iter()
                .map(|o| fields::text_of(o, &["name"]).unwrap_or_default())
                .collect();
            let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
            let sides = odds::team_labels(&name_refs, home, away);

            for (idx, outcome) in outcomes.iter().enumerate() {
                let base = sides
                    .as_ref()
                    .and_then(|s| s.get(idx).copied().flatten())
                    .map(str::to_owned)
                    .unwrap_or_else(|| names[idx].clone());
                let label = match outcome.get("point").and_then(fields::number) {
                    Some(point) if sides.is_some() => format!("{base} ({})", odds::format_point(point, true)),
                    Some(point) => format!("{base} {}", odds::format_point(point, false)),
                    None => base,
                };
                book.add(Some(&key), &key, &label, outcome.get("price").and_then(fields::number));
            }
        }
    }
    book
}
