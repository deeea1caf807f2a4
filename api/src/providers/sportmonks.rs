//! Sportmonks V3 fixtures, with `participants`, `scores`, `state`,
//! `periods`, `league.country` and `odds` includes.

use super::Draft;
use crate::fields;
use crate::kickoff;
use crate::odds;
use serde_json::Value;

/// `state_id` → developer name, for payloads fetched without the `state`
/// include.
const STATES: &[(i64, &str)] = &[
    (1, "NS"),
    (2, "INPLAY_1ST_HALF"),
    (3, "HT"),
    (4, "BREAK"),
    (5, "FT"),
    (6, "INPLAY_ET"),
    (7, "AET"),
    (8, "FT_PEN"),
    (9, "INPLAY_PENALTIES"),
    (10, "POSTPONED"),
    (11, "SUSPENDED"),
    (12, "CANCELLED"),
    (13, "TBA"),
    (14, "WO"),
    (15, "ABANDONED"),
    (16, "DELAYED"),
    (17, "AWARDED"),
    (18, "INTERRUPTED"),
    (19, "AWAITING_UPDATES"),
    (20, "DELETED"),
    (21, "EXTRA_TIME_BREAK"),
    (22, "INPLAY_2ND_HALF"),
    (25, "PENALTIES_BREAK"),
    (26, "PENDING"),
];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Location {
    Home,
    Away,
}

impl Location {
    fn key(self) -> &'static str {
        match self {
            Location::Home => "home",
            Location::Away => "away",
        }
    }
}

pub(super) fn extract(raw: &Value) -> Draft {
    let participants = fields::list(raw, "participants");
    let home = participant(participants, Location::Home);
    let away = participant(participants, Location::Away);
    let league = raw.get("league");

    let mut draft = Draft {
        id: fields::text_of(raw, &["id"]),
        league: league.and_then(|l| fields::text_of(l, &["name"])),
        league_flag: league.and_then(|l| fields::text_of(l, &["image_path"])),
        country: league
            .and_then(|l| l.get("country"))
            .and_then(|c| fields::text_of(c, &["name"]))
            .or_else(|| fields::name_of(raw, &["country"])),
        sport_key: Some(String::new()),
        home_team: home.and_then(|p| fields::text_of(p, &["name"])),
        away_team: away.and_then(|p| fields::text_of(p, &["name"])),
        home_team_logo: home.and_then(|p| fields::text_of(p, &["image_path"])),
        away_team_logo: away.and_then(|p| fields::text_of(p, &["image_path"])),
        home_score: score(raw, home, Location::Home),
        away_score: score(raw, away, Location::Away),
        status: state_token(raw),
        is_live: fields::flag_of(raw, &["is_live"]),
        minute: ticking_minute(raw),
        kickoff: fields::first(raw, &["starting_at_timestamp"])
            .and_then(kickoff::from_value)
            .or_else(|| raw.get("starting_at").and_then(kickoff::from_value)),
        stats: fields::passthrough(raw.get("statistics")),
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

/// The participant playing at `location`; falls back to list position
/// (home first) when `meta.location` is missing.
fn participant(participants: &[Value], location: Location) -> Option<&Value> {
    let located = |p: &&Value| p.pointer("/meta/location").and_then(Value::as_str) == Some(location.key());
    participants.iter().find(located).or_else(|| {
        let any_located = participants.iter().any(|p| p.pointer("/meta/location").is_some());
        if any_located {
            return None;
        }
        match location {
            Location::Home => participants.first(),
            Location::Away => participants.get(1),
        }
    })
}

/// Goals for one side: the `CURRENT` score entry, else the last entry for
/// that side.
fn score(raw: &Value, participant: Option<&Value>, location: Location) -> Option<u32> {
    let participant_id = participant.and_then(|p| fields::integer_of(p, &["id"]));
    let for_side: Vec<&Value> = fields::list(raw, "scores")
        .iter()
        .filter(|s| {
            let side = s.pointer("/score/participant").and_then(Value::as_str);
            match side {
                Some(side) => side == location.key(),
                None => participant_id.is_some() && fields::integer_of(s, &["participant_id"]) == participant_id,
            }
        })
        .collect();

    let entry = for_side
        .iter()
        .find(|s| fields::text_of(s, &["description"]).as_deref() == Some("CURRENT"))
        .or_else(|| for_side.last())?;
    entry.get("score").and_then(|s| fields::count_of(s, &["goals"]))
}

fn state_token(raw: &Value) -> Option<String> {
    raw.get("state")
        .and_then(|s| fields::text_of(s, &["state", "developer_name", "short_name"]))
        .or_else(|| {
            let id = fields::integer_of(raw, &["state_id"])?;
            STATES.iter().find(|(sid, _)| *sid == id).map(|(_, t)| (*t).to_owned())
        })
}

fn ticking_minute(raw: &Value) -> Option<u32> {
    fields::list(raw, "periods")
        .iter()
        .find(|p| fields::flag_of(p, &["ticking"]) == Some(true))
        .and_then(|p| fields::count_of(p, &["minutes"]))
}
