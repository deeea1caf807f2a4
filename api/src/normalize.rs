//! Entry points: one raw payload in, canonical match records out.

use crate::NormalizedMatch;
use crate::providers;
use crate::shape::ProviderShape;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Normalize one raw match payload from any supported provider.
///
/// Returns `None` only for JSON `null`. Anything else, however malformed,
/// yields a record with every field defaulted where it could not be read.
pub fn normalize(raw: &Value) -> Option<NormalizedMatch> {
    normalize_at(raw, Utc::now())
}

/// [`normalize`] against a fixed clock. Live detection and minute
/// estimation compare kickoff against `now`.
pub fn normalize_at(raw: &Value, now: DateTime<Utc>) -> Option<NormalizedMatch> {
    if raw.is_null() {
        return None;
    }
    let shape = ProviderShape::detect(raw);
    log::debug!("normalizing {} payload", shape.name());
    Some(providers::extract(shape, raw, now))
}

/// Output of [`normalize_payload`]: an object stays one record and an array
/// stays a list when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizedPayload {
    Single(Box<NormalizedMatch>),
    Batch(Vec<NormalizedMatch>),
}

impl NormalizedPayload {
    pub fn len(&self) -> usize {
        match self {
            NormalizedPayload::Single(_) => 1,
            NormalizedPayload::Batch(matches) => matches.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_vec(self) -> Vec<NormalizedMatch> {
        match self {
            NormalizedPayload::Single(m) => vec![*m],
            NormalizedPayload::Batch(matches) => matches,
        }
    }
}

/// Array-aware entry point: arrays are normalized element-wise (null
/// elements are dropped), anything else as a single match.
pub fn normalize_payload(raw: &Value) -> Option<NormalizedPayload> {
    normalize_payload_at(raw, Utc::now())
}

pub fn normalize_payload_at(raw: &Value, now: DateTime<Utc>) -> Option<NormalizedPayload> {
    match raw {
        Value::Array(items) => Some(NormalizedPayload::Batch(
            items.iter().filter_map(|item| normalize_at(item, now)).collect(),
        )),
        other => normalize_at(other, now).map(|m| NormalizedPayload::Single(Box::new(m))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odds::ThreeWay;
    use crate::translate::PRIMARY_MARKET;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 19, 0, 0).unwrap()
    }

    fn odds_api_event(outcomes: Value) -> Value {
        json!({
            "id": "abc123",
            "sport_key": "soccer_turkey_super_league",
            "sport_title": "Turkey Super League",
            "commence_time": "2024-05-01T18:00:00Z",
            "home_team": "Team A",
            "away_team": "Team B",
            "bookmakers": [
                {"key": "pinnacle", "markets": [
                    {"key": "h2h", "outcomes": outcomes},
                    {"key": "totals", "outcomes": [
                        {"name": "Over", "price": 1.85, "point": 2.5},
                        {"name": "Under", "price": 0, "point": 2.5}
                    ]},
                    {"key": "btts", "outcomes": [
                        {"name": "Yes", "price": "1.72"},
                        {"name": "No", "price": null}
                    ]}
                ]}
            ]
        })
    }

    fn fixtures() -> Vec<Value> {
        vec![
            odds_api_event(json!([
                {"name": "Team A", "price": 1.8}, {"name": "Draw", "price": 3.2}, {"name": "Team B", "price": 4.1}
            ])),
            json!({
                "id": 5, "sport_id": 1, "state_id": 2, "starting_at": "2024-05-01 21:30:00",
                "participants": [
                    {"name": "Kasımpaşa", "meta": {"location": "home"}},
                    {"name": "Galatasaray", "meta": {"location": "away"}}
                ],
                "periods": [{"ticking": true, "minutes": 32}],
                "odds": [
                    {"market_id": 1, "label": "Home", "value": "3.10"},
                    {"market_id": 1, "label": "Draw", "value": "-1"},
                    {"market_id": 2, "market_description": "Double Chance", "label": "Home/Draw", "value": "1.30"},
                    {"market_id": 8, "market_description": "Correct Score", "label": "1:0", "value": "7.00"},
                    {"market_id": 8, "market_description": "Correct Score", "label": "1:0", "value": "1.02"}
                ]
            }),
            json!({
                "main_id": "77", "status": "HT",
                "date": "01.05.2024", "time": "21:15",
                "league": "Eredivisie",
                "home": {"name": "Ajax", "goals": 1}, "away": {"name": "PSV", "goals": 1},
                "odds": [{"market": "Over/Under", "name": "Under", "total": "2.5", "odd": "1.55"}]
            }),
            json!({
                "id": "b-1", "home_team": "Fenerbahçe", "away_team": "Beşiktaş", "status": "NS",
                "league": "Süper Lig", "date": "2024-05-02", "time": "20:00",
                "markets": [{"name": "Maç Sonucu", "options": [
                    {"label": "1", "value": 2.1}, {"label": "X", "value": 3.3}, {"label": "2", "value": 3.2}
                ]}]
            }),
            json!({"unexpected": true}),
        ]
    }

    #[test]
    fn scenario_h2h_by_name() {
        let m = normalize_at(
            &odds_api_event(json!([
                {"name": "Team A", "price": 1.8}, {"name": "Draw", "price": 3.2}, {"name": "Team B", "price": 4.1}
            ])),
            now(),
        )
        .unwrap();
        let expected = ThreeWay { home: Some(1.8), draw: Some(3.2), away: Some(4.1) };
        assert_eq!(m.odds, expected);
        assert_eq!(m.markets[0].name, PRIMARY_MARKET);
        assert_eq!(m.league_flag.as_deref(), Some("🇹🇷"));
        assert_eq!((m.date.as_str(), m.time.as_str()), ("2024-05-01", "21:00"));
    }

    #[test]
    fn scenario_h2h_scrambled_order() {
        let ordered = normalize_at(
            &odds_api_event(json!([
                {"name": "Team A", "price": 1.8}, {"name": "Draw", "price": 3.2}, {"name": "Team B", "price": 4.1}
            ])),
            now(),
        )
        .unwrap();
        for outcomes in [
            json!([{"name": "Team B", "price": 4.1}, {"name": "Team A", "price": 1.8}, {"name": "Draw", "price": 3.2}]),
            json!([{"name": "Draw", "price": 3.2}, {"name": "Team B", "price": 4.1}, {"name": "Team A", "price": 1.8}]),
        ] {
            let scrambled = normalize_at(&odds_api_event(outcomes), now()).unwrap();
            assert_eq!(scrambled.odds, ordered.odds);
            assert_eq!(scrambled.markets, ordered.markets);
        }
    }

    #[test]
    fn scenario_statpal_halftime() {
        let raw = json!({"main_id": "1", "status": "HT", "home": {"name": "A"}, "away": {"name": "B"}});
        let m = normalize_at(&raw, now()).unwrap();
        assert!(m.is_live);
        assert_eq!(m.minute, Some(45));
        assert!(!m.is_finished);
        assert_eq!(m.phase(), crate::MatchPhase::Halftime);
    }

    #[test]
    fn scenario_statpal_full_time() {
        let raw = json!({
            "main_id": "1", "status": "FT",
            "home": {"name": "A"}, "away": {"name": "B"},
            "ft": {"home_goals": 2, "away_goals": 1}
        });
        let m = normalize_at(&raw, now()).unwrap();
        assert_eq!(m.score_line().as_deref(), Some("2-1"));
        assert!(m.is_finished);
        assert!(!m.is_live);
        assert_eq!(m.minute, None);
    }

    #[test]
    fn scenario_sportmonks_future_kickoff_is_not_live() {
        let kickoff = now() + Duration::minutes(10);
        let raw = json!({
            "id": 1, "sport_id": 1, "state_id": 2,
            "starting_at": "2024-05-01 22:10:00",
            "starting_at_timestamp": kickoff.timestamp(),
            "is_live": true,
            "periods": [{"ticking": true, "minutes": 3}]
        });
        let m = normalize_at(&raw, now()).unwrap();
        assert!(!m.is_live);
        assert_eq!(m.minute, None);
    }

    #[test]
    fn scenario_null_and_empty_array() {
        assert_eq!(normalize_at(&Value::Null, now()), None);
        assert_eq!(normalize_payload_at(&Value::Null, now()), None);
        let batch = normalize_payload_at(&json!([]), now()).unwrap();
        assert_eq!(batch, NormalizedPayload::Batch(vec![]));
        assert!(batch.is_empty());
    }

    #[test]
    fn batch_drops_null_elements_and_keeps_order() {
        let raw = json!([null, {"main_id": "1", "home": {"name": "A"}}, null, {"main_id": "2", "home": {"name": "C"}}]);
        let ids: Vec<String> = normalize_payload_at(&raw, now())
            .unwrap()
            .into_vec()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn payload_serializes_untagged() {
        let single = normalize_payload_at(&json!({"main_id": "1"}), now()).unwrap();
        assert!(serde_json::to_value(&single).unwrap().is_object());
        let batch = normalize_payload_at(&json!([{"main_id": "1"}]), now()).unwrap();
        assert!(serde_json::to_value(&batch).unwrap().is_array());
    }

    #[test]
    fn non_object_input_falls_back_to_defaults() {
        for raw in [json!(42), json!("text"), json!(true)] {
            let m = normalize_at(&raw, now()).unwrap();
            assert_eq!(m.id, "");
            assert_eq!(m.home_team, crate::HOME_TEAM_FALLBACK);
            assert_eq!(m.away_team, crate::AWAY_TEAM_FALLBACK);
            assert!(m.markets.is_empty());
        }
    }

    #[test]
    fn every_option_value_is_positive_and_finite() {
        for raw in fixtures() {
            let m = normalize_at(&raw, now()).unwrap();
            for market in &m.markets {
                assert!(!market.options.is_empty(), "empty market {}", market.name);
                for option in &market.options {
                    assert!(option.value.is_finite() && option.value > 0.0, "{}: {:?}", market.name, option);
                }
            }
            for price in [m.odds.home, m.odds.draw, m.odds.away].into_iter().flatten() {
                assert!(price.is_finite() && price > 0.0);
            }
        }
    }

    #[test]
    fn correct_score_keeps_lower_plausible_value() {
        let m = normalize_at(&fixtures()[1], now()).unwrap();
        let market = m.find_market(crate::translate::CORRECT_SCORE_MARKET).unwrap();
        assert_eq!(market.option("1:0"), Some(7.0));
    }

    #[test]
    fn date_and_time_are_well_formed() {
        let date_ok = |s: &str| s.len() == 10 && s.chars().enumerate().all(|(i, c)| if i == 4 || i == 7 { c == '-' } else { c.is_ascii_digit() });
        let time_ok = |s: &str| s.len() == 5 && s.chars().enumerate().all(|(i, c)| if i == 2 { c == ':' } else { c.is_ascii_digit() });
        for raw in fixtures() {
            let m = normalize_at(&raw, now()).unwrap();
            assert!(m.date.is_empty() || date_ok(&m.date), "bad date {}", m.date);
            assert!(m.time.is_empty() || time_ok(&m.time), "bad time {}", m.time);
            assert_eq!(m.date.is_empty(), m.time.is_empty());
        }
    }

    #[test]
    fn flags_are_mutually_exclusive() {
        for raw in fixtures() {
            let m = normalize_at(&raw, now()).unwrap();
            let set = [m.is_live, m.is_finished, m.is_postponed].iter().filter(|f| **f).count();
            assert!(set <= 1, "{}: {set} flags set", m.id);
            if !m.is_live {
                assert_eq!(m.minute, None);
            }
        }
    }

    #[test]
    fn renormalizing_output_is_stable() {
        for raw in fixtures() {
            let first = normalize_at(&raw, now()).unwrap();
            let serialized = serde_json::to_value(&first).unwrap();
            assert_eq!(ProviderShape::detect(&serialized), ProviderShape::Backend);
            let second = normalize_at(&serialized, now()).unwrap();
            assert_eq!(second, first);
        }
    }

    #[test]
    fn sub_minute_kickoff_survives_renormalization() {
        // 2m30s ahead of `now`; output only keeps 22:02 local.
        let raw = json!({
            "id": "b-8", "home_team": "A", "away_team": "B",
            "status": "1H", "commence_time": "2024-05-01T19:02:30Z"
        });
        let first = normalize_at(&raw, now()).unwrap();
        assert_eq!((first.date.as_str(), first.time.as_str()), ("2024-05-01", "22:02"));
        let second = normalize_at(&serde_json::to_value(&first).unwrap(), now()).unwrap();
        assert_eq!(second, first);
        assert_eq!(first.is_live, second.is_live);
    }

    #[test]
    fn timestamp_in_date_field_is_kept() {
        let raw = json!({
            "id": "b-9", "home_team": "A", "away_team": "B", "status": "NS",
            "date": "2024-05-02T17:00:00Z", "time": "20:00"
        });
        let m = normalize_at(&raw, now()).unwrap();
        assert_eq!((m.date.as_str(), m.time.as_str()), ("2024-05-02", "20:00"));
        assert!(!m.is_live);
    }

    #[test]
    fn sportmonks_local_kickoff_and_live_minute() {
        let m = normalize_at(&fixtures()[1], now()).unwrap();
        // 21:30 local is 18:30 UTC, half an hour before `now`.
        assert_eq!((m.date.as_str(), m.time.as_str()), ("2024-05-01", "21:30"));
        assert!(m.is_live);
        assert_eq!(m.minute, Some(32));
        assert_eq!(m.odds, ThreeWay { home: Some(3.1), draw: None, away: None });
        assert_eq!(m.home_team, "Kasımpaşa");
    }
}
