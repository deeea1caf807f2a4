use betfeed_api::{MatchPhase, NormalizedMatch, ThreeWay};

/// `HH:MM  Home 1-0 Away  [67']  1.80 / 3.20 / 4.10`
pub fn match_line(m: &NormalizedMatch) -> String {
    let time = if m.time.is_empty() { "--:--" } else { m.time.as_str() };
    let score = m.score_line().unwrap_or_else(|| "vs".to_string());

    let mut line = format!("{time}  {} {score} {}", m.home_team, m.away_team);
    if let Some(status) = status_tag(m) {
        line.push_str(&format!("  [{status}]"));
    }
    if let Some(odds) = format_odds(&m.odds) {
        line.push_str(&format!("  {odds}"));
    }
    line
}

/// Header printed above each refresh.
pub fn feed_header(label: &str, count: usize, at: &str) -> String {
    format!("── {label} · {count} matches · {at} ──")
}

fn status_tag(m: &NormalizedMatch) -> Option<String> {
    match m.phase() {
        MatchPhase::NotStarted => None,
        MatchPhase::Halftime => Some("HT".to_string()),
        MatchPhase::Live => Some(
            m.minute
                .map(|minute| format!("{minute}'"))
                .unwrap_or_else(|| "LIVE".to_string()),
        ),
        MatchPhase::Finished => Some("FT".to_string()),
        MatchPhase::Postponed => Some("PPD".to_string()),
    }
}

fn format_odds(odds: &ThreeWay) -> Option<String> {
    if odds.is_empty() {
        return None;
    }
    let price = |p: Option<f64>| p.map(|p| format!("{p:.2}")).unwrap_or_else(|| "-".to_string());
    Some(format!("{} / {} / {}", price(odds.home), price(odds.draw), price(odds.away)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NormalizedMatch {
        NormalizedMatch {
            id: "1".into(),
            home_team: "Team A".into(),
            away_team: "Team B".into(),
            home_score: Some(1),
            away_score: Some(0),
            minute: Some(67),
            is_live: true,
            status: "2H".into(),
            date: "2024-05-01".into(),
            time: "21:00".into(),
            odds: ThreeWay { home: Some(1.8), draw: Some(3.2), away: Some(4.1) },
            ..NormalizedMatch::default()
        }
    }

    #[test]
    fn live_line() {
        assert_eq!(match_line(&sample()), "21:00  Team A 1-0 Team B  [67']  1.80 / 3.20 / 4.10");
    }

    #[test]
    fn not_started_without_odds() {
        let m = NormalizedMatch {
            home_score: None,
            away_score: None,
            minute: None,
            is_live: false,
            status: "NS".into(),
            time: String::new(),
            odds: ThreeWay::default(),
            ..sample()
        };
        assert_eq!(match_line(&m), "--:--  Team A vs Team B");
    }

    #[test]
    fn halftime_and_partial_odds() {
        let m = NormalizedMatch {
            status: "HT".into(),
            minute: Some(45),
            odds: ThreeWay { home: Some(2.0), draw: None, away: Some(3.5) },
            ..sample()
        };
        assert_eq!(match_line(&m), "21:00  Team A 1-0 Team B  [HT]  2.00 / - / 3.50");
    }

    #[test]
    fn finished_tag() {
        let m = NormalizedMatch { is_live: false, is_finished: true, minute: None, status: "FT".into(), ..sample() };
        assert!(match_line(&m).contains("[FT]"));
    }
}
