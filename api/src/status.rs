//! Live / finished / postponed inference.
//!
//! Providers signal match state in very different ways: explicit booleans,
//! named tokens, bare minute numbers used as a status, or nothing at all.
//! [`infer`] folds whatever is available into one consistent [`MatchState`]
//! through a layered override chain; later layers win over earlier ones.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Minute reported for a match at half time.
pub const HALFTIME_MINUTE: u32 = 45;
/// Upper bound for any minute we emit.
pub const MAX_MINUTE: u32 = 120;
/// A kickoff further than this in the future can never be live.
pub const KICKOFF_GRACE_MINUTES: i64 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    #[default]
    NotStarted,
    Live,
    Halftime, // live, minute pinned to 45
    Finished,
    Postponed,
}

impl MatchPhase {
    pub fn is_live(self) -> bool {
        matches!(self, MatchPhase::Live | MatchPhase::Halftime)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, MatchPhase::Finished | MatchPhase::Postponed)
    }

    /// Status token used when the provider sent none.
    pub fn token(self) -> &'static str {
        match self {
            MatchPhase::NotStarted => "NS",
            MatchPhase::Live => "LIVE",
            MatchPhase::Halftime => "HT",
            MatchPhase::Finished => "FT",
            MatchPhase::Postponed => "POSTPONED",
        }
    }
}

/// Every state signal a provider may carry. All fields are optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusSignals<'a> {
    pub token: Option<&'a str>,
    pub completed: Option<bool>,
    pub is_live: Option<bool>,
    /// A non-empty scores array was present (The Odds API convention).
    pub has_scores: bool,
    /// A minute the provider states outright.
    pub minute: Option<u32>,
    pub kickoff: Option<DateTime<Utc>>,
    pub last_update: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchState {
    pub phase: MatchPhase,
    pub minute: Option<u32>, // only ever set while live
}

impl MatchState {
    pub fn is_live(&self) -> bool {
        self.phase.is_live()
    }

    pub fn is_finished(&self) -> bool {
        self.phase == MatchPhase::Finished
    }

    pub fn is_postponed(&self) -> bool {
        self.phase == MatchPhase::Postponed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Finished,
    Postponed,
    Halftime,
    Live,
    Minute(u32),
    Other,
}

/// Classify a raw status token. Case, surrounding whitespace, a trailing dot
/// ("Postp.") and space/dash separators are ignored.
pub fn classify(raw: &str) -> Token {
    let token = raw
        .trim()
        .trim_end_matches('.')
        .to_ascii_uppercase()
        .replace([' ', '-'], "_");

    match token.as_str() {
        "FT" | "FINISHED" | "CANCELLED" | "CANCELED" | "CANC" | "AET" | "FT_PEN" | "PEN" | "AWARDED" => {
            Token::Finished
        }
        "POSTPONED" | "POSTP" => Token::Postponed,
        "HT" | "HALFTIME" | "HALF_TIME" => Token::Halftime,
        "LIVE" | "1H" | "2H" | "INPLAY" | "IN_PLAY" | "ET" | "BREAK" => Token::Live,
        t if t.starts_with("INPLAY_") || t.ends_with("_BREAK") => Token::Live,
        t if !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()) => match t.parse::<u32>() {
            Ok(m) if (1..=MAX_MINUTE).contains(&m) => Token::Minute(m),
            _ => Token::Other,
        },
        _ => Token::Other,
    }
}

pub fn is_halftime_token(raw: &str) -> bool {
    classify(raw) == Token::Halftime
}

/// Fold the signals into one state. Evaluation order:
///
/// 1. finished tokens or `completed = true`
/// 2. postponed tokens
/// 3. scores present while not completed, or `is_live = true`: tentatively
///    live, minute estimated from kickoff
/// 4. named live tokens (`HT` pins the minute to 45)
/// 5. bare numeric tokens in 1..=120 are the minute
/// 6. kickoff more than two minutes ahead: never live
///
/// Terminal states are never left once entered; the upstream `is_live` flag
/// cannot revive a finished match.
pub fn infer(signals: &StatusSignals<'_>, now: DateTime<Utc>) -> MatchState {
    let token = signals.token.map(classify).unwrap_or(Token::Other);
    let explicit_minute = signals.minute.filter(|m| (1..=MAX_MINUTE).contains(m));

    let mut phase = if token == Token::Finished || signals.completed == Some(true) {
        MatchPhase::Finished
    } else if token == Token::Postponed {
        MatchPhase::Postponed
    } else {
        MatchPhase::NotStarted
    };
    let mut minute = None;

    if !phase.is_terminal() {
        let scores_say_live = signals.has_scores && signals.completed != Some(true);
        if scores_say_live || signals.is_live == Some(true) {
            phase = MatchPhase::Live;
        }

        match token {
            Token::Halftime => {
                phase = MatchPhase::Halftime;
                minute = Some(HALFTIME_MINUTE);
            }
            Token::Live => phase = MatchPhase::Live,
            Token::Minute(m) => {
                phase = MatchPhase::Live;
                minute = Some(m);
            }
            _ => {}
        }

        if phase == MatchPhase::Live && minute.is_none() {
            let reference = signals.last_update.unwrap_or(now);
            minute = explicit_minute.or_else(|| signals.kickoff.and_then(|k| estimate_minute(k, reference)));
        }
    }

    let kickoff_ahead = signals
        .kickoff
        .is_some_and(|k| k - now > Duration::minutes(KICKOFF_GRACE_MINUTES));
    if phase.is_live() && kickoff_ahead {
        log::debug!("ignoring live signal: kickoff is still in the future");
        phase = MatchPhase::NotStarted;
    }

    if !phase.is_live() {
        minute = None;
    }

    MatchState { phase, minute }
}

/// Elapsed whole minutes between kickoff and `reference`, clamped to 1..=120.
/// `None` when the reference is before kickoff.
pub fn estimate_minute(kickoff: DateTime<Utc>, reference: DateTime<Utc>) -> Option<u32> {
    let elapsed = (reference - kickoff).num_minutes();
    if elapsed < 0 {
        return None;
    }
    Some(u32::try_from(elapsed).unwrap_or(MAX_MINUTE).clamp(1, MAX_MINUTE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 19, 0, 0).unwrap()
    }

    fn signals<'a>() -> StatusSignals<'a> {
        StatusSignals::default()
    }

    #[test]
    fn classify_tokens() {
        assert_eq!(classify("FT"), Token::Finished);
        assert_eq!(classify(" finished "), Token::Finished);
        assert_eq!(classify("Canceled"), Token::Finished);
        assert_eq!(classify("Postp."), Token::Postponed);
        assert_eq!(classify("POSTPONED"), Token::Postponed);
        assert_eq!(classify("HT"), Token::Halftime);
        assert_eq!(classify("in play"), Token::Live);
        assert_eq!(classify("INPLAY_2ND_HALF"), Token::Live);
        assert_eq!(classify("EXTRA_TIME_BREAK"), Token::Live);
        assert_eq!(classify("67"), Token::Minute(67));
        assert_eq!(classify("0"), Token::Other);
        assert_eq!(classify("121"), Token::Other);
        assert_eq!(classify("18:00"), Token::Other);
        assert_eq!(classify("NS"), Token::Other);
    }

    #[test]
    fn no_signals_is_not_started() {
        let state = infer(&signals(), now());
        assert_eq!(state, MatchState { phase: MatchPhase::NotStarted, minute: None });
    }

    #[test]
    fn finished_token_beats_live_flag() {
        let s = StatusSignals { token: Some("FT"), is_live: Some(true), ..signals() };
        let state = infer(&s, now());
        assert!(state.is_finished());
        assert!(!state.is_live());
        assert_eq!(state.minute, None);
    }

    #[test]
    fn postponed_is_distinct_from_finished() {
        let s = StatusSignals { token: Some("POSTPONED"), is_live: Some(true), ..signals() };
        let state = infer(&s, now());
        assert!(state.is_postponed());
        assert!(!state.is_finished());
        assert!(!state.is_live());
    }

    #[test]
    fn completed_flag_finishes() {
        let s = StatusSignals { completed: Some(true), has_scores: true, ..signals() };
        assert!(infer(&s, now()).is_finished());
    }

    #[test]
    fn scores_while_not_completed_estimate_minute_from_last_update() {
        let kickoff = Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap();
        let last_update = Utc.with_ymd_and_hms(2024, 5, 1, 18, 37, 30).unwrap();
        let s = StatusSignals {
            completed: Some(false),
            has_scores: true,
            kickoff: Some(kickoff),
            last_update: Some(last_update),
            ..signals()
        };
        let state = infer(&s, now());
        assert_eq!(state.phase, MatchPhase::Live);
        assert_eq!(state.minute, Some(37));
    }

    #[test]
    fn estimated_minute_is_clamped() {
        let kickoff = Utc.with_ymd_and_hms(2024, 5, 1, 14, 0, 0).unwrap();
        assert_eq!(estimate_minute(kickoff, now()), Some(MAX_MINUTE));
        assert_eq!(estimate_minute(now(), now()), Some(1));
        assert_eq!(estimate_minute(now(), kickoff), None);
    }

    #[test]
    fn ancient_kickoff_still_clamps() {
        // More minutes than fit in a u32.
        let kickoff = Utc.with_ymd_and_hms(-9000, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(estimate_minute(kickoff, now()), Some(MAX_MINUTE));
    }

    #[test]
    fn halftime_pins_minute() {
        let s = StatusSignals { token: Some("HT"), minute: Some(47), ..signals() };
        let state = infer(&s, now());
        assert_eq!(state.phase, MatchPhase::Halftime);
        assert!(state.is_live());
        assert_eq!(state.minute, Some(HALFTIME_MINUTE));
    }

    #[test]
    fn numeric_token_is_the_minute() {
        let s = StatusSignals { token: Some("67"), ..signals() };
        assert_eq!(infer(&s, now()), MatchState { phase: MatchPhase::Live, minute: Some(67) });
    }

    #[test]
    fn named_live_token_prefers_explicit_minute() {
        let s = StatusSignals { token: Some("2H"), minute: Some(71), ..signals() };
        assert_eq!(infer(&s, now()).minute, Some(71));
    }

    #[test]
    fn live_flag_forces_live() {
        let s = StatusSignals { token: Some("NS"), is_live: Some(true), ..signals() };
        assert!(infer(&s, now()).is_live());
    }

    #[test]
    fn missing_status_with_live_flag_stays_live() {
        let kickoff = Utc.with_ymd_and_hms(2024, 5, 1, 16, 0, 0).unwrap();
        let s = StatusSignals { is_live: Some(true), kickoff: Some(kickoff), ..signals() };
        let state = infer(&s, now());
        assert!(state.is_live());
        assert_eq!(state.minute, Some(MAX_MINUTE));
    }

    #[test]
    fn future_kickoff_is_never_live() {
        let kickoff = now() + Duration::minutes(10);
        for token in ["LIVE", "HT", "67", "1H"] {
            let s = StatusSignals {
                token: Some(token),
                is_live: Some(true),
                has_scores: true,
                kickoff: Some(kickoff),
                ..signals()
            };
            let state = infer(&s, now());
            assert!(!state.is_live(), "token {token} must not be live before kickoff");
            assert_eq!(state.minute, None);
        }
    }

    #[test]
    fn kickoff_within_grace_window_can_be_live() {
        let kickoff = now() + Duration::minutes(1);
        let s = StatusSignals { token: Some("LIVE"), kickoff: Some(kickoff), ..signals() };
        let state = infer(&s, now());
        assert!(state.is_live());
        assert_eq!(state.minute, None);
    }

    #[test]
    fn phase_tokens() {
        assert_eq!(MatchPhase::Finished.token(), "FT");
        assert_eq!(MatchPhase::NotStarted.token(), "NS");
        assert_eq!(classify(MatchPhase::Postponed.token()), Token::Postponed);
        assert_eq!(classify(MatchPhase::Halftime.token()), Token::Halftime);
        assert_eq!(classify(MatchPhase::Live.token()), Token::Live);
    }
}
