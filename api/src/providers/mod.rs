//! Per-provider field extraction.
//!
//! Each extractor reads its provider's fields into a [`Draft`]. Everything
//! that is the same for every provider (status inference, display time,
//! flag lookup, market ordering, fallbacks) happens once in [`Draft::finish`].

mod backend;
mod odds_api;
mod sportmonks;
mod statpal;

use crate::kickoff;
use crate::league;
use crate::odds::{MarketBook, ThreeWay};
use crate::shape::ProviderShape;
use crate::status::{self, StatusSignals};
use crate::{AWAY_TEAM_FALLBACK, HOME_TEAM_FALLBACK, NormalizedMatch};
use chrono::{DateTime, Utc};
use serde_json::Value;

pub(crate) fn extract(shape: ProviderShape, raw: &Value, now: DateTime<Utc>) -> NormalizedMatch {
    let draft = match shape {
        ProviderShape::Backend => backend::extract(raw),
        ProviderShape::Sportmonks => sportmonks::extract(raw),
        ProviderShape::StatPal => statpal::extract(raw),
        ProviderShape::OddsApi => odds_api::extract(raw),
    };
    log::trace!("{} payload -> match {:?}", shape.name(), draft.id);
    draft.finish(now)
}

/// Provider fields before the shared rules are applied. Everything is
/// optional; [`Draft::finish`] supplies the defaults.
#[derive(Debug, Default)]
pub(crate) struct Draft {
    pub id: Option<String>,
    pub league: Option<String>,
    /// Logo URL or flag the provider supplied for the league.
    pub league_flag: Option<String>,
    pub country: Option<String>,
    pub sport_key: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_team_logo: Option<String>,
    pub away_team_logo: Option<String>,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub status: Option<String>,
    pub completed: Option<bool>,
    pub is_live: Option<bool>,
    pub has_scores: bool,
    pub minute: Option<u32>,
    pub kickoff: Option<DateTime<Utc>>,
    pub last_update: Option<DateTime<Utc>>,
    pub odds: Option<ThreeWay>,
    pub book: MarketBook,
    pub stats: Option<Value>,
    pub events: Vec<Value>,
    pub lineups: Vec<Value>,
}

impl Draft {
    /// Team names as the odds resolver should see them; empty when unknown
    /// so that nothing is matched against the display fallbacks.
    pub fn teams(&self) -> (&str, &str) {
        (
            self.home_team.as_deref().unwrap_or_default(),
            self.away_team.as_deref().unwrap_or_default(),
        )
    }

    pub fn finish(mut self, now: DateTime<Utc>) -> NormalizedMatch {
        self.kickoff = self.kickoff.map(kickoff::truncate_to_minute);
        let signals = StatusSignals {
            token: self.status.as_deref(),
            completed: self.completed,
            is_live: self.is_live,
            has_scores: self.has_scores,
            minute: self.minute,
            kickoff: self.kickoff,
            last_update: self.last_update,
        };
        let state = status::infer(&signals, now);

        let status = self
            .status
            .clone()
            .unwrap_or_else(|| state.phase.token().to_owned());
        let (date, time) = self.kickoff.map(kickoff::display_parts).unwrap_or_default();

        let league = self.league.unwrap_or_default();
        let sport_key = self.sport_key.unwrap_or_default();
        let flag = league::resolve_flag(
            self.league_flag.as_deref(),
            &[league.as_str(), sport_key.as_str(), self.country.as_deref().unwrap_or_default()],
        );

        NormalizedMatch {
            id: self.id.unwrap_or_default(),
            league,
            league_flag: Some(flag),
            sport_key,
            home_team: self.home_team.unwrap_or_else(|| HOME_TEAM_FALLBACK.to_owned()),
            away_team: self.away_team.unwrap_or_else(|| AWAY_TEAM_FALLBACK.to_owned()),
            home_team_logo: self.home_team_logo,
            away_team_logo: self.away_team_logo,
            home_score: self.home_score,
            away_score: self.away_score,
            minute: state.minute,
            is_live: state.is_live(),
            is_finished: state.is_finished(),
            is_postponed: state.is_postponed(),
            status,
            date,
            time,
            odds: self.odds.unwrap_or_default(),
            markets: self.book.into_markets(self.odds),
            stats: self.stats,
            events: self.events,
            lineups: self.lineups,
        }
    }
}
