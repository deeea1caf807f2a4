pub mod client;
mod fields;
pub mod kickoff;
pub mod league;
pub mod normalize;
pub mod odds;
mod providers;
pub mod shape;
pub mod status;
pub mod translate;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use normalize::{NormalizedPayload, normalize, normalize_at, normalize_payload, normalize_payload_at};
pub use odds::ThreeWay;
pub use shape::ProviderShape;
pub use status::MatchPhase;

/// Substituted when the provider omits the home side's name.
pub const HOME_TEAM_FALLBACK: &str = "Home Team";
/// Substituted when the provider omits the away side's name.
pub const AWAY_TEAM_FALLBACK: &str = "Away Team";

// ---------------------------------------------------------------------------
// Domain types: one match record, independent of any provider wire format
// ---------------------------------------------------------------------------

/// The canonical match record every provider payload is normalized into.
///
/// Created fresh on every normalization call; it carries no identity beyond
/// the data it holds. Serialized with camelCase keys, which is also the shape
/// the backend branch of the dispatcher accepts back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMatch {
    pub id: String,
    pub league: String,
    pub league_flag: Option<String>, // emoji or logo URL
    pub sport_key: String,
    pub home_team: String,
    pub away_team: String,
    pub home_team_logo: Option<String>,
    pub away_team_logo: Option<String>,
    pub home_score: Option<u32>, // None = no score known yet
    pub away_score: Option<u32>,
    pub minute: Option<u32>,
    pub is_live: bool,
    pub is_finished: bool,
    pub is_postponed: bool,
    pub status: String,
    pub date: String, // YYYY-MM-DD, display timezone
    pub time: String, // HH:MM, display timezone
    pub odds: ThreeWay,
    pub markets: Vec<Market>,
    pub stats: Option<Value>,
    pub events: Vec<Value>,
    pub lineups: Vec<Value>,
}

impl Default for NormalizedMatch {
    fn default() -> Self {
        Self {
            id: String::new(),
            league: String::new(),
            league_flag: None,
            sport_key: String::new(),
            home_team: HOME_TEAM_FALLBACK.to_owned(),
            away_team: AWAY_TEAM_FALLBACK.to_owned(),
            home_team_logo: None,
            away_team_logo: None,
            home_score: None,
            away_score: None,
            minute: None,
            is_live: false,
            is_finished: false,
            is_postponed: false,
            status: String::new(),
            date: String::new(),
            time: String::new(),
            odds: ThreeWay::default(),
            markets: Vec::new(),
            stats: None,
            events: Vec::new(),
            lineups: Vec::new(),
        }
    }
}

impl NormalizedMatch {
    pub fn phase(&self) -> MatchPhase {
        if self.is_finished {
            MatchPhase::Finished
        } else if self.is_postponed {
            MatchPhase::Postponed
        } else if self.is_live && status::is_halftime_token(&self.status) {
            MatchPhase::Halftime
        } else if self.is_live {
            MatchPhase::Live
        } else {
            MatchPhase::NotStarted
        }
    }

    /// "2-1" once both scores are known.
    pub fn score_line(&self) -> Option<String> {
        let (home, away) = self.home_score.zip(self.away_score)?;
        Some(format!("{home}-{away}"))
    }

    /// The 1X2 market, which is always sorted first when present.
    pub fn primary_market(&self) -> Option<&Market> {
        self.markets.first().filter(|m| m.is_primary())
    }

    pub fn find_market(&self, name: &str) -> Option<&Market> {
        self.markets.iter().find(|m| m.name == name)
    }
}

/// A named betting proposition with its priced options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub name: String,
    pub options: Vec<MarketOption>,
}

impl Market {
    pub fn is_primary(&self) -> bool {
        self.name == translate::PRIMARY_MARKET
    }

    pub fn option(&self, label: &str) -> Option<f64> {
        self.options.iter().find(|o| o.label == label).map(|o| o.value)
    }
}

/// One priced choice within a market. `value` is always positive and finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketOption {
    pub label: String,
    pub value: f64,
}
