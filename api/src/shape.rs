//! Which provider a raw payload came from.
//!
//! Payloads carry no provider tag, so the shape of the object decides. The
//! predicates are tried in [`ProviderShape::ORDER`]; the first one that
//! matches wins and The Odds API shape catches everything else.

use crate::fields;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderShape {
    /// Records already normalized by our backend, or by this crate.
    Backend,
    /// Sportmonks V3 fixtures.
    Sportmonks,
    StatPal,
    /// The Odds API events. The fallback.
    OddsApi,
}

impl ProviderShape {
    pub const ORDER: [ProviderShape; 4] = [
        ProviderShape::Backend,
        ProviderShape::Sportmonks,
        ProviderShape::StatPal,
        ProviderShape::OddsApi,
    ];

    pub fn detect(raw: &Value) -> ProviderShape {
        Self::ORDER
            .into_iter()
            .find(|shape| shape.matches(raw))
            .unwrap_or(ProviderShape::OddsApi)
    }

    pub fn matches(self, raw: &Value) -> bool {
        match self {
            ProviderShape::Backend => is_backend(raw),
            ProviderShape::Sportmonks => is_sportmonks(raw),
            ProviderShape::StatPal => is_statpal(raw),
            ProviderShape::OddsApi => true,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ProviderShape::Backend => "backend",
            ProviderShape::Sportmonks => "sportmonks",
            ProviderShape::StatPal => "statpal",
            ProviderShape::OddsApi => "the-odds-api",
        }
    }
}

fn is_backend(raw: &Value) -> bool {
    let snake = fields::has(raw, "home_team") && fields::has(raw, "away_team");
    let camel = fields::has(raw, "homeTeam") && fields::has(raw, "awayTeam");
    (snake || camel) && fields::has(raw, "status") && !fields::has(raw, "bookmakers")
}

fn is_sportmonks(raw: &Value) -> bool {
    let numeric = |key: &str| raw.get(key).is_some_and(Value::is_number);
    numeric("sport_id") && numeric("state_id") && fields::has(raw, "starting_at")
}

fn is_statpal(raw: &Value) -> bool {
    fields::has(raw, "main_id") || raw.get("home").is_some_and(|home| fields::has(home, "name"))
}
