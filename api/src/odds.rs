//! Odds and market extraction.
//!
//! The hard part is the 1X2 market: providers label its outcomes with team
//! names (spelled their own way), with "Home"/"Draw"/"Away", with "1"/"X"/"2",
//! or not at all. [`resolve_three_way`] attributes prices by name first and
//! by position only as a last resort. Every other market is collected into a
//! [`MarketBook`], which translates names, merges duplicates and sorts.

use crate::fields;
use crate::translate::{self, PRIMARY_MARKET};
use crate::{Market, MarketOption};
use log::trace;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sportmonks' id for the full-time 1X2 market.
pub const PRIMARY_MARKET_ID: i64 = 1;

/// Correct-score odds below this are treated as provider noise.
pub const CORRECT_SCORE_NOISE_FLOOR: f64 = 1.5;

/// Legacy convenience copy of the 1X2 market.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreeWay {
    pub home: Option<f64>,
    pub draw: Option<f64>,
    pub away: Option<f64>,
}

impl ThreeWay {
    pub fn is_empty(&self) -> bool {
        self.home.is_none() && self.draw.is_none() && self.away.is_none()
    }

    /// The 1X2 market with options in home, draw, away order.
    pub fn to_market(&self) -> Option<Market> {
        let options: Vec<MarketOption> = [
            (Side::Home, self.home),
            (Side::Draw, self.draw),
            (Side::Away, self.away),
        ]
        .into_iter()
        .filter_map(|(side, value)| {
            value.map(|value| MarketOption { label: side.label().to_owned(), value })
        })
        .collect();
        (!options.is_empty()).then(|| Market { name: PRIMARY_MARKET.to_owned(), options })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Draw,
    Away,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Home => "1",
            Side::Draw => "X",
            Side::Away => "2",
        }
    }
}

/// One priced outcome as the provider named it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote<'a> {
    pub name: &'a str,
    pub price: Option<f64>,
}

/// Only strictly positive finite prices are odds.
pub fn valid_price(price: Option<f64>) -> Option<f64> {
    price.filter(|p| p.is_finite() && *p > 0.0)
}

pub fn price_of(v: &Value) -> Option<f64> {
    valid_price(fields::number(v))
}

fn is_draw(name: &str) -> bool {
    let name = name.trim();
    name == "X" || name.to_lowercase().contains("draw")
}

fn shorthand(name: &str) -> Option<Side> {
    match name.trim().to_ascii_lowercase().as_str() {
        "home" | "1" => Some(Side::Home),
        "away" | "2" => Some(Side::Away),
        _ => None,
    }
}

fn contains_either_way(a: &str, b: &str) -> bool {
    let (a, b) = (a.trim().to_lowercase(), b.trim().to_lowercase());
    !a.is_empty() && !b.is_empty() && (a.contains(&b) || b.contains(&a))
}

/// Attribute each outcome name to a side of the match.
///
/// Draw signals go first, then shorthand labels and exact (case-insensitive)
/// team names, then substring containment in either direction. Each side
/// takes only the first outcome that matches it. Returns `None` per outcome
/// that could not be attributed by name.
pub fn name_sides(names: &[&str], home_team: &str, away_team: &str) -> Vec<Option<Side>> {
    let mut sides: Vec<Option<Side>> = vec![None; names.len()];

    for (idx, name) in names.iter().enumerate() {
        if is_draw(name) {
            take(&mut sides, idx, Side::Draw);
        }
    }

    for (idx, name) in names.iter().enumerate() {
        let side = shorthand(name).or_else(|| {
            let name = name.trim();
            if !home_team.is_empty() && name.eq_ignore_ascii_case(home_team.trim()) {
                Some(Side::Home)
            } else if !away_team.is_empty() && name.eq_ignore_ascii_case(away_team.trim()) {
                Some(Side::Away)
            } else {
                None
            }
        });
        if let Some(side) = side {
            take(&mut sides, idx, side);
        }
    }

    for (idx, name) in names.iter().enumerate() {
        if contains_either_way(name, home_team) {
            take(&mut sides, idx, Side::Home);
        }
        if contains_either_way(name, away_team) {
            take(&mut sides, idx, Side::Away);
        }
    }

    sides
}

/// Give `idx` to `side` unless either is already taken.
fn take(sides: &mut [Option<Side>], idx: usize, side: Side) {
    if sides[idx].is_none() && !sides.contains(&Some(side)) {
        sides[idx] = Some(side);
    }
}

/// [`name_sides`] plus the positional fallback for two- and three-way
/// markets: with two outcomes the first is home and the second away; with
/// three the draw is removed first, one more case-sensitive exact-name pass
/// is attempted, then the remaining two go home/away in order.
pub fn assign_sides(names: &[&str], home_team: &str, away_team: &str) -> Vec<Option<Side>> {
    let mut sides = name_sides(names, home_team, away_team);
    let has = |sides: &[Option<Side>], side: Side| sides.contains(&Some(side));

    if has(&sides, Side::Home) && has(&sides, Side::Away) {
        return sides;
    }

    match names.len() {
        2 => {}
        3 => {
            if !has(&sides, Side::Draw) {
                // Three unlabelled outcomes: the middle one is the draw.
                if sides[1].is_none() {
                    sides[1] = Some(Side::Draw);
                }
            }
            for (idx, name) in names.iter().enumerate() {
                if sides[idx].is_some() {
                    continue;
                }
                if *name == home_team && !has(&sides, Side::Home) {
                    sides[idx] = Some(Side::Home);
                } else if *name == away_team && !has(&sides, Side::Away) {
                    sides[idx] = Some(Side::Away);
                }
            }
        }
        _ => return sides,
    }

    for idx in 0..names.len() {
        if sides[idx].is_some() {
            continue;
        }
        if !has(&sides, Side::Home) {
            sides[idx] = Some(Side::Home);
        } else if !has(&sides, Side::Away) {
            sides[idx] = Some(Side::Away);
        }
    }
    sides
}

/// Resolve a 1X2 market from one bookmaker's outcomes. `None` when no side
/// ends up with a usable price, so the caller can try the next bookmaker.
pub fn resolve_three_way(quotes: &[Quote<'_>], home_team: &str, away_team: &str) -> Option<ThreeWay> {
    let names: Vec<&str> = quotes.iter().map(|q| q.name).collect();
    let sides = assign_sides(&names, home_team, away_team);

    let mut odds = ThreeWay::default();
    for (quote, side) in quotes.iter().zip(sides) {
        let slot = match side {
            Some(Side::Home) => &mut odds.home,
            Some(Side::Draw) => &mut odds.draw,
            Some(Side::Away) => &mut odds.away,
            None => continue,
        };
        if slot.is_none() {
            *slot = valid_price(quote.price);
        }
    }

    (!odds.is_empty()).then_some(odds)
}

/// Side labels for a market whose outcomes are named after the teams
/// (spreads, draw-no-bet). `None` unless at least one outcome matched a team
/// by name, in which case the rest are filled in positionally.
pub fn team_labels(names: &[&str], home_team: &str, away_team: &str) -> Option<Vec<Option<&'static str>>> {
    let matched_by_name = name_sides(names, home_team, away_team)
        .iter()
        .zip(names)
        .any(|(side, name)| matches!(side, Some(Side::Home | Side::Away)) && shorthand(name).is_none());
    if !matched_by_name {
        return None;
    }
    Some(
        assign_sides(names, home_team, away_team)
            .into_iter()
            .map(|side| side.map(Side::label))
            .collect(),
    )
}

/// Render a line/handicap value the way bettors read it: "2.5", "-1", "+0.5".
pub fn format_point(point: f64, signed: bool) -> String {
    if signed && point > 0.0 {
        format!("+{point}")
    } else {
        format!("{point}")
    }
}

// ---------------------------------------------------------------------------
// Market book
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct BookEntry {
    key: String,
    name: String,
    correct_score: bool,
    options: Vec<MarketOption>,
}

/// Accumulates every non-primary market across bookmakers.
///
/// Markets are grouped by provider market id when one is given, else by
/// display name. Within a market a repeated label keeps one value: the lower
/// one for correct-score markets (ignoring values under 1.5), the higher one
/// everywhere else.
#[derive(Debug, Default)]
pub struct MarketBook {
    entries: Vec<BookEntry>,
}

impl MarketBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one priced option. Names are raw provider names; they are
    /// translated here. Invalid prices are dropped.
    pub fn add(&mut self, market_id: Option<&str>, market: &str, label: &str, price: Option<f64>) {
        let Some(value) = valid_price(price) else {
            trace!("dropping unusable price {price:?} for {market} / {label}");
            return;
        };

        let name = translate::market_name(market);
        let key = match market_id {
            Some(id) => format!("id:{id}"),
            None => format!("name:{name}"),
        };

        let idx = match self.entries.iter().position(|e| e.key == key) {
            Some(idx) => idx,
            None => {
                self.entries.push(BookEntry {
                    key,
                    correct_score: translate::is_correct_score(&name),
                    name,
                    options: Vec::new(),
                });
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[idx];

        let label = translate::outcome_label(&entry.name, label);
        if label.is_empty() {
            return;
        }
        match entry.options.iter_mut().find(|o| o.label == label) {
            Some(existing) => {
                existing.value = if entry.correct_score {
                    pick_correct_score(existing.value, value)
                } else {
                    existing.value.max(value)
                };
            }
            None => entry.options.push(MarketOption { label, value }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finish the book. The primary 1X2 market, when given, replaces any
    /// collected market of the same name and goes first; the rest are sorted
    /// by name in Turkish alphabetical order.
    pub fn into_markets(self, primary: Option<ThreeWay>) -> Vec<Market> {
        let primary = primary.and_then(|p| p.to_market());
        let mut rest: Vec<Market> = self
            .entries
            .into_iter()
            .filter(|e| !e.options.is_empty())
            .filter(|e| primary.is_none() || e.name != PRIMARY_MARKET)
            .map(|e| Market { name: e.name, options: e.options })
            .collect();
        rest.sort_by_cached_key(|m| (m.name != PRIMARY_MARKET, translate::collation_key(&m.name)));

        let mut markets = Vec::with_capacity(rest.len() + 1);
        markets.extend(primary);
        markets.extend(rest);
        markets
    }
}

fn pick_correct_score(existing: f64, candidate: f64) -> f64 {
    let plausible = |v: f64| v >= CORRECT_SCORE_NOISE_FLOOR;
    match (plausible(existing), plausible(candidate)) {
        (true, true) => existing.min(candidate),
        (true, false) => existing,
        (false, true) => candidate,
        (false, false) => existing.max(candidate),
    }
}

// ---------------------------------------------------------------------------
// Flat odds lists (Sportmonks, StatPal, backend)
// ---------------------------------------------------------------------------

/// A flat odds entry: one priced outcome tagged with its market.
struct FlatOdd<'a> {
    market_id: Option<String>,
    market: String,
    label: String,
    price: Option<f64>,
    bookmaker: Option<String>,
    raw: &'a Value,
}

impl<'a> FlatOdd<'a> {
    fn read(raw: &'a Value) -> Self {
        let market_id = fields::text_of(raw, &["market_id"]);
        let market = fields::text_of(raw, &["market_description", "market_name"])
            .or_else(|| fields::name_of(raw, &["market"]))
            .or_else(|| market_id.as_ref().map(|id| format!("Market {id}")))
            .unwrap_or_default();
        let label = fields::text_of(raw, &["label", "name", "outcome"]).unwrap_or_default();
        let price = fields::first(raw, &["value", "dp3", "odd", "odds", "price"]).and_then(fields::number);
        let bookmaker = fields::text_of(raw, &["bookmaker_id", "bookmaker"]);
        Self { market_id, market, label, price, bookmaker, raw }
    }

    fn is_primary(&self) -> bool {
        let by_id = self
            .market_id
            .as_deref()
            .and_then(|id| id.parse::<i64>().ok())
            .is_some_and(|id| id == PRIMARY_MARKET_ID);
        by_id || translate::is_primary(&self.market)
    }

    /// Label with the line appended: "Over" + total 2.5 → "Over 2.5".
    fn full_label(&self) -> String {
        if let Some(total) = fields::number_of(self.raw, &["total", "point"]) {
            format!("{} {}", self.label, format_point(total, false))
        } else if let Some(handicap) = fields::number_of(self.raw, &["handicap"]) {
            format!("{} ({})", self.label, format_point(handicap, true))
        } else {
            self.label.clone()
        }
    }
}

/// Split a flat odds list into the 1X2 market and everything else.
///
/// 1X2 entries are resolved per bookmaker in order of first appearance; the
/// first bookmaker whose outcomes resolve wins.
pub fn from_flat(entries: &[Value], home_team: &str, away_team: &str) -> (Option<ThreeWay>, MarketBook) {
    let mut book = MarketBook::new();
    let mut primary_groups: Vec<(Option<String>, Vec<FlatOdd<'_>>)> = Vec::new();

    for raw in entries {
        let odd = FlatOdd::read(raw);
        if odd.is_primary() {
            match primary_groups.iter_mut().find(|(bm, _)| *bm == odd.bookmaker) {
                Some((_, group)) => group.push(odd),
                None => primary_groups.push((odd.bookmaker.clone(), vec![odd])),
            }
        } else {
            book.add(odd.market_id.as_deref(), &odd.market, &odd.full_label(), odd.price);
        }
    }

    let primary = primary_groups.iter().find_map(|(bookmaker, group)| {
        let quotes: Vec<Quote<'_>> = group
            .iter()
            .map(|o| Quote { name: o.label.as_str(), price: o.price })
            .collect();
        let resolved = resolve_three_way(&quotes, home_team, away_team);
        if resolved.is_none() {
            log::debug!("bookmaker {bookmaker:?}: 1X2 outcomes unusable, trying next");
        }
        resolved
    });

    (primary, book)
}

/// Already-grouped markets (`[{name, options: [{label, value}]}]`), as the
/// backend and this crate's own output carry them.
pub fn from_grouped(markets: &[Value], home_team: &str, away_team: &str) -> (Option<ThreeWay>, MarketBook) {
    let mut book = MarketBook::new();
    let mut primary = None;

    for (idx, market) in markets.iter().enumerate() {
        let name = fields::name_of(market, &["name", "market"]).unwrap_or_default();
        let market_id = fields::text_of(market, &["market_id", "id"]);
        let options = fields::list(market, "options");

        let is_primary = translate::is_primary(&name)
            || market_id.as_deref().and_then(|id| id.parse::<i64>().ok()) == Some(PRIMARY_MARKET_ID);
        if is_primary {
            if primary.is_none() {
                let labels: Vec<String> = options
                    .iter()
                    .map(|o| fields::text_of(o, &["label", "name"]).unwrap_or_default())
                    .collect();
                let quotes: Vec<Quote<'_>> = labels
                    .iter()
                    .zip(options)
                    .map(|(label, o)| Quote {
                        name: label.as_str(),
                        price: fields::first(o, &["value", "odd", "price"]).and_then(fields::number),
                    })
                    .collect();
                primary = resolve_three_way(&quotes, home_team, away_team);
            }
            continue;
        }

        // Each entry is its own market even when two share a display name.
        let key = market_id.clone().unwrap_or_else(|| format!("#{idx}"));
        for option in options {
            let label = fields::text_of(option, &["label", "name"]).unwrap_or_default();
            let price = fields::first(option, &["value", "odd", "price"]).and_then(fields::number);
            book.add(Some(&key), &name, &label, price);
        }
    }

    (primary, book)
}

/// Legacy `{home, draw, away}` odds object.
pub fn from_object(raw: &Value) -> Option<ThreeWay> {
    if !raw.is_object() {
        return None;
    }
    let odds = ThreeWay {
        home: raw.get("home").and_then(price_of),
        draw: raw.get("draw").and_then(price_of),
        away: raw.get("away").and_then(price_of),
    };
    (!odds.is_empty()).then_some(odds)
}
