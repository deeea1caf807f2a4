//! League flag resolution.

/// Shown when nothing identifies the league's country.
pub const DEFAULT_FLAG: &str = "🏆";

// Checked in order against the lowercased league, sport key and country
// names; the first keyword found in any of them wins. Competitions come
// before countries.
const FLAGS: &[(&str, &str)] = &[
    ("world cup", "🌍"),
    ("fifa", "🌍"),
    ("uefa", "🇪🇺"),
    ("champions league", "🇪🇺"),
    ("europa", "🇪🇺"),
    ("conference league", "🇪🇺"),
    ("euro ", "🇪🇺"),
    ("turkey", "🇹🇷"),
    ("türkiye", "🇹🇷"),
    ("turkiye", "🇹🇷"),
    ("süper lig", "🇹🇷"),
    ("super lig", "🇹🇷"),
    ("england", "🏴\u{e0067}\u{e0062}\u{e0065}\u{e006e}\u{e0067}\u{e007f}"),
    ("premier league", "🏴\u{e0067}\u{e0062}\u{e0065}\u{e006e}\u{e0067}\u{e007f}"),
    ("epl", "🏴\u{e0067}\u{e0062}\u{e0065}\u{e006e}\u{e0067}\u{e007f}"),
    ("championship", "🏴\u{e0067}\u{e0062}\u{e0065}\u{e006e}\u{e0067}\u{e007f}"),
    ("scotland", "🏴\u{e0067}\u{e0062}\u{e0073}\u{e0063}\u{e0074}\u{e007f}"),
    ("spain", "🇪🇸"),
    ("la liga", "🇪🇸"),
    ("laliga", "🇪🇸"),
    ("germany", "🇩🇪"),
    ("bundesliga", "🇩🇪"),
    ("italy", "🇮🇹"),
    ("serie a", "🇮🇹"),
    ("france", "🇫🇷"),
    ("ligue 1", "🇫🇷"),
    ("netherlands", "🇳🇱"),
    ("eredivisie", "🇳🇱"),
    ("portugal", "🇵🇹"),
    ("primeira", "🇵🇹"),
    ("belgium", "🇧🇪"),
    ("brazil", "🇧🇷"),
    ("brasil", "🇧🇷"),
    ("argentina", "🇦🇷"),
    ("usa", "🇺🇸"),
    ("mls", "🇺🇸"),
];

/// The flag for a league. A logo or flag the provider supplied is passed
/// through untouched; otherwise the names are searched for a known keyword.
pub fn resolve_flag(supplied: Option<&str>, names: &[&str]) -> String {
    if let Some(supplied) = supplied.map(str::trim).filter(|s| !s.is_empty()) {
        return supplied.to_owned();
    }
    flag_for(names).unwrap_or(DEFAULT_FLAG).to_owned()
}

pub fn flag_for(names: &[&str]) -> Option<&'static str> {
    let names: Vec<String> = names
        .iter()
        .map(|n| n.replace('_', " ").to_lowercase())
        .filter(|n| !n.trim().is_empty())
        .collect();

    FLAGS
        .iter()
        .find(|(keyword, _)| names.iter().any(|n| mentions(n, keyword)))
        .map(|(_, flag)| *flag)
}

// Short keywords ("usa", "epl", "mls") must match a whole word, so "Jerusalem"
// or "Temple" stay unflagged.
fn mentions(name: &str, keyword: &str) -> bool {
    if keyword.len() <= 4 {
        name.split(|c: char| !c.is_alphanumeric()).any(|w| w == keyword)
    } else {
        name.contains(keyword)
    }
}
