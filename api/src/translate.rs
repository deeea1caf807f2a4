//! English → Turkish market and outcome names.
//!
//! Names found verbatim (case-insensitively) in the tables are replaced
//! wholesale. Anything else goes through a word-substitution pass so that
//! composite names such as "Over 3.5" or "First Half Goals" still read in the
//! display language.

use regex::Regex;
use std::sync::OnceLock;

/// Display name of the 1X2 market. Always sorted first.
pub const PRIMARY_MARKET: &str = "Maç Sonucu";
pub const CORRECT_SCORE_MARKET: &str = "Doğru Skor";
pub const HALFTIME_FULLTIME_MARKET: &str = "İlk Yarı/Maç Sonucu";

const MARKET_NAMES: &[(&str, &str)] = &[
    ("h2h", PRIMARY_MARKET),
    ("1x2", PRIMARY_MARKET),
    ("match winner", PRIMARY_MARKET),
    ("match result", PRIMARY_MARKET),
    ("match odds", PRIMARY_MARKET),
    ("fulltime result", PRIMARY_MARKET),
    ("full time result", PRIMARY_MARKET),
    ("3way result", PRIMARY_MARKET),
    ("double chance", "Çifte Şans"),
    ("both teams to score", "Karşılıklı Gol"),
    ("both teams score", "Karşılıklı Gol"),
    ("btts", "Karşılıklı Gol"),
    ("totals", "Alt/Üst"),
    ("over/under", "Alt/Üst"),
    ("goals over/under", "Alt/Üst"),
    ("total goals over/under", "Alt/Üst"),
    ("correct score", CORRECT_SCORE_MARKET),
    ("exact score", CORRECT_SCORE_MARKET),
    ("half time result", "İlk Yarı Sonucu"),
    ("1st half result", "İlk Yarı Sonucu"),
    ("first half winner", "İlk Yarı Sonucu"),
    ("second half winner", "İkinci Yarı Sonucu"),
    ("2nd half result", "İkinci Yarı Sonucu"),
    ("half time/full time", HALFTIME_FULLTIME_MARKET),
    ("halftime/fulltime", HALFTIME_FULLTIME_MARKET),
    ("ht/ft double", HALFTIME_FULLTIME_MARKET),
    ("draw no bet", "Beraberlikte İade"),
    ("asian handicap", "Asya Handikap"),
    ("spreads", "Handikap"),
    ("handicap", "Handikap"),
    ("handicap result", "Handikap"),
    ("odd/even", "Tek/Çift"),
    ("goals odd/even", "Tek/Çift"),
    ("exact goals number", "Toplam Gol"),
    ("total goals", "Toplam Gol"),
    ("number of goals", "Toplam Gol"),
    ("team to score first", "İlk Golü Atan Takım"),
    ("first team to score", "İlk Golü Atan Takım"),
    ("first half goals over/under", "İlk Yarı Alt/Üst"),
    ("goals over/under first half", "İlk Yarı Alt/Üst"),
    ("home team total goals", "Ev Sahibi Toplam Gol"),
    ("away team total goals", "Deplasman Toplam Gol"),
    ("corners over under", "Korner Alt/Üst"),
    ("total corners", "Korner Alt/Üst"),
    ("cards over/under", "Kart Alt/Üst"),
];

const OUTCOME_LABELS: &[(&str, &str)] = &[
    ("home", "1"),
    ("1", "1"),
    ("draw", "X"),
    ("tie", "X"),
    ("x", "X"),
    ("away", "2"),
    ("2", "2"),
    ("home/draw", "1X"),
    ("1x", "1X"),
    ("home/away", "12"),
    ("12", "12"),
    ("draw/away", "X2"),
    ("x2", "X2"),
    ("yes", "Var"),
    ("no", "Yok"),
    ("over", "Üst"),
    ("under", "Alt"),
    ("odd", "Tek"),
    ("even", "Çift"),
    ("no goal", "Gol Yok"),
];

// Multi-word patterns come first so "First Half" is not split into two hits.
const WORD_RULES: &[(&str, &str)] = &[
    (r"(?i)\b(first|1st) half\b", "İlk Yarı"),
    (r"(?i)\b(second|2nd) half\b", "İkinci Yarı"),
    (r"(?i)\bover\b", "Üst"),
    (r"(?i)\bunder\b", "Alt"),
    (r"(?i)\bhome\b", "Ev Sahibi"),
    (r"(?i)\baway\b", "Deplasman"),
    (r"(?i)\bdraw\b", "Beraberlik"),
    (r"(?i)\byes\b", "Var"),
    (r"(?i)\bno\b", "Yok"),
    (r"(?i)\bgoals?\b", "Gol"),
    (r"(?i)\btotal\b", "Toplam"),
    (r"(?i)\bcorners?\b", "Korner"),
    (r"(?i)\bcards?\b", "Kart"),
    (r"(?i)\bwinner\b", "Kazanan"),
    (r"(?i)\bhandicap\b", "Handikap"),
    (r"(?i)\bteam\b", "Takım"),
    (r"(?i)\bscore\b", "Skor"),
    (r"(?i)\bresult\b", "Sonuç"),
];

fn word_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        WORD_RULES
            .iter()
            .filter_map(|(pattern, replacement)| match Regex::new(pattern) {
                Ok(re) => Some((re, *replacement)),
                Err(e) => {
                    log::error!("invalid translation pattern {pattern}: {e}");
                    None
                }
            })
            .collect()
    })
}

fn lookup(table: &[(&str, &'static str)], raw: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(english, _)| english.eq_ignore_ascii_case(raw))
        .map(|(_, display)| *display)
}

fn substitute_words(raw: &str) -> String {
    word_rules()
        .iter()
        .fold(raw.to_owned(), |acc, (re, replacement)| {
            re.replace_all(&acc, *replacement).into_owned()
        })
}

pub fn market_name(raw: &str) -> String {
    let raw = raw.trim();
    lookup(MARKET_NAMES, raw)
        .map(str::to_owned)
        .unwrap_or_else(|| substitute_words(raw))
}

/// Translate an outcome label within an already-translated market.
/// Half time / full time labels ("Home/Draw") translate part by part into
/// "1/X" rather than being read as a double-chance pair.
pub fn outcome_label(market: &str, raw: &str) -> String {
    let raw = raw.trim();
    if market == HALFTIME_FULLTIME_MARKET && raw.contains('/') {
        return raw
            .split('/')
            .map(|part| {
                let part = part.trim();
                side_label(part).map(str::to_owned).unwrap_or_else(|| part.to_owned())
            })
            .collect::<Vec<_>>()
            .join("/");
    }
    if let Some(display) = lookup(OUTCOME_LABELS, raw) {
        return display.to_owned();
    }
    // "Over 2.5", "Home (-1.5)": translate the head, keep the line.
    if let Some((head, line)) = split_line(raw) {
        if let Some(display) = lookup(OUTCOME_LABELS, head) {
            return format!("{display} {line}");
        }
    }
    substitute_words(raw)
}

fn split_line(raw: &str) -> Option<(&str, &str)> {
    let (head, line) = raw.rsplit_once(' ')?;
    let numeric = line.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '+' | '-' | '('));
    let head = head.trim();
    (numeric && !head.is_empty()).then_some((head, line))
}

fn side_label(raw: &str) -> Option<&'static str> {
    match lookup(OUTCOME_LABELS, raw)? {
        side @ ("1" | "X" | "2") => Some(side),
        _ => None,
    }
}

/// Lowercase Turkish alphabet in dictionary order; `q`, `w` and `x` sit
/// where they would in English.
const ALPHABET: &str = "abcçdefgğhıijklmnoöpqrsştuüvwxyz";

/// Sort key ordering display names the way a Turkish reader expects:
/// `Ç` after `C` and `İ` after `I`, case folded. Punctuation
/// and digits sort before letters; anything else after them.
pub fn collation_key(name: &str) -> Vec<u32> {
    name.chars()
        .map(|c| {
            let folded = match c {
                'I' => 'ı',
                'İ' => 'i',
                c => c.to_lowercase().next().unwrap_or(c),
            };
            match ALPHABET.chars().position(|a| a == folded) {
                Some(idx) => 0x1_0000 + idx as u32,
                None if folded.is_ascii() => folded as u32,
                None => 0x2_0000 + folded as u32,
            }
        })
        .collect()
}

pub fn is_primary(raw_market: &str) -> bool {
    market_name(raw_market) == PRIMARY_MARKET
}

/// Correct-score style markets get the "lower odds wins" dedup rule.
pub fn is_correct_score(display_market: &str) -> bool {
    display_market.contains(CORRECT_SCORE_MARKET) || display_market.to_lowercase().contains("correct score")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turkish_letters_sort_next_to_their_base() {
        let mut names = vec!["Tek/Çift", "İlk Yarı Sonucu", "Çifte Şans", "Karşılıklı Gol", "Alt/Üst", "Ilık"];
        names.sort_by_key(|n| collation_key(n));
        assert_eq!(
            names,
            vec!["Alt/Üst", "Çifte Şans", "Ilık", "İlk Yarı Sonucu", "Karşılıklı Gol", "Tek/Çift"]
        );
        assert!(collation_key("Doğru Skor") < collation_key("doğru skor 2"));
    }

    #[test]
    fn market_names_from_table() {
        assert_eq!(market_name("h2h"), PRIMARY_MARKET);
        assert_eq!(market_name("Fulltime Result"), PRIMARY_MARKET);
        assert_eq!(market_name("Both Teams To Score"), "Karşılıklı Gol");
        assert_eq!(market_name("totals"), "Alt/Üst");
        assert_eq!(market_name("Correct Score"), CORRECT_SCORE_MARKET);
    }

    #[test]
    fn unknown_market_names_get_word_substitution() {
        assert_eq!(market_name("Second Half Goals"), "İkinci Yarı Gol");
        assert_eq!(market_name("Home Corners"), "Ev Sahibi Korner");
        assert_eq!(market_name("Player Props"), "Player Props");
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(outcome_label("Alt/Üst", "Over"), "Üst");
        assert_eq!(outcome_label("Alt/Üst", "Under 2.5"), "Alt 2.5");
        assert_eq!(outcome_label("Çifte Şans", "Home/Draw"), "1X");
        assert_eq!(outcome_label("Karşılıklı Gol", "yes"), "Var");
        assert_eq!(outcome_label(CORRECT_SCORE_MARKET, "1:0"), "1:0");
        assert_eq!(outcome_label("Asya Handikap", "Home (-1.5)"), "1 (-1.5)");
        assert_eq!(outcome_label("Handikap", "Draw +1"), "X +1");
    }

    #[test]
    fn halftime_fulltime_labels_split_per_half() {
        assert_eq!(outcome_label(HALFTIME_FULLTIME_MARKET, "Home/Draw"), "1/X");
        assert_eq!(outcome_label(HALFTIME_FULLTIME_MARKET, "Draw/Away"), "X/2");
    }

    #[test]
    fn translation_is_stable_on_display_names() {
        for name in [PRIMARY_MARKET, "Alt/Üst", "Karşılıklı Gol", "Çifte Şans", CORRECT_SCORE_MARKET, HALFTIME_FULLTIME_MARKET] {
            assert_eq!(market_name(name), name);
        }
        for label in ["1", "X", "2", "1X", "X2", "12", "Üst 2.5", "Alt 2.5", "Var", "Yok", "2:1", "1 (-1.5)"] {
            assert_eq!(outcome_label("Alt/Üst", label), label);
        }
        assert_eq!(outcome_label(HALFTIME_FULLTIME_MARKET, "1/X"), "1/X");
    }

    #[test]
    fn primary_and_correct_score_detection() {
        assert!(is_primary("Match Winner"));
        assert!(is_primary(PRIMARY_MARKET));
        assert!(!is_primary("Double Chance"));
        assert!(is_correct_score(CORRECT_SCORE_MARKET));
        assert!(is_correct_score("First Half Correct Score"));
        assert!(!is_correct_score("Alt/Üst"));
    }
}
