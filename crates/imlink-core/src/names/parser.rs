//! Style-directed author name parsing

use unicode_normalization::UnicodeNormalization;

use super::human::parse_human_name;
use super::style::NameStyle;
use crate::text::collapse_whitespace;

/// An author name split into lowercase parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedName {
    pub first: String,
    pub last: String,
    pub middle: String,
    /// Space-joined comparison form
    pub normalized: String,
    /// Trimmed input string
    pub original: String,
    /// Style that actually produced the parts
    pub style: NameStyle,
}

/// Parse `name` according to the declared `style`.
///
/// Styles that cannot apply to the given string (no comma for
/// `last_comma_first`, a single token for `last_first`, nothing but
/// initials for `first_initial_last`) fall back to the general parser.
/// Never fails; empty or malformed names give empty parts.
pub fn parse_name(name: &str, style: NameStyle) -> ParsedName {
    let name = name.trim();

    let parsed = match style {
        NameStyle::LastInitial => Some(parse_last_initial(name)),
        NameStyle::LastCommaFirst => parse_last_comma_first(name),
        NameStyle::LastFirst => parse_last_first(name),
        NameStyle::FirstInitialLast => parse_first_initial_last(name),
        NameStyle::Auto | NameStyle::FirstLast => None,
    };

    parsed.unwrap_or_else(|| parse_general(name))
}

fn parse_last_initial(name: &str) -> ParsedName {
    let parts: Vec<&str> = name.split_whitespace().collect();

    match parts.split_last() {
        Some((initials, rest)) if !rest.is_empty() => {
            let last = rest.join(" ").to_lowercase();
            let first: String = initials
                .chars()
                .next()
                .map(|c| c.to_lowercase().collect())
                .unwrap_or_default();

            ParsedName {
                normalized: join_parts(&[&last, &first]),
                first,
                last,
                middle: String::new(),
                original: name.to_string(),
                style: NameStyle::LastInitial,
            }
        }
        _ => {
            let last = collapse_whitespace(&name.to_lowercase());
            ParsedName {
                normalized: last.clone(),
                last,
                original: name.to_string(),
                style: NameStyle::LastInitial,
                ..Default::default()
            }
        }
    }
}

fn parse_last_comma_first(name: &str) -> Option<ParsedName> {
    let (last, rest) = name.split_once(',')?;
    let last = collapse_whitespace(&last.to_lowercase());
    let given: Vec<String> = rest.split_whitespace().map(str::to_lowercase).collect();

    let first = given.first().cloned().unwrap_or_default();
    let middle = given.iter().skip(1).cloned().collect::<Vec<_>>().join(" ");

    Some(ParsedName {
        normalized: join_parts(&[&first, &middle, &last]),
        first,
        last,
        middle,
        original: name.to_string(),
        style: NameStyle::LastCommaFirst,
    })
}

fn parse_last_first(name: &str) -> Option<ParsedName> {
    let parts: Vec<String> = name.split_whitespace().map(str::to_lowercase).collect();
    if parts.len() < 2 {
        return None;
    }

    let last = parts[0].clone();
    let first = parts[1].clone();
    let middle = parts[2..].join(" ");

    Some(ParsedName {
        normalized: join_parts(&[&first, &middle, &last]),
        first,
        last,
        middle,
        original: name.to_string(),
        style: NameStyle::LastFirst,
    })
}

fn parse_first_initial_last(name: &str) -> Option<ParsedName> {
    let parts: Vec<&str> = name.split_whitespace().collect();

    let initial_count = parts.iter().take_while(|p| is_initial(p)).count();
    if initial_count == parts.len() {
        return None;
    }

    let initials: Vec<String> = parts[..initial_count]
        .iter()
        .map(|p| p.replace('.', "").to_lowercase())
        .collect();
    let first = initials.first().cloned().unwrap_or_default();
    let middle = initials.iter().skip(1).cloned().collect::<Vec<_>>().join(" ");
    let last = parts[initial_count..].join(" ").to_lowercase();

    Some(ParsedName {
        normalized: join_parts(&[&first, &middle, &last]),
        first,
        last,
        middle,
        original: name.to_string(),
        style: NameStyle::FirstInitialLast,
    })
}

/// "J." or "J"
fn is_initial(token: &str) -> bool {
    let len = token.chars().count();
    len <= 2 && (token.ends_with('.') || len == 1)
}

fn parse_general(name: &str) -> ParsedName {
    let human = parse_human_name(name);

    let clean = join_parts(&[&human.first, &human.middle, &human.last]);
    let ascii: String = clean.nfkd().filter(char::is_ascii).collect();
    let replaced: String = ascii
        .to_lowercase()
        .chars()
        .map(|c| if matches!(c, '-' | '.' | ',') { ' ' } else { c })
        .collect();

    ParsedName {
        first: human.first.to_lowercase(),
        last: human.last.to_lowercase(),
        middle: human.middle.to_lowercase(),
        normalized: collapse_whitespace(&replaced),
        original: name.to_string(),
        style: NameStyle::FirstLast,
    }
}

fn join_parts<S: AsRef<str>>(parts: &[S]) -> String {
    let joined = parts
        .iter()
        .map(AsRef::as_ref)
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<&str>>()
        .join(" ");
    collapse_whitespace(&joined)
}
