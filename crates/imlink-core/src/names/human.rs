//! General-purpose human name parser
//!
//! Splits free-form names into first / middle / last, dropping honorific
//! titles, generational and academic suffixes, and quoted or parenthesized
//! nicknames. Surname particles ("van", "de la") stay with the last name.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    /// Nicknames written as "Bob", “Bob” or (Bob)
    static ref NICKNAME: Regex = Regex::new(r#""[^"]*"|“[^”]*”|\([^)]*\)"#).unwrap();

    static ref TITLES: HashSet<&'static str> = [
        "dr", "prof", "professor", "mr", "mrs", "ms", "miss", "sir", "dame",
        "rev", "fr", "hon", "lord", "lady",
    ]
    .into_iter()
    .collect();

    static ref SUFFIXES: HashSet<&'static str> = [
        "jr", "sr", "ii", "iii", "iv", "phd", "md", "esq", "dphil", "msc", "bsc",
    ]
    .into_iter()
    .collect();

    static ref PARTICLES: HashSet<&'static str> = [
        "van", "von", "der", "den", "de", "del", "della", "di", "da", "das", "dos",
        "du", "la", "le", "ter", "ten", "bin", "ibn", "al", "st",
    ]
    .into_iter()
    .collect();
}

/// Name parts in their original case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct HumanName {
    pub first: String,
    pub middle: String,
    pub last: String,
}

/// Parse a free-form personal name.
pub(crate) fn parse_human_name(name: &str) -> HumanName {
    let without_nicknames = NICKNAME.replace_all(name, " ");
    let name = without_nicknames.trim();
    if name.is_empty() {
        return HumanName::default();
    }

    let segments: Vec<&str> = name.split(',').map(str::trim).filter(|s| !s.is_empty()).collect();

    match segments.as_slice() {
        [] => HumanName::default(),
        [single] => parse_given_first(&tokens(single)),
        [head, rest @ ..] if rest.iter().all(|s| is_suffix_segment(s)) => {
            parse_given_first(&tokens(head))
        }
        [last, given, ..] => parse_family_first(last, given),
    }
}

/// "Last, First Middle"
fn parse_family_first(last: &str, given: &str) -> HumanName {
    let given_tokens = strip_suffixes(strip_titles(tokens(given)));
    let last_tokens = strip_titles(tokens(last));

    let first = given_tokens.first().map(|s| s.to_string()).unwrap_or_default();
    let middle = given_tokens.iter().skip(1).copied().collect::<Vec<_>>().join(" ");

    HumanName {
        first,
        middle,
        last: last_tokens.join(" "),
    }
}

/// "First Middle Last"
fn parse_given_first(parts: &[&str]) -> HumanName {
    let parts = strip_suffixes(strip_titles(parts.to_vec()));

    match parts.len() {
        0 => HumanName::default(),
        1 => HumanName {
            first: parts[0].to_string(),
            ..Default::default()
        },
        n => {
            let mut last_start = n - 1;
            while last_start > 1 && is_particle(parts[last_start - 1]) {
                last_start -= 1;
            }

            HumanName {
                first: parts[0].to_string(),
                middle: parts[1..last_start].join(" "),
                last: parts[last_start..].join(" "),
            }
        }
    }
}

fn tokens(s: &str) -> Vec<&str> {
    s.split_whitespace().collect()
}

fn bare(token: &str) -> String {
    token.trim_matches(|c: char| c == '.' || c == ',').to_lowercase()
}

fn strip_titles(mut parts: Vec<&str>) -> Vec<&str> {
    // Keep at least one token so "Dr. Smith" still has a name
    while parts.len() > 1 && TITLES.contains(bare(parts[0]).as_str()) {
        parts.remove(0);
    }
    parts
}

fn strip_suffixes(mut parts: Vec<&str>) -> Vec<&str> {
    while parts.len() > 1 {
        match parts.last() {
            Some(last) if SUFFIXES.contains(bare(last).replace('.', "").as_str()) => {
                parts.pop();
            }
            _ => break,
        }
    }
    parts
}

fn is_suffix_segment(segment: &str) -> bool {
    segment
        .split_whitespace()
        .all(|t| SUFFIXES.contains(bare(t).replace('.', "").as_str()))
}

fn is_particle(token: &str) -> bool {
    PARTICLES.contains(bare(token).as_str())
}
