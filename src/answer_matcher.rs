use crate::catalog::{Catalog, Item};

/// Common alternative spellings, keyed by normalized input
const ALIASES: &[(&str, &str)] = &[
    ("usa", "united states"),
    ("us", "united states"),
    ("america", "united states"),
    ("united states of america", "united states"),
    ("uk", "united kingdom"),
    ("britain", "united kingdom"),
    ("great britain", "united kingdom"),
    ("uae", "united arab emirates"),
    ("emirates", "united arab emirates"),
    ("drc", "dr congo"),
    ("democratic republic of the congo", "dr congo"),
    ("congo kinshasa", "dr congo"),
    ("korea", "south korea"),
    ("republic of korea", "south korea"),
    ("cote divoire", "ivory coast"),
    ("côte divoire", "ivory coast"),
    ("holland", "netherlands"),
    ("czechia", "czech republic"),
    ("burma", "myanmar"),
    ("nz", "new zealand"),
    ("aussie", "australia"),
];

/// Lowercases, strips punctuation, collapses whitespace and drops a leading "the"
pub fn normalize(input: &str) -> String {
    let cleaned: String = input
        .chars()
        .filter_map(|c| match c {
            '.' | ',' | '\'' | '’' | '!' | '?' | '(' | ')' => None,
            '-' | '_' | '/' => Some(' '),
            other => Some(other),
        })
        .collect::<String>()
        .to_lowercase();

    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let words = match words.split_first() {
        Some((&"the", rest)) if !rest.is_empty() => rest,
        _ => &words[..],
    };
    words.join(" ")
}

/// Canonical name for a normalized alias, if it is one
pub fn resolve_alias(normalized: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, canonical)| *canonical)
}

/// Whether `input` names `expected`
///
/// Accepts an exact match after normalization, a known alias, or prefix
/// containment either way when the shorter side has at least
/// `min_prefix_len` characters.
pub fn matches_name(input: &str, expected: &str, min_prefix_len: usize) -> bool {
    let given = normalize(input);
    let wanted = normalize(expected);
    if given.is_empty() || wanted.is_empty() {
        return false;
    }
    if given == wanted {
        return true;
    }
    if resolve_alias(&given) == Some(wanted.as_str()) {
        return true;
    }

    let (shorter, longer) = if given.len() <= wanted.len() {
        (&given, &wanted)
    } else {
        (&wanted, &given)
    };
    shorter.chars().count() >= min_prefix_len && longer.starts_with(shorter.as_str())
}

/// Grades a typed or chosen answer against `target`
///
/// The target's code is always accepted. Naming a different catalog item
/// exactly is always rejected, so a short name is never accepted as the
/// prefix of a longer one ("Niger" for Nigeria).
pub fn judge_answer(input: &str, target: &Item, catalog: &Catalog, min_prefix_len: usize) -> bool {
    let given = normalize(input);
    if given.is_empty() {
        return false;
    }
    if given == normalize(&target.code) {
        return true;
    }

    let names_other_item = catalog
        .items()
        .iter()
        .any(|item| item.code != target.code && normalize(&item.name) == given);
    if names_other_item {
        return false;
    }

    matches_name(input, &target.name, min_prefix_len)
}
