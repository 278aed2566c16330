//! Spoken-name variants and fuzzy label scoring.
//!
//! Scores are kept in hundredths so ranking and margin checks compare
//! exactly.

/// Label equals the search.
pub const SCORE_EXACT: u8 = 100;
/// Label contains the search.
pub const SCORE_LABEL_CONTAINS: u8 = 80;
/// Search contains the label.
pub const SCORE_SEARCH_CONTAINS: u8 = 70;
/// Search is the acronym of a multi-word label ("gm" for "Google Maps").
pub const SCORE_ACRONYM: u8 = 70;
/// A search word starts a label word.
pub const SCORE_WORD_PREFIX: u8 = 60;
/// Package id contains the compacted search.
pub const SCORE_PACKAGE: u8 = 50;
/// A label word contains a search word.
pub const SCORE_WORD_CONTAINS: u8 = 40;

/// Candidates must score above this to be kept.
pub const MIN_SCORE: u8 = 20;

/// Search words this short only count for whole-label rules.
const MIN_WORD_LEN: usize = 3;

/// Lower-cased variants of a spoken name, most literal first, deduplicated.
///
/// 1. trimmed name, 2. without spaces, 3. without a trailing
/// "app"/"application", 4. that without spaces.
pub fn name_variants(raw: &str) -> Vec<String> {
    let base = raw
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let stripped = strip_app_suffix(&base);

    let mut variants: Vec<String> = Vec::with_capacity(4);
    for variant in [
        base.clone(),
        compact(&base),
        stripped.clone(),
        compact(&stripped),
    ] {
        if !variant.is_empty() && !variants.contains(&variant) {
            variants.push(variant);
        }
    }
    variants
}

fn compact(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

fn strip_app_suffix(name: &str) -> String {
    let words: Vec<&str> = name.split(' ').collect();
    match words.split_last() {
        Some((last, rest)) if !rest.is_empty() && (*last == "app" || *last == "application") => {
            rest.join(" ")
        }
        _ => name.to_string(),
    }
}

/// Score one app against a lower-cased search; the maximum of all rules.
pub fn match_score(search: &str, label: &str, package_id: &str) -> u8 {
    let label = label.trim().to_lowercase();
    if search.is_empty() || label.is_empty() {
        return 0;
    }
    if label == search {
        return SCORE_EXACT;
    }

    let mut score = 0;
    if label.contains(search) {
        score = score.max(SCORE_LABEL_CONTAINS);
    }
    if search.contains(label.as_str()) {
        score = score.max(SCORE_SEARCH_CONTAINS);
    }
    if is_acronym(search, &label) {
        score = score.max(SCORE_ACRONYM);
    }

    for search_word in search
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_WORD_LEN)
    {
        for label_word in label.split_whitespace() {
            if label_word.starts_with(search_word) {
                score = score.max(SCORE_WORD_PREFIX);
            } else if label_word.contains(search_word) {
                score = score.max(SCORE_WORD_CONTAINS);
            }
        }
    }

    let compacted = compact(search);
    if !compacted.is_empty() && package_id.to_lowercase().contains(&compacted) {
        score = score.max(SCORE_PACKAGE);
    }

    score
}

fn is_acronym(search: &str, label: &str) -> bool {
    let words: Vec<&str> = label.split_whitespace().collect();
    if words.len() < 2 {
        return false;
    }
    let acronym: String = words.iter().filter_map(|w| w.chars().next()).collect();
    compact(search) == acronym
}
