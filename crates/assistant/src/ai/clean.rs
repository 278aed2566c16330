//! Post-processing of model output into one short spoken reply.

use regex::Regex;
use std::sync::LazyLock;

pub const MAX_REPLY_SENTENCES: usize = 2;
pub const MAX_REPLY_CHARS: usize = 240;

/// Spoken when the model returns nothing usable.
pub const APOLOGY: &str =
    "I apologize, but I couldn't generate a proper response. How else can I assist you?";

static ROLE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:Question|Answer|Assistant|A|Q|TARS|Human):\s*").expect("valid regex")
});

const BRACKETS: &[char] = &['[', ']', '(', ')', '{', '}'];
const QUOTES: &[char] = &['"', '\''];

/// Strip transcript scaffolding and shorten to a couple of sentences.
pub fn clean_response(raw: &str) -> String {
    let mut text = raw;
    if let Some(pos) = text.rfind("TARS:") {
        text = &text[pos + "TARS:".len()..];
    }
    if let Some(pos) = text.find("Human:") {
        text = &text[..pos];
    }

    let unescaped = text
        .replace("\\n", " ")
        .replace("\\\"", "\"")
        .replace("\\'", "'");
    let collapsed = unescaped.split_whitespace().collect::<Vec<_>>().join(" ");

    let trimmed = collapsed
        .trim_start_matches(BRACKETS)
        .trim_end_matches(BRACKETS)
        .trim();
    let trimmed = trimmed.strip_prefix(QUOTES).unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix(QUOTES).unwrap_or(trimmed);
    let cleaned = ROLE_PREFIX.replace(trimmed.trim(), "");
    let cleaned = cleaned.trim();

    if cleaned.chars().count() < 5
        || cleaned
            .chars()
            .all(|c| c.is_ascii_punctuation() || c.is_whitespace())
    {
        return APOLOGY.to_string();
    }

    truncate_chars(&first_sentences(cleaned, MAX_REPLY_SENTENCES), MAX_REPLY_CHARS)
}

/// Leading `count` sentences. A terminator only ends a sentence when
/// followed by whitespace or the end of text, so "3.5" stays intact.
fn first_sentences(text: &str, count: usize) -> String {
    let mut seen = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                seen += 1;
                if seen >= count {
                    return text[..i + ch.len_utf8()].to_string();
                }
            }
        }
    }
    text.to_string()
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    let cut = match cut.rfind(' ') {
        Some(pos) => &cut[..pos],
        None => cut.as_str(),
    };
    format!("{}...", cut.trim_end_matches([',', ';', ':', ' ']))
}
