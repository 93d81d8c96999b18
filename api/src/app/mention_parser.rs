//! Mention parser for incident comments
//!
//! Finds `@user` tags in free-form comment text, e.g. "@john.doe please look".

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z0-9_.]+)").expect("mention pattern is valid"));

/// Extract mentioned-user tokens, one entry per occurrence, in text order.
///
/// An `@` directly preceded by a word character or a period is part of an
/// address (`ops@example.com`) and is skipped. Trailing periods are treated
/// as sentence punctuation and dropped from the token, so a username that
/// itself ends in `.` cannot be mentioned.
pub fn extract_mentions(comment_text: &str) -> Vec<String> {
    let mut mentions = Vec::new();

    for cap in MENTION_RE.captures_iter(comment_text) {
        let (Some(whole), Some(token)) = (cap.get(0), cap.get(1)) else {
            continue;
        };

        let preceded_by_word = comment_text[..whole.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '.');
        if preceded_by_word {
            continue;
        }

        let token = token.as_str().trim_end_matches('.');
        if token.is_empty() {
            continue;
        }

        mentions.push(token.to_string());
    }

    mentions
}

/// Distinct mentioned users, in order of first occurrence.
pub fn unique_mentions(comment_text: &str) -> Vec<String> {
    dedup_mentions(extract_mentions(comment_text))
}

/// Collapse repeated tokens, keeping the first occurrence of each.
pub fn dedup_mentions(mentions: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    mentions
        .into_iter()
        .filter(|m| seen.insert(m.clone()))
        .collect()
}
