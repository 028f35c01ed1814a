//! Best-effort cleanup of free-form model replies.
//!
//! The prompt asks for the bare translation, but chat models still wrap it in
//! quotes or lead with a label now and then. Nothing here is guaranteed; text
//! that does not match a known pattern is returned as-is (trimmed).

/// Labels some models put in front of the translation.
const PREFIXES: &[&str] = &[
    "here is the translation:",
    "here's the translation:",
    "the translation is:",
    "translated text:",
    "translation:",
];

/// Opening/closing quote pairs stripped when they wrap the whole reply.
const QUOTE_PAIRS: &[(char, char)] = &[
    ('"', '"'),
    ('\'', '\''),
    ('`', '`'),
    ('\u{201C}', '\u{201D}'), // “ ”
    ('\u{2018}', '\u{2019}'), // ‘ ’
    ('\u{00AB}', '\u{00BB}'), // « »
    ('\u{300C}', '\u{300D}'), // 「 」
    ('\u{300E}', '\u{300F}'), // 『 』
];

/// What the model's reply turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The translated text.
    Translation(String),
    /// Nothing left after cleanup.
    Empty,
}

/// Classifies and cleans a raw model reply.
pub fn clean_reply(raw: &str) -> Reply {
    let text = strip_quotes(strip_prefix(raw.trim()));
    if text.is_empty() {
        Reply::Empty
    } else {
        Reply::Translation(text.to_string())
    }
}

fn strip_prefix(text: &str) -> &str {
    for prefix in PREFIXES {
        // Compare ASCII-lowercased head; prefixes are ASCII so byte offsets line up
        if text.len() >= prefix.len()
            && text.is_char_boundary(prefix.len())
            && text[..prefix.len()].eq_ignore_ascii_case(prefix)
        {
            return text[prefix.len()..].trim_start();
        }
    }
    text
}

fn strip_quotes(text: &str) -> &str {
    let mut text = text.trim();
    // Some models double-wrap, e.g. `"「こんにちは」"`
    loop {
        let Some((inner, open, close)) = QUOTE_PAIRS.iter().find_map(|&(open, close)| {
            let inner = text.strip_prefix(open)?.strip_suffix(close)?;
            Some((inner, open, close))
        }) else {
            return text;
        };

        // Leave `"a" and "b"` alone: stripping would unbalance the inner quotes
        if inner.contains(open) || inner.contains(close) {
            return text;
        }
        text = inner.trim();
    }
}
