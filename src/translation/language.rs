//! Supported languages and identifier resolution.

use serde::Serialize;

use crate::ui::Style;

/// A language the service accepts as a source or target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SupportedLanguage {
    /// ISO 639-1 code.
    pub code: &'static str,
    /// English display name, used in prompts.
    pub name: &'static str,
}

/// Supported language codes (ISO 639-1) and their names.
pub const SUPPORTED_LANGUAGES: &[SupportedLanguage] = &[
    SupportedLanguage { code: "ar", name: "Arabic" },
    SupportedLanguage { code: "zh", name: "Chinese" },
    SupportedLanguage { code: "en", name: "English" },
    SupportedLanguage { code: "fr", name: "French" },
    SupportedLanguage { code: "de", name: "German" },
    SupportedLanguage { code: "it", name: "Italian" },
    SupportedLanguage { code: "ja", name: "Japanese" },
    SupportedLanguage { code: "ko", name: "Korean" },
    SupportedLanguage { code: "pt", name: "Portuguese" },
    SupportedLanguage { code: "es", name: "Spanish" },
];

/// Looks up a language by code or display name.
///
/// Matching ignores ASCII case and surrounding whitespace, so `"ES"`,
/// `"spanish"` and `" Spanish "` all resolve to the same entry.
pub fn resolve_language(identifier: &str) -> Option<&'static SupportedLanguage> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return None;
    }

    SUPPORTED_LANGUAGES.iter().find(|lang| {
        lang.code.eq_ignore_ascii_case(identifier) || lang.name.eq_ignore_ascii_case(identifier)
    })
}

/// Prints all supported languages to stdout.
pub fn print_languages() {
    println!("{}", Style::header("Supported languages"));
    for lang in SUPPORTED_LANGUAGES {
        println!("  {:5} {}", Style::code(lang.code), Style::secondary(lang.name));
    }
}
