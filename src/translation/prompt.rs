pub const SYSTEM_PROMPT_TEMPLATE: &str = "You are a professional translator who translates input messages \
     {source_clause}to {target_language}. \
     You must reply only with the translation; nothing else. No quotes, no notes, no explanations. \
     If no literal translation exists, provide an alternative with the best meaning. \
     If it is not possible to offer any translation, reply with a message starting with ERROR \
     and explain the problem inside [], for example \
     'ERROR: [The input message does not contain any words or sentences to translate.]'. \
     The error message must be in English.";

const AUTO_DETECT_CLAUSE: &str = "from whatever language they are written in ";

/// Builds the system prompt for one request.
///
/// `source_language` is a canonical display name; when absent the model is told
/// to detect the source language itself.
#[allow(clippy::literal_string_with_formatting_args)]
pub fn build_system_prompt(target_language: &str, source_language: Option<&str>) -> String {
    // {placeholders} are for string replacement, not format arguments
    let source_clause =
        source_language.map_or_else(|| AUTO_DETECT_CLAUSE.to_string(), |s| format!("from {s} "));

    SYSTEM_PROMPT_TEMPLATE
        .replace("{source_clause}", &source_clause)
        .replace("{target_language}", target_language)
}

/// The two halves of a chat prompt sent to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Instructions for the model.
    pub system: String,
    /// The literal text to translate.
    pub user: String,
}

impl Prompt {
    pub fn for_translation(text: &str, target_language: &str, source_language: Option<&str>) -> Self {
        Self {
            system: build_system_prompt(target_language, source_language),
            user: text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_system_prompt_with_source() {
        let prompt = build_system_prompt("Spanish", Some("English"));
        assert!(prompt.contains("from English to Spanish"));
        assert!(prompt.contains("reply only with the translation"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_build_system_prompt_auto_detect() {
        let prompt = build_system_prompt("Japanese", None);
        assert!(prompt.contains("whatever language"));
        assert!(prompt.contains("to Japanese"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_build_system_prompt_is_deterministic() {
        assert_eq!(
            build_system_prompt("French", Some("German")),
            build_system_prompt("French", Some("German"))
        );
    }

    #[test]
    fn test_system_prompt_template_has_placeholders() {
        assert!(SYSTEM_PROMPT_TEMPLATE.contains("{target_language}"));
        assert!(SYSTEM_PROMPT_TEMPLATE.contains("{source_clause}"));
    }

    #[test]
    fn test_prompt_keeps_text_verbatim() {
        let prompt = Prompt::for_translation("  Hello {world}\n", "Korean", None);
        assert_eq!(prompt.user, "  Hello {world}\n");
        assert!(prompt.system.contains("Korean"));
    }
}
