//! Error taxonomy for translation requests.
//!
//! `Display` output is what callers see. Upstream diagnostics (provider status
//! bodies, transport errors) live in separate fields and only reach the logs.

use thiserror::Error;

use super::client::ModelError;

/// Which request field a language error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageField {
    Source,
    Target,
}

impl LanguageField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source_language",
            Self::Target => "target_language",
        }
    }
}

#[derive(Debug, Error)]
pub enum TranslateError {
    /// The request cannot be translated as given.
    #[error("{0}")]
    InvalidInput(String),

    /// A language identifier is not in the supported table.
    #[error(
        "Unsupported {} '{value}'. Supported languages: ar, zh, en, fr, de, it, ja, ko, pt, es \
         (codes or English names, any case)",
        field.as_str()
    )]
    UnsupportedLanguage { field: LanguageField, value: String },

    /// The model endpoint timed out or could not be reached.
    #[error("Translation service is unavailable, please retry later")]
    UpstreamUnavailable { diagnostic: String },

    /// The model answered with something we could not use.
    #[error("Translation service returned an invalid response")]
    UpstreamResponseInvalid { diagnostic: String },

    /// Anything unclassified.
    #[error("Internal error while translating")]
    Internal { diagnostic: String },
}

impl TranslateError {
    /// HTTP status code for this error.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) | Self::UnsupportedLanguage { .. } => 400,
            Self::UpstreamUnavailable { .. }
            | Self::UpstreamResponseInvalid { .. }
            | Self::Internal { .. } => 500,
        }
    }

    /// Short machine-readable name, used in logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::UnsupportedLanguage { .. } => "unsupported_language",
            Self::UpstreamUnavailable { .. } => "upstream_unavailable",
            Self::UpstreamResponseInvalid { .. } => "upstream_response_invalid",
            Self::Internal { .. } => "internal_error",
        }
    }

    /// Detail for logs. Never sent to callers.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::UpstreamUnavailable { diagnostic }
            | Self::UpstreamResponseInvalid { diagnostic }
            | Self::Internal { diagnostic } => Some(diagnostic),
            Self::InvalidInput(_) | Self::UnsupportedLanguage { .. } => None,
        }
    }
}

impl From<ModelError> for TranslateError {
    fn from(err: ModelError) -> Self {
        let diagnostic = err.to_string();
        match err {
            ModelError::Unavailable(_) => Self::UpstreamUnavailable { diagnostic },
            // Throttling and gateway failures are transient; the rest means
            // the provider rejected or garbled the exchange
            ModelError::Status { status, .. } if status == 429 || status >= 500 => {
                Self::UpstreamUnavailable { diagnostic }
            }
            ModelError::Status { .. } | ModelError::Malformed(_) => {
                Self::UpstreamResponseInvalid { diagnostic }
            }
            ModelError::Internal(_) => Self::Internal { diagnostic },
        }
    }
}
