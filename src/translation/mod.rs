mod cleanup;
mod client;
mod error;
mod language;
mod oci;
mod prompt;
mod signer;
mod translator;

pub use cleanup::{Reply, clean_reply};
pub use client::{ModelClient, ModelError, OciAuth, OciChatClient, OciSettings};
pub use error::{LanguageField, TranslateError};
pub use language::{SUPPORTED_LANGUAGES, SupportedLanguage, print_languages, resolve_language};
pub use prompt::{Prompt, build_system_prompt};
pub use signer::{RequestSigner, SignedHeaders};
pub use translator::{TranslationRequest, TranslationResult, Translator};
