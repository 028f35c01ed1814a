//! Consistent styling utilities for CLI output.
//!
//! Provides color and formatting helpers using owo-colors.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Styles for different semantic elements.
pub struct Style;

impl Style {
    /// Style for section headers (e.g., "Supported languages")
    pub fn header<T: Display>(text: T) -> String {
        format!("{}", text.bold())
    }

    /// Style for labels/keys (e.g., "model_id", "listen")
    pub fn label<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Style for primary values (e.g., model ids, endpoints)
    pub fn value<T: Display>(text: T) -> String {
        format!("{}", text.cyan())
    }

    /// Style for secondary/supplementary info (e.g., language names)
    pub fn secondary<T: Display>(text: T) -> String {
        format!("{}", text.dimmed())
    }

    /// Style for error messages
    pub fn error<T: Display>(text: T) -> String {
        format!("{}", text.red().bold())
    }

    /// Style for language codes
    pub fn code<T: Display>(text: T) -> String {
        format!("{}", text.yellow())
    }
}
