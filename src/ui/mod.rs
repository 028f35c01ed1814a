//! Terminal styling for CLI output.

mod theme;

pub use theme::Style;
