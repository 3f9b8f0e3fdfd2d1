//! Terminal output for the CLI.
//!
//! - [`UserInterface`] trait so commands can be tested with [`MockUI`]
//! - [`TerminalUI`] writes styled lines with `console`
//! - [`ContentTheme`] holds the styles

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, ContentTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Write primary output (resource text, JSON). Shown in every mode.
    fn output(&mut self, text: &str);

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show a `key: value` line.
    fn key_value(&mut self, key: &str, value: &str);
}
