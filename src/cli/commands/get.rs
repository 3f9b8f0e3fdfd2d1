//! Get command implementation.

use crate::cli::args::GetArgs;
use crate::error::Result;
use crate::fallback::{ContentService, Tier};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Prints one resource.
///
/// Always prints something. Exits with 1 when only the placeholder was
/// available.
pub struct GetCommand<'a> {
    service: &'a ContentService,
    language: String,
    args: GetArgs,
}

impl<'a> GetCommand<'a> {
    pub fn new(service: &'a ContentService, language: String, args: GetArgs) -> Self {
        Self {
            service,
            language,
            args,
        }
    }
}

impl Command for GetCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let kind = self.args.kind;
        let (content, tier) = self.service.get_content_with_tier(kind, &self.language);

        if self.args.show_tier {
            ui.message(&format!("{} ({}) from {} tier", kind, self.language, tier));
        }

        ui.output(&content);

        if tier == Tier::Placeholder {
            ui.error(&format!("No {} content available for {}", kind, self.language));
            return Ok(CommandResult::failure(1));
        }

        Ok(CommandResult::success())
    }
}
