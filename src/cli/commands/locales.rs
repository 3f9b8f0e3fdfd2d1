//! Locales command implementation.

use crate::discovery::LocaleDiscovery;
use crate::error::Result;
use crate::fallback::ContentService;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Lists available locales, one per line. The current language is marked
/// with `*`.
pub struct LocalesCommand<'a> {
    service: &'a ContentService,
    current: String,
}

impl<'a> LocalesCommand<'a> {
    pub fn new(service: &'a ContentService, current: impl Into<String>) -> Self {
        Self {
            service,
            current: current.into(),
        }
    }
}

impl Command for LocalesCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.service.is_rate_limited() {
            ui.warning("Rate limited; only the default language is listed");
        }

        let locales = match LocaleDiscovery::for_service(self.service) {
            Some(discovery) => discovery.discover(),
            None => vec![self.service.default_language().to_string()],
        };

        for locale in locales {
            let marker = if locale == self.current { "*" } else { " " };
            ui.output(&format!("{} {}", marker, locale));
        }

        Ok(CommandResult::success())
    }
}
