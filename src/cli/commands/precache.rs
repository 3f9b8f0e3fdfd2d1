//! Precache command implementation.
//!
//! Runs only the live tier, so nothing is printed from the cache or the
//! bundle. Reports which resources moved to a new version.

use crate::cli::args::PrecacheArgs;
use crate::config::format_duration;
use crate::discovery::LocaleDiscovery;
use crate::error::Result;
use crate::fallback::ContentService;
use crate::resource::ResourceKind;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Warms the cache for one language or every published locale.
pub struct PrecacheCommand<'a> {
    service: &'a ContentService,
    language: String,
    args: PrecacheArgs,
}

impl<'a> PrecacheCommand<'a> {
    pub fn new(service: &'a ContentService, language: String, args: PrecacheArgs) -> Self {
        Self {
            service,
            language,
            args,
        }
    }

    fn languages(&self) -> Vec<String> {
        if !self.args.all_locales {
            return vec![self.language.clone()];
        }

        match LocaleDiscovery::for_service(self.service) {
            Some(discovery) => discovery.discover(),
            None => vec![self.service.default_language().to_string()],
        }
    }

    fn kinds(&self) -> Vec<ResourceKind> {
        match self.args.kind {
            Some(kind) => vec![kind],
            None => ResourceKind::ALL.to_vec(),
        }
    }

    fn warn_rate_limited(&self, ui: &mut dyn UserInterface) {
        match self.service.rate_limit_reset_at() {
            Some(reset_at) => ui.warning(&format!(
                "Rate limited for another {}; remaining resources skipped",
                format_duration(reset_at - chrono::Utc::now())
            )),
            None => ui.warning("Rate limited; remaining resources skipped"),
        }
    }
}

impl Command for PrecacheCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.service.is_rate_limited() {
            self.warn_rate_limited(ui);
            return Ok(CommandResult::success());
        }

        let cache = self.service.cache();
        let mut updated = 0;

        'languages: for language in self.languages() {
            for kind in self.kinds() {
                let before = cache.latest_cached_info(kind, &language);
                self.service.pre_cache(kind, &language);
                let after = cache.latest_cached_info(kind, &language);

                match after {
                    Some(info) if Some(&info) != before.as_ref() => {
                        updated += 1;
                        ui.success(&format!(
                            "{} ({}) updated to {}",
                            kind,
                            language,
                            crate::repository::short_hash(&info.commit_hash)
                        ));
                    }
                    Some(_) => ui.message(&format!("  {} ({}) up to date", kind, language)),
                    None => ui.message(&format!("  {} ({}) not cached", kind, language)),
                }

                if self.service.is_rate_limited() {
                    self.warn_rate_limited(ui);
                    break 'languages;
                }
            }
        }

        ui.message(&format!("{} resource(s) updated", updated));
        Ok(CommandResult::success())
    }
}
