//! Status command implementation.

use chrono::Utc;

use crate::cli::args::StatusArgs;
use crate::config::format_duration;
use crate::error::Result;
use crate::fallback::ContentService;
use crate::freshness::Freshness;
use crate::repository::short_hash;
use crate::resource::ResourceKind;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// Shows what each resource would be served from.
pub struct StatusCommand<'a> {
    service: &'a ContentService,
    language: String,
    args: StatusArgs,
}

impl<'a> StatusCommand<'a> {
    pub fn new(service: &'a ContentService, language: String, args: StatusArgs) -> Self {
        Self {
            service,
            language,
            args,
        }
    }

    fn describe_local(&self, kind: ResourceKind) -> String {
        if let Some(info) = self.service.cache().latest_cached_info(kind, &self.language) {
            return format!(
                "cached {} ({})",
                short_hash(&info.commit_hash),
                info.commit_date.format("%Y-%m-%d %H:%M")
            );
        }

        if self.service.bundled().contains(kind, &self.language) {
            "embedded".to_string()
        } else {
            format!("falls back to {}", self.service.default_language())
        }
    }

    fn describe_remote(&self, kind: ResourceKind) -> String {
        match self.service.freshness().evaluate(kind, &self.language) {
            Freshness::Unknown => "remote unknown".to_string(),
            Freshness::TooRecent(c) => format!("remote {} still settling", c.short_hash()),
            Freshness::Current(_) => "up to date".to_string(),
            Freshness::Stale(c) => format!("update available ({})", c.short_hash()),
        }
    }
}

impl Command for StatusCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        ui.show_header("Content status");

        ui.key_value("Language", &self.language);
        ui.key_value("Default language", self.service.default_language());
        ui.key_value(
            "Cache",
            &self.service.cache().root().display().to_string(),
        );

        let rate_limit = match self.service.rate_limit_reset_at() {
            Some(reset_at) => format!(
                "limited until {} ({} left)",
                reset_at.format("%H:%M:%S UTC"),
                format_duration(reset_at - Utc::now())
            ),
            None => "ok".to_string(),
        };
        ui.key_value("Rate limit", &rate_limit);

        ui.message("");
        for kind in ResourceKind::ALL {
            let mut line = self.describe_local(kind);
            if self.args.check_remote {
                line = format!("{}, {}", line, self.describe_remote(kind));
            }
            ui.key_value(kind.slug(), &line);
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support;
    use super::*;
    use crate::bundled::StaticResources;
    use crate::repository::fake::FakeRepository;
    use crate::ui::MockUI;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;
    use tempfile::TempDir;

    #[test]
    fn shows_local_sources() {
        let temp = TempDir::new().unwrap();
        let fake = Arc::new(FakeRepository::new());
        let service = test_support::service(
            &temp,
            &fake,
            StaticResources::new().with(ResourceKind::Readme, "fr-FR", "# Lisez-moi"),
        );
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        service
            .cache()
            .save_to_cache(ResourceKind::Locale, "fr-FR", "{}", "abc1234ff", date)
            .unwrap();
        let cmd = StatusCommand::new(&service, "fr-FR".to_string(), StatusArgs::default());
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert_eq!(ui.value_of("locale"), Some("cached abc1234 (2024-03-01 12:30)"));
        assert_eq!(ui.value_of("readme"), Some("embedded"));
        assert_eq!(ui.value_of("product-terms"), Some("falls back to en-US"));
        assert_eq!(ui.value_of("Rate limit"), Some("ok"));
        assert_eq!(fake.calls(), 0);
    }

    #[test]
    fn check_remote_reports_pending_update() {
        let temp = TempDir::new().unwrap();
        let fake = Arc::new(FakeRepository::new().with_file(
            "Languages/fr-FR/launcher-terms.md",
            "def4567aa",
            Utc::now() - Duration::hours(1),
            "new terms",
        ));
        let service = test_support::service(&temp, &fake, StaticResources::new());
        let args = StatusArgs {
            lang: None,
            check_remote: true,
        };
        let cmd = StatusCommand::new(&service, "fr-FR".to_string(), args);
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert_eq!(
            ui.value_of("launcher-terms"),
            Some("falls back to en-US, update available (def4567)")
        );
        assert_eq!(fake.downloads(), 0);
    }

    #[test]
    fn shows_active_rate_limit() {
        let temp = TempDir::new().unwrap();
        let fake = Arc::new(FakeRepository::new());
        let service = test_support::service(&temp, &fake, StaticResources::new());
        service.limiter().handle_rate_limit();
        let cmd = StatusCommand::new(&service, "en-US".to_string(), StatusArgs::default());
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        assert!(ui.value_of("Rate limit").unwrap().starts_with("limited until"));
    }
}
