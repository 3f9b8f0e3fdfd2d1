//! Configuration validation rules.
//!
//! This module validates configuration for correctness:
//! - Repository descriptors need an owner, a name, a branch and a valid host
//! - URL overrides must parse
//! - Grace periods and the HTTP timeout must be valid durations
//! - Languages must not be empty

use crate::config::duration::parse_duration;
use crate::config::schema::{ContentConfig, RepositoryDescriptor};
use crate::error::{ContentError, Result};
use reqwest::Url;

/// Validation error with context.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Rule identifier
    pub rule: String,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    fn new(rule: &str, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Validate a configuration and return all errors.
pub fn validate_config(config: &ContentConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    errors.extend(validate_repository("translations", &config.translations));
    errors.extend(validate_repository("documentation", &config.documentation));
    errors.extend(validate_durations(config));
    errors.extend(validate_settings(config));

    errors
}

/// Validate one repository descriptor.
pub fn validate_repository(name: &str, repo: &RepositoryDescriptor) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (field, value) in [
        ("owner", &repo.owner),
        ("repository", &repo.repository),
        ("branch", &repo.branch),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::new(
                "empty-field",
                format!("Repository '{}' has an empty {}", name, field),
            ));
        }
    }

    if Url::parse(&repo.host).is_err() {
        errors.push(ValidationError::new(
            "invalid-host",
            format!("Repository '{}' has an invalid host '{}'", name, repo.host),
        ));
    }

    for (field, value) in [("api_url", &repo.api_url), ("raw_url", &repo.raw_url)] {
        if let Some(url) = value {
            if Url::parse(url).is_err() {
                errors.push(ValidationError::new(
                    "invalid-url",
                    format!("Repository '{}' has an invalid {} '{}'", name, field, url),
                ));
            }
        }
    }

    errors
}

fn validate_durations(config: &ContentConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (kind, value) in &config.grace_periods {
        match parse_duration(value) {
            Ok(d) if d.num_seconds() < 0 => errors.push(ValidationError::new(
                "negative-duration",
                format!("Grace period for '{}' must not be negative", kind),
            )),
            Ok(_) => {}
            Err(_) => errors.push(ValidationError::new(
                "invalid-duration",
                format!("Grace period for '{}' is not a duration: '{}'", kind, value),
            )),
        }
    }

    match parse_duration(&config.http.timeout) {
        Ok(d) if d.num_seconds() <= 0 => errors.push(ValidationError::new(
            "invalid-timeout",
            "HTTP timeout must be positive",
        )),
        Ok(_) => {}
        Err(_) => errors.push(ValidationError::new(
            "invalid-timeout",
            format!("HTTP timeout is not a duration: '{}'", config.http.timeout),
        )),
    }

    errors
}

fn validate_settings(config: &ContentConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if config.settings.language.trim().is_empty() {
        errors.push(ValidationError::new("empty-language", "Language is empty"));
    }
    if config.settings.default_language.trim().is_empty() {
        errors.push(ValidationError::new(
            "empty-language",
            "Default language is empty",
        ));
    }

    errors
}

/// Validate and return Result.
pub fn validate(config: &ContentConfig) -> Result<()> {
    let errors = validate_config(config);

    if errors.is_empty() {
        Ok(())
    } else {
        let messages: Vec<_> = errors.iter().map(|e| e.message.clone()).collect();
        Err(ContentError::ConfigValidationError {
            message: messages.join("; "),
        })
    }
}
