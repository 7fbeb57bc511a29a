use std::path::PathBuf;

use storage::json::DEFAULT_RESPONSES_FILE;

use crate::config_service::DEFAULT_CONFIG_FILE;

pub const RESPONSES_PATH_ENV: &str = "REVIEW_RESPONSES_PATH";
pub const CONFIG_PATH_ENV: &str = "REVIEW_CONFIG_PATH";

/// File locations the app runs against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewSettings {
    pub responses_path: PathBuf,
    pub config_path: PathBuf,
}

impl Default for ReviewSettings {
    fn default() -> Self {
        Self {
            responses_path: PathBuf::from(DEFAULT_RESPONSES_FILE),
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
        }
    }
}

impl ReviewSettings {
    /// Defaults overridden by `REVIEW_RESPONSES_PATH` and `REVIEW_CONFIG_PATH`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let path = |key: &str, fallback: PathBuf| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .map_or(fallback, PathBuf::from)
        };
        Self {
            responses_path: path(RESPONSES_PATH_ENV, defaults.responses_path),
            config_path: path(CONFIG_PATH_ENV, defaults.config_path),
        }
    }

    /// Apply explicit overrides, e.g. from command-line flags.
    #[must_use]
    pub fn with_overrides(
        mut self,
        responses_path: Option<PathBuf>,
        config_path: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = responses_path {
            self.responses_path = path;
        }
        if let Some(path) = config_path {
            self.config_path = path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_values_override_defaults_and_blanks_are_ignored() {
        let settings = ReviewSettings::from_lookup(|key| match key {
            RESPONSES_PATH_ENV => Some("/data/answers.json".into()),
            CONFIG_PATH_ENV => Some("  ".into()),
            _ => None,
        });
        assert_eq!(settings.responses_path, PathBuf::from("/data/answers.json"));
        assert_eq!(settings.config_path, PathBuf::from("papers_config.json"));
    }

    #[test]
    fn flags_win_over_env() {
        let settings = ReviewSettings::default()
            .with_overrides(Some("cli.json".into()), None);
        assert_eq!(settings.responses_path, PathBuf::from("cli.json"));
        assert_eq!(settings.config_path, PathBuf::from("papers_config.json"));
    }
}
