use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// How mode characters other than `m` and `M` are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModePolicy {
    /// Anything that is not `m` selects the major key.
    #[default]
    Lenient,
    /// Only `m` and `M` are accepted.
    Strict,
}

/// Output encoding used for analyses and per-query errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mode_policy: ModePolicy,
    pub format: OutputFormat,
    /// Whether to print the input prompt. Unset means "only for text output".
    pub show_prompt: Option<bool>,
}

impl AppConfig {
    /// Reads a JSON configuration file. Missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let config = serde_json::from_str(&raw)?;
        tracing::debug!(path = %path.as_ref().display(), ?config, "loaded configuration");
        Ok(config)
    }

    pub fn prompt_enabled(&self) -> bool {
        self.show_prompt
            .unwrap_or(self.format == OutputFormat::Text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_lenient_text_with_prompt() {
        let config = AppConfig::default();
        assert_eq!(config.mode_policy, ModePolicy::Lenient);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.prompt_enabled());
    }

    #[test]
    fn json_output_hides_prompt_unless_requested() {
        let mut config = AppConfig {
            format: OutputFormat::Json,
            ..AppConfig::default()
        };
        assert!(!config.prompt_enabled());

        config.show_prompt = Some(true);
        assert!(config.prompt_enabled());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"mode_policy":"strict"}"#).unwrap();
        assert_eq!(config.mode_policy, ModePolicy::Strict);
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.show_prompt, None);
    }

    #[test]
    fn loads_from_file() {
        let path = std::env::temp_dir().join(format!(
            "chord-table-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"format":"json","show_prompt":false}"#).unwrap();

        let config = AppConfig::from_path(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.show_prompt, Some(false));
    }

    #[test]
    fn malformed_file_is_a_json_error() {
        let path = std::env::temp_dir().join(format!(
            "chord-table-bad-config-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{ not json").unwrap();

        let result = AppConfig::from_path(&path);
        std::fs::remove_file(&path).unwrap();

        let err = result.unwrap_err();
        assert!(matches!(err, crate::ChordError::Json(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn rejects_unknown_policy() {
        let err = serde_json::from_str::<AppConfig>(r#"{"mode_policy":"loose"}"#);
        assert!(err.is_err());
    }
}
