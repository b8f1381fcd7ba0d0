use config::{Config, Environment, File};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Which grading strategy the session should use.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GradingMode {
    Embedding,
    Lexical,
}

/// Grading configuration, read once at session start and passed explicitly
/// into the grader factory. Never read again mid-session.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GradingConfig {
    pub mode: GradingMode,
    pub api_key: Option<String>,
}

impl Default for GradingConfig {
    fn default() -> Self {
        Self {
            mode: GradingMode::Lexical,
            api_key: None,
        }
    }
}

impl GradingConfig {
    /// Load from an optional `hireview.toml` plus `HIREVIEW_*` environment
    /// variables (e.g. `HIREVIEW_MODE=embedding`, `HIREVIEW_API_KEY=...`).
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("mode", "lexical")?
            .add_source(File::with_name("hireview").required(false))
            .add_source(Environment::with_prefix("HIREVIEW"))
            .build()?;

        Ok(settings.try_deserialize::<GradingConfig>()?)
    }

    /// The mode the session will actually run in. Embedding mode without an
    /// API key degrades to lexical rather than failing the session.
    pub fn effective_mode(&self) -> GradingMode {
        match self.mode {
            GradingMode::Embedding if self.api_key.is_none() => {
                warn!("Embedding mode requested but no API key configured, using lexical grading");
                GradingMode::Lexical
            }
            mode => mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_without_key_degrades_to_lexical() {
        let cfg = GradingConfig {
            mode: GradingMode::Embedding,
            api_key: None,
        };
        assert_eq!(cfg.effective_mode(), GradingMode::Lexical);
    }

    #[test]
    fn embedding_with_key_stays_embedding() {
        let cfg = GradingConfig {
            mode: GradingMode::Embedding,
            api_key: Some("sk-test".to_string()),
        };
        assert_eq!(cfg.effective_mode(), GradingMode::Embedding);
    }

    #[test]
    fn default_is_lexical() {
        assert_eq!(GradingConfig::default().effective_mode(), GradingMode::Lexical);
    }
}
