use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, CONTEXT_HIGH_THRESHOLD, CONTEXT_LOOKAHEAD,
    CONTEXT_MATCH_THRESHOLD, DEFAULT_MAX_FACTOR, DEFAULT_TARGET_CHARS,
    SEQUENTIAL_MATCH_THRESHOLD, SLIP_LOOKAHEAD,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How digit sequences are spelled out before matching against ASR words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumeralStyle {
    Korean,
    Verbatim,
}

impl std::fmt::Display for NumeralStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumeralStyle::Korean => write!(f, "korean"),
            NumeralStyle::Verbatim => write!(f, "verbatim"),
        }
    }
}

impl std::str::FromStr for NumeralStyle {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "korean" => Ok(NumeralStyle::Korean),
            "verbatim" => Ok(NumeralStyle::Verbatim),
            other => Err(ConfigError::Invalid(format!(
                "numerals must be 'korean' or 'verbatim', got '{other}'"
            ))),
        }
    }
}

/// Tunables for the caption timing pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptionConfig {
    pub target_chars: usize,
    pub max_factor: f64,
    pub sequential_match_threshold: u8,
    pub slip_lookahead: usize,
    pub context_match_threshold: u8,
    pub context_high_threshold: u8,
    pub context_lookahead: usize,
    pub numerals: NumeralStyle,
    /// Worker threads for the batch; `None` uses all available cores.
    pub workers: Option<usize>,
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            target_chars: DEFAULT_TARGET_CHARS,
            max_factor: DEFAULT_MAX_FACTOR,
            sequential_match_threshold: SEQUENTIAL_MATCH_THRESHOLD,
            slip_lookahead: SLIP_LOOKAHEAD,
            context_match_threshold: CONTEXT_MATCH_THRESHOLD,
            context_high_threshold: CONTEXT_HIGH_THRESHOLD,
            context_lookahead: CONTEXT_LOOKAHEAD,
            numerals: NumeralStyle::Korean,
            workers: None,
        }
    }
}

impl CaptionConfig {
    /// Default location: `<config dir>/captionsync/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads the config from the default location, falling back to defaults
    /// when it is missing or unreadable.
    pub fn load() -> Self {
        Self::default_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_chars == 0 {
            return Err(ConfigError::Invalid("target_chars must be positive".into()));
        }
        if self.max_factor.is_nan() || self.max_factor < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "max_factor must be at least 1.0, got {}",
                self.max_factor
            )));
        }
        for (name, value) in [
            ("sequential_match_threshold", self.sequential_match_threshold),
            ("context_match_threshold", self.context_match_threshold),
            ("context_high_threshold", self.context_high_threshold),
        ] {
            if value > 100 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be between 0 and 100, got {value}"
                )));
            }
        }
        if self.workers == Some(0) {
            return Err(ConfigError::Invalid("workers must be at least 1".into()));
        }
        Ok(())
    }

    /// Worker count to use, resolving `None` to the available parallelism.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CaptionConfig::default();
        assert_eq!(config.target_chars, 30);
        assert_relative_eq!(config.max_factor, 1.8);
        assert_eq!(config.sequential_match_threshold, 90);
        assert_eq!(config.slip_lookahead, 2);
        assert_eq!(config.context_match_threshold, 75);
        assert_eq!(config.context_high_threshold, 90);
        assert_eq!(config.context_lookahead, 5);
        assert_eq!(config.numerals, NumeralStyle::Korean);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: CaptionConfig =
            serde_json::from_str(r#"{"target_chars": 20, "numerals": "verbatim"}"#).unwrap();
        assert_eq!(config.target_chars, 20);
        assert_eq!(config.numerals, NumeralStyle::Verbatim);
        assert_eq!(config.slip_lookahead, SLIP_LOOKAHEAD);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"context_lookahead": 3, "workers": 2}}"#).unwrap();
        let config = CaptionConfig::load_from(file.path()).unwrap();
        assert_eq!(config.context_lookahead, 3);
        assert_eq!(config.worker_count(), 2);
    }

    #[test]
    fn test_load_from_missing_file_errors() {
        let err = CaptionConfig::load_from(Path::new("/nonexistent/captionsync.json"));
        assert!(matches!(err, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_from_malformed_file_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = CaptionConfig::load_from(file.path());
        assert!(matches!(err, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CaptionConfig::default();
        config.target_chars = 0;
        assert!(config.validate().is_err());

        let mut config = CaptionConfig::default();
        config.max_factor = 0.5;
        assert!(config.validate().is_err());

        let mut config = CaptionConfig::default();
        config.context_high_threshold = 101;
        assert!(config.validate().is_err());

        let mut config = CaptionConfig::default();
        config.workers = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_numeral_style_from_str() {
        assert_eq!("korean".parse::<NumeralStyle>().unwrap(), NumeralStyle::Korean);
        assert_eq!(
            "verbatim".parse::<NumeralStyle>().unwrap(),
            NumeralStyle::Verbatim
        );
        assert!("roman".parse::<NumeralStyle>().is_err());
    }

    #[test]
    fn test_worker_count_defaults_to_available_cores() {
        let config = CaptionConfig::default();
        assert!(config.worker_count() >= 1);
    }
}
