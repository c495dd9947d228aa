use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use crate::error::{NebulaError, Result};
use crate::page::PageTimings;
use crate::particles::STAR_COUNT;

pub const DEFAULT_CONFIG_FILE: &str = "nebula.toml";

/// Runtime settings, read once at startup from `nebula.toml` and then
/// overridden by command-line flags.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: String,
    pub base_url: Option<String>,
    pub width: usize,
    pub height: usize,
    pub particle_count: usize,
    pub target_fps: usize,
    pub carousel_period_ms: u64,
    pub typing_start_delay_ms: u64,
    pub typing_period_ms: u64,
    pub typing_samples: usize,
    pub backdrop_delay_ms: u64,
    pub seed: Option<u64>,
    pub headless: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data: "data.json".to_string(),
            base_url: None,
            width: 1000,
            height: 800,
            particle_count: STAR_COUNT,
            target_fps: 60,
            carousel_period_ms: 5000,
            typing_start_delay_ms: 3000,
            typing_period_ms: 2000,
            typing_samples: 5,
            backdrop_delay_ms: 1500,
            seed: None,
            headless: false,
        }
    }
}

impl Config {
    pub fn parse(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Sizes and periods must be non-zero; a zero period would never let a
    /// timer fall behind its deadline.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("width", self.width as u64),
            ("height", self.height as u64),
            ("target_fps", self.target_fps as u64),
            ("carousel_period_ms", self.carousel_period_ms),
            ("typing_period_ms", self.typing_period_ms),
        ];
        match checks.iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(NebulaError::ConfigValue(format!("{name} must be greater than 0"))),
            None => Ok(()),
        }
    }

    /// An explicit path must exist. Without one, `nebula.toml` in the working
    /// directory is used when present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    debug!("no {DEFAULT_CONFIG_FILE}, using defaults");
                    return Ok(Config::default());
                }
                fallback
            }
        };

        debug!(path = %path.display(), "loading config");
        let text = std::fs::read_to_string(&path)?;
        Config::parse(&text)
    }

    pub fn timings(&self) -> PageTimings {
        PageTimings {
            carousel_period: Duration::from_millis(self.carousel_period_ms),
            typing_start_delay: Duration::from_millis(self.typing_start_delay_ms),
            typing_period: Duration::from_millis(self.typing_period_ms),
            typing_samples: self.typing_samples,
            backdrop_delay: Duration::from_millis(self.backdrop_delay_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn partial_file_overrides_fields() {
        let config = Config::parse(
            r#"
            data = "books.json"
            base_url = "http://localhost:8080/"
            particle_count = 500
            carousel_period_ms = 1000
            "#,
        )
        .unwrap();
        assert_eq!(config.data, "books.json");
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/"));
        assert_eq!(config.particle_count, 500);
        assert_eq!(config.timings().carousel_period, Duration::from_secs(1));
        assert_eq!(config.width, 1000);
    }

    #[test]
    fn bad_types_are_rejected() {
        assert!(matches!(
            Config::parse("width = \"wide\""),
            Err(NebulaError::Config(_))
        ));
    }

    #[test]
    fn zero_periods_and_sizes_are_rejected() {
        for text in [
            "carousel_period_ms = 0",
            "typing_period_ms = 0",
            "width = 0",
            "height = 0",
            "target_fps = 0",
        ] {
            let field = text.split(' ').next().unwrap();
            match Config::parse(text) {
                Err(NebulaError::ConfigValue(msg)) => assert!(msg.contains(field), "{msg}"),
                other => panic!("{text}: expected rejection, got {other:?}"),
            }
        }
    }

    #[test]
    fn validate_checks_in_memory_values() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());
        config.carousel_period_ms = 0;
        assert!(matches!(config.validate(), Err(NebulaError::ConfigValue(_))));
    }

    #[test]
    fn load_reads_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "headless = true\nseed = 9").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.headless);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = Config::load(Some(Path::new("/no/such/nebula.toml"))).unwrap_err();
        assert!(matches!(err, NebulaError::Io(_)));
    }

    #[test]
    fn default_timings_match_page_defaults() {
        assert_eq!(Config::default().timings(), PageTimings::default());
    }
}
