//! Configuration loading from latbench.toml
//!
//! Sampling bounds can be kept in a `latbench.toml` file in the project root.
//! The file is discovered by walking up from the current directory; any key
//! that is missing falls back to the engine defaults.

use latbench_core::{
    DEFAULT_DISCARD_FIRST, DEFAULT_MAX_DURATION, DEFAULT_MIN_SAMPLES, SamplerConfig, WallClock,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// File name looked up by [`BenchConfig::discover`]
pub const CONFIG_FILE_NAME: &str = "latbench.toml";

/// latbench file configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BenchConfig {
    /// Sampling bounds
    #[serde(default)]
    pub sampling: SamplingConfig,
}

/// `[sampling]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Samples always collected, regardless of time budget
    #[serde(default = "default_min_samples")]
    pub min_samples: u64,
    /// Sample ceiling (absent = unbounded)
    #[serde(default)]
    pub max_samples: Option<u64>,
    /// Time budget (e.g., "5s", "200ms"); "0s" means only `min_samples`
    #[serde(default = "default_max_duration")]
    pub max_duration: String,
    /// Warm-up iterations excluded from statistics
    #[serde(default = "default_discard_first")]
    pub discard_first: u64,
    /// Keep raw samples in results
    #[serde(default)]
    pub save_samples: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            min_samples: default_min_samples(),
            max_samples: None,
            max_duration: default_max_duration(),
            discard_first: default_discard_first(),
            save_samples: false,
        }
    }
}

fn default_min_samples() -> u64 {
    DEFAULT_MIN_SAMPLES
}
fn default_max_duration() -> String {
    format!("{}ms", DEFAULT_MAX_DURATION.as_millis())
}
fn default_discard_first() -> u64 {
    DEFAULT_DISCARD_FIRST
}

impl BenchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), error = %e, "ignoring unreadable config");
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# latbench configuration

[sampling]
# Samples always collected, even past the time budget
min_samples = 10
# Sample ceiling (uncomment to enable)
# max_samples = 1000
# Stop starting new samples after this long (once min_samples is met)
max_duration = "5s"
# Warm-up iterations executed but excluded from statistics
discard_first = 10
# Keep every raw sample in the results
save_samples = false
"#
        .to_string()
    }

    /// Convert into the engine configuration, validating bounds.
    pub fn sampler_config(&self) -> anyhow::Result<SamplerConfig<WallClock>> {
        let sampling = &self.sampling;
        if sampling.max_samples == Some(0) {
            anyhow::bail!("max_samples must be at least 1");
        }

        Ok(SamplerConfig {
            min_samples: sampling.min_samples,
            max_samples: sampling.max_samples,
            max_duration: Self::parse_duration(&sampling.max_duration)?,
            discard_first: sampling.discard_first,
            save_samples: sampling.save_samples,
            clock: WallClock,
        })
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m")
    pub fn parse_duration(s: &str) -> anyhow::Result<Duration> {
        let s = s.trim();
        if s.is_empty() {
            return Err(anyhow::anyhow!("Empty duration string"));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid duration number: {}", num_part))?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow::anyhow!("Duration must be a non-negative number: {}", s));
        }

        let multiplier: u64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1,
            "us" | "µs" => 1_000,
            "ms" => 1_000_000,
            "s" | "" => 1_000_000_000,
            "m" | "min" => 60_000_000_000,
            _ => return Err(anyhow::anyhow!("Unknown duration unit: {}", unit_part)),
        };

        Ok(Duration::from_nanos((value * multiplier as f64) as u64))
    }
}
