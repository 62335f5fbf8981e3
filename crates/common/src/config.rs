//! Scene configuration.
//!
//! Every field defaults to the constants the scene was tuned with, so an
//! empty YAML document (or no file at all) yields the stock scene.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a [`SceneConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid range for {field}: [{min}, {max}) must be finite and non-empty")]
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },
    #[error("sky must contain at least one cloud")]
    EmptySky,
}

/// Half-open interval `[min, max)` of `f32`.
///
/// Used both as a sampling range for randomized layout and as a target range
/// for remapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Uniform draw from `[min, max)`. The span must be validated first.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        rng.gen_range(self.min..self.max)
    }

    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v < self.max
    }

    /// Both ends and the width must be finite, or sampling panics.
    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        let finite =
            self.min.is_finite() && self.max.is_finite() && (self.max - self.min).is_finite();
        if finite && self.min < self.max {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                field,
                min: self.min as f64,
                max: self.max as f64,
            })
        }
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

/// Half-open integer interval `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountSpan {
    pub min: u32,
    pub max: u32,
}

impl CountSpan {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min..self.max)
    }

    pub fn contains(&self, v: u32) -> bool {
        v >= self.min && v < self.max
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min < self.max {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                field,
                min: self.min as f64,
                max: self.max as f64,
            })
        }
    }
}

/// Per-frame increments of the animation drivers, in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverRates {
    pub sea_spin: f32,
    pub sky_spin: f32,
    pub propeller_spin: f32,
    pub hair_phase_step: f32,
}

impl Default for DriverRates {
    fn default() -> Self {
        Self {
            sea_spin: 0.005,
            sky_spin: 0.01,
            propeller_spin: 0.3,
            hair_phase_step: 0.16,
        }
    }
}

/// Sampling ranges for the per-vertex wave descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub amplitude: Span,
    /// Angular speed in radians per frame.
    pub speed: Span,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            amplitude: Span::new(5.0, 20.0),
            speed: Span::new(0.016, 0.048),
        }
    }
}

/// Region the airplane may occupy, in scene units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightEnvelope {
    pub x: Span,
    pub y: Span,
}

impl Default for FlightEnvelope {
    fn default() -> Self {
        Self {
            x: Span::new(-100.0, 100.0),
            y: Span::new(25.0, 175.0),
        }
    }
}

/// Layout of the cloud ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    pub cloud_count: u32,
    pub radius: Span,
    pub depth: Span,
    pub scale: Span,
    /// Number of blocks per cloud.
    pub cloud_blocks: CountSpan,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            cloud_count: 20,
            radius: Span::new(750.0, 950.0),
            depth: Span::new(-800.0, -400.0),
            scale: Span::new(1.0, 3.0),
            cloud_blocks: CountSpan::new(3, 5),
        }
    }
}

/// Top-level scene configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Seed for every randomized layout decision.
    pub seed: u64,
    pub drivers: DriverRates,
    pub waves: WaveConfig,
    pub flight: FlightEnvelope,
    pub sky: SkyConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            drivers: DriverRates::default(),
            waves: WaveConfig::default(),
            flight: FlightEnvelope::default(),
            sky: SkyConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Read a YAML config file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check that every range is finite and non-empty and every rate finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("drivers.sea_spin", self.drivers.sea_spin)?;
        finite("drivers.sky_spin", self.drivers.sky_spin)?;
        finite("drivers.propeller_spin", self.drivers.propeller_spin)?;
        finite("drivers.hair_phase_step", self.drivers.hair_phase_step)?;
        self.waves.amplitude.validate("waves.amplitude")?;
        self.waves.speed.validate("waves.speed")?;
        self.flight.x.validate("flight.x")?;
        self.flight.y.validate("flight.y")?;
        self.sky.radius.validate("sky.radius")?;
        self.sky.depth.validate("sky.depth")?;
        self.sky.scale.validate("sky.scale")?;
        self.sky.cloud_blocks.validate("sky.cloud_blocks")?;
        if self.sky.cloud_count == 0 {
            return Err(ConfigError::EmptySky);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.drivers.sea_spin, 0.005);
        assert_eq!(config.sky.cloud_count, 20);
        assert_eq!(config.flight.y, Span::new(25.0, 175.0));
    }

    #[test]
    fn empty_document_yields_defaults() {
        let config = SceneConfig::from_yaml("{}").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn partial_document_overrides_only_named_fields() {
        let config = SceneConfig::from_yaml("seed: 7\ndrivers:\n  sky_spin: 0.02\n").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.drivers.sky_spin, 0.02);
        assert_eq!(config.drivers.sea_spin, 0.005);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let yaml = "waves:\n  amplitude: { min: 20.0, max: 5.0 }\n";
        let err = SceneConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidRange {
                field: "waves.amplitude",
                ..
            }
        ));
    }

    #[test]
    fn overflowing_width_is_rejected() {
        let err = SceneConfig::from_yaml("sky:\n  depth: { min: -3.0e38, max: 3.0e38 }\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidRange {
                field: "sky.depth",
                ..
            }
        ));
    }

    #[test]
    fn infinite_bound_is_rejected() {
        let err = SceneConfig::from_yaml("waves:\n  amplitude: { min: 5.0, max: .inf }\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidRange {
                field: "waves.amplitude",
                ..
            }
        ));
    }

    #[test]
    fn nan_rate_is_rejected() {
        let err = SceneConfig::from_yaml("drivers:\n  sky_spin: .nan\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonFinite {
                field: "drivers.sky_spin",
                ..
            }
        ));
    }

    #[test]
    fn empty_sky_is_rejected() {
        let err = SceneConfig::from_yaml("sky:\n  cloud_count: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::EmptySky));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let yaml = SceneConfig {
            seed: 99,
            ..SceneConfig::default()
        }
        .to_yaml()
        .unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let loaded = SceneConfig::load(file.path()).unwrap();
        assert_eq!(loaded.seed, 99);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SceneConfig::load("/nonexistent/aviator.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn span_samples_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        let span = Span::new(0.016, 0.048);
        let blocks = CountSpan::new(3, 5);
        for _ in 0..1000 {
            assert!(span.contains(span.sample(&mut rng)));
            assert!(blocks.contains(blocks.sample(&mut rng)));
        }
    }
}
