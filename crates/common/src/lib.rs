//! Shared types for the aviator scene: transforms, colors and configuration.

pub mod config;
mod types;

pub use config::{
    ConfigError, CountSpan, DriverRates, FlightEnvelope, SceneConfig, SkyConfig, Span, WaveConfig,
};
pub use types::{Color, Transform, palette};
