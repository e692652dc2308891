//! Reproducible description of a rendered swarm.
//!
//! A [`Scene`] captures everything needed to recreate a frame: the text,
//! canvas size, pixel ratio, PRNG seed, tick count, mode, pointer and
//! configuration overrides. Two identical scenes fed through the same surface
//! produce the same swarm.

use serde::{Deserialize, Serialize};

use crate::config::FieldConfig;
use crate::error::SwarmError;
use crate::integrate::Mode;
use crate::state::CanvasSize;

/// Text rendered when none is given.
pub const DEFAULT_TEXT: &str = "SOLACE";

fn default_pixel_ratio() -> f64 {
    1.0
}

fn default_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    pub text: String,
    /// Layout width in CSS pixels.
    pub width: usize,
    /// Layout height in CSS pixels.
    pub height: usize,
    #[serde(default = "default_pixel_ratio")]
    pub pixel_ratio: f64,
    pub seed: u64,
    #[serde(default)]
    pub steps: usize,
    #[serde(default)]
    pub mode: Mode,
    /// Pointer in layout pixels; `None` when the pointer is off the field.
    #[serde(default)]
    pub pointer: Option<(f64, f64)>,
    #[serde(default = "default_params")]
    pub params: serde_json::Value,
}

impl Scene {
    /// Creates a scene with default params, ratio 1, no steps, chaotic mode.
    pub fn new(text: &str, width: usize, height: usize, seed: u64) -> Self {
        Self {
            text: text.to_string(),
            width,
            height,
            pixel_ratio: default_pixel_ratio(),
            seed,
            steps: 0,
            mode: Mode::default(),
            pointer: None,
            params: default_params(),
        }
    }

    /// Canvas size in both coordinate spaces.
    pub fn canvas_size(&self) -> CanvasSize {
        CanvasSize::from_layout(self.width as f64, self.height as f64, self.pixel_ratio)
    }

    /// Field configuration with this scene's overrides applied.
    pub fn config(&self) -> FieldConfig {
        FieldConfig::from_json(&self.params)
    }

    /// Checks dimensions, pixel ratio, text and configuration.
    pub fn validate(&self) -> Result<(), SwarmError> {
        if self.width == 0 || self.height == 0 {
            return Err(SwarmError::InvalidDimensions);
        }
        if !(self.pixel_ratio.is_finite() && self.pixel_ratio > 0.0) {
            return Err(SwarmError::invalid_param(
                "pixel_ratio",
                format!("must be positive, got {}", self.pixel_ratio),
            ));
        }
        let size = self.canvas_size();
        size.device_width
            .checked_mul(size.device_height)
            .filter(|&n| n > 0)
            .ok_or(SwarmError::InvalidDimensions)?;
        if self.text.trim().is_empty() {
            return Err(SwarmError::EmptyText);
        }
        self.config().validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_has_expected_defaults() {
        let s = Scene::new(DEFAULT_TEXT, 800, 400, 42);
        assert_eq!(s.text, "SOLACE");
        assert_eq!(s.pixel_ratio, 1.0);
        assert_eq!(s.steps, 0);
        assert_eq!(s.mode, Mode::Chaotic);
        assert_eq!(s.pointer, None);
        assert_eq!(s.params, json!({}));
        assert!(s.validate().is_ok());
    }

    #[test]
    fn json_round_trip_with_overrides() {
        let mut s = Scene::new("LAB", 640, 360, 7);
        s.pixel_ratio = 2.0;
        s.steps = 120;
        s.mode = Mode::Ordered;
        s.pointer = Some((10.0, 20.0));
        s.params = json!({"gap": 6, "convergence": 0.1});
        let text = serde_json::to_string_pretty(&s).unwrap();
        let back: Scene = serde_json::from_str(&text).unwrap();
        assert_eq!(s, back);
    }

    #[test]
    fn minimal_json_fills_defaults() {
        let s: Scene =
            serde_json::from_str(r#"{"text":"HI","width":100,"height":50,"seed":3}"#).unwrap();
        assert_eq!(s, Scene::new("HI", 100, 50, 3));
    }

    #[test]
    fn canvas_size_applies_pixel_ratio() {
        let mut s = Scene::new("HI", 300, 150, 1);
        s.pixel_ratio = 1.5;
        let size = s.canvas_size();
        assert_eq!((size.device_width, size.device_height), (450, 225));
        assert_eq!((size.layout_width, size.layout_height), (300.0, 150.0));
    }

    #[test]
    fn config_reads_params() {
        let mut s = Scene::new("HI", 300, 150, 1);
        s.params = json!({"gap": 8});
        assert_eq!(s.config().gap, 8);
    }

    #[test]
    fn validate_rejects_bad_scenes() {
        assert!(matches!(
            Scene::new("HI", 0, 10, 1).validate(),
            Err(SwarmError::InvalidDimensions)
        ));
        assert!(matches!(
            Scene::new("  ", 10, 10, 1).validate(),
            Err(SwarmError::EmptyText)
        ));

        let mut tiny = Scene::new("HI", 1, 1, 1);
        tiny.pixel_ratio = 0.1;
        assert!(matches!(tiny.validate(), Err(SwarmError::InvalidDimensions)));

        let mut ratio = Scene::new("HI", 10, 10, 1);
        ratio.pixel_ratio = f64::NAN;
        assert!(ratio.validate().is_err());

        let mut bad = Scene::new("HI", 10, 10, 1);
        bad.params = json!({"gap": 0});
        assert!(matches!(bad.validate(), Err(SwarmError::InvalidParam { .. })));
    }
}
