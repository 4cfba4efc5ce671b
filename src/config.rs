//! Stage tuning knobs. `Default` carries the constants the page ships with;
//! with the `serde_json` feature a host page can override any subset of them
//! by passing a JSON object to `start_stage_with_config`.

use rand::Rng;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::Deserialize;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[cfg(feature = "serde_json")]
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("clouds.{field} {reason}")]
    InvalidCloud {
        field: &'static str,
        reason: &'static str,
    },
}

fn is_positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

/// Closed numeric range sampled uniformly. `min > max` is allowed and simply
/// samples the reversed interval.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize))]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> f64 {
        self.min + rng.random::<f64>() * (self.max - self.min)
    }

    pub fn contains(&self, v: f64) -> bool {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        v >= lo && v <= hi
    }

    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Both ends finite and strictly above zero.
    pub fn is_positive(&self) -> bool {
        is_positive(self.min) && is_positive(self.max)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct CloudConfig {
    /// Clouds spawned immediately so the sky is never empty on load.
    pub initial_burst: usize,
    pub spawn_interval_ms: f64,
    pub size_px: Span,
    /// Vertical offset in viewport-height units.
    pub top_vh: Span,
    pub duration_s: Span,
    pub opacity: Span,
    /// Start delay as a fraction of the drawn duration. Negative values start
    /// the drift part-way across the screen.
    pub delay_fraction: Span,
    /// Floor for the remaining lifetime of clouds that start mid-drift.
    pub min_lifetime_s: f64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            initial_burst: 10,
            spawn_interval_ms: 5_000.0,
            size_px: Span::new(80.0, 200.0),
            top_vh: Span::new(0.0, 80.0),
            duration_s: Span::new(40.0, 100.0),
            opacity: Span::new(0.3, 0.7),
            delay_fraction: Span::new(-0.9, 0.0),
            min_lifetime_s: 2.0,
        }
    }
}

impl CloudConfig {
    /// Every cloud must end up with a strictly positive lifetime, so durations,
    /// the lifetime floor and the spawn interval have to be positive and every
    /// range finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::InvalidCloud { field, reason });
        for (field, span) in self.spans() {
            if !span.is_finite() {
                return invalid(field, "must be finite");
            }
        }
        if !self.duration_s.is_positive() {
            return invalid("duration_s", "must be greater than zero");
        }
        if !is_positive(self.min_lifetime_s) {
            return invalid("min_lifetime_s", "must be a finite value greater than zero");
        }
        if !is_positive(self.spawn_interval_ms) {
            return invalid("spawn_interval_ms", "must be a finite value greater than zero");
        }
        Ok(())
    }

    /// Replace each field [`Self::validate`] would reject with its default.
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();
        for (span, fallback) in [
            (&mut self.size_px, d.size_px),
            (&mut self.top_vh, d.top_vh),
            (&mut self.opacity, d.opacity),
            (&mut self.delay_fraction, d.delay_fraction),
        ] {
            if !span.is_finite() {
                *span = fallback;
            }
        }
        if !self.duration_s.is_positive() {
            self.duration_s = d.duration_s;
        }
        if !is_positive(self.min_lifetime_s) {
            self.min_lifetime_s = d.min_lifetime_s;
        }
        if !is_positive(self.spawn_interval_ms) {
            self.spawn_interval_ms = d.spawn_interval_ms;
        }
        self
    }

    fn spans(&self) -> [(&'static str, &Span); 5] {
        [
            ("size_px", &self.size_px),
            ("top_vh", &self.top_vh),
            ("duration_s", &self.duration_s),
            ("opacity", &self.opacity),
            ("delay_fraction", &self.delay_fraction),
        ]
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct DodgeConfig {
    /// Distance kept from the play-area edges when dodging.
    pub margin_px: f64,
    pub transition_ms: u32,
}

impl Default for DodgeConfig {
    fn default() -> Self {
        Self {
            margin_px: 6.0,
            transition_ms: 280,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct AudioConfig {
    pub music_src: String,
    pub music_volume: f64,
    pub laugh_src: String,
    pub laugh_volume: f64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music_src: "/shinchan-theme.mp3".to_string(),
            music_volume: 0.35,
            laugh_src: "/shinchan-laugh.mp3".to_string(),
            laugh_volume: 0.8,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct StageConfig {
    pub clouds: CloudConfig,
    pub dodge: DodgeConfig,
    pub audio: AudioConfig,
    pub mascot_src: String,
    pub mascot_width_px: f64,
    pub play_area_height_px: f64,
    /// How long the mascot wiggles after a click.
    pub wiggle_ms: f64,
    /// Emit debug lines to the browser console.
    pub debug: bool,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            clouds: CloudConfig::default(),
            dodge: DodgeConfig::default(),
            audio: AudioConfig::default(),
            mascot_src: "/shinchan.png".to_string(),
            mascot_width_px: 160.0,
            play_area_height_px: 580.0,
            wiggle_ms: 600.0,
            debug: false,
        }
    }
}

impl StageConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.clouds.validate()
    }

    /// Parse a (possibly partial) JSON override; missing keys keep defaults.
    /// Values the stage cannot run with are rejected rather than clamped.
    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn span_samples_stay_inside() {
        let mut rng = SmallRng::seed_from_u64(11);
        let s = Span::new(40.0, 100.0);
        for _ in 0..500 {
            assert!(s.contains(s.sample(&mut rng)));
        }
    }

    #[test]
    fn reversed_span_is_still_bounded() {
        let mut rng = SmallRng::seed_from_u64(3);
        let s = Span::new(0.0, -0.9);
        for _ in 0..200 {
            let v = s.sample(&mut rng);
            assert!((-0.9..=0.0).contains(&v), "{v}");
        }
    }

    #[test]
    fn defaults_match_page_constants() {
        let c = StageConfig::default();
        assert_eq!(c.clouds.initial_burst, 10);
        assert_eq!(c.clouds.spawn_interval_ms, 5_000.0);
        assert_eq!(c.clouds.min_lifetime_s, 2.0);
        assert_eq!(c.dodge.margin_px, 6.0);
        assert_eq!(c.wiggle_ms, 600.0);
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn partial_json_keeps_defaults() {
        let c = StageConfig::from_json(r#"{"debug":true,"clouds":{"initial_burst":3}}"#).unwrap();
        assert!(c.debug);
        assert_eq!(c.clouds.initial_burst, 3);
        assert_eq!(c.clouds.spawn_interval_ms, 5_000.0);
        assert_eq!(c.audio, AudioConfig::default());
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            StageConfig::from_json("{clouds:"),
            Err(ConfigError::Json(_))
        ));
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_with_negative_durations_is_rejected() {
        let err = StageConfig::from_json(
            r#"{"clouds":{"duration_s":{"min":-10,"max":-10},"min_lifetime_s":-5}}"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidCloud {
                field: "duration_s",
                ..
            }
        ));
        assert_eq!(err.to_string(), "clouds.duration_s must be greater than zero");
    }

    #[cfg(feature = "serde_json")]
    #[test]
    fn json_with_zero_lifetime_floor_is_rejected() {
        let err = StageConfig::from_json(r#"{"clouds":{"min_lifetime_s":0}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidCloud {
                field: "min_lifetime_s",
                ..
            }
        ));
    }

    fn rejected_field(cfg: CloudConfig) -> &'static str {
        match cfg.validate() {
            Err(ConfigError::InvalidCloud { field, .. }) => field,
            other => panic!("expected a rejected field, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(StageConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_or_negative_durations_are_rejected() {
        for duration_s in [
            Span::new(0.0, 0.0),
            Span::new(0.0, 40.0),
            Span::new(-10.0, -10.0),
            Span::new(40.0, -1.0),
        ] {
            let cfg = CloudConfig {
                duration_s,
                ..CloudConfig::default()
            };
            assert_eq!(rejected_field(cfg), "duration_s", "{duration_s:?}");
        }
    }

    #[test]
    fn non_positive_lifetime_floor_is_rejected() {
        for min_lifetime_s in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let cfg = CloudConfig {
                min_lifetime_s,
                ..CloudConfig::default()
            };
            assert_eq!(rejected_field(cfg), "min_lifetime_s");
        }
    }

    #[test]
    fn non_finite_spans_are_rejected() {
        let cfg = CloudConfig {
            opacity: Span::new(f64::NAN, 0.5),
            ..CloudConfig::default()
        };
        assert_eq!(rejected_field(cfg), "opacity");

        let cfg = CloudConfig {
            size_px: Span::new(80.0, f64::INFINITY),
            ..CloudConfig::default()
        };
        assert_eq!(rejected_field(cfg), "size_px");

        let cfg = CloudConfig {
            delay_fraction: Span::new(f64::NEG_INFINITY, 0.0),
            ..CloudConfig::default()
        };
        assert_eq!(rejected_field(cfg), "delay_fraction");
    }

    #[test]
    fn zero_spawn_interval_is_rejected() {
        let cfg = CloudConfig {
            spawn_interval_ms: 0.0,
            ..CloudConfig::default()
        };
        assert_eq!(rejected_field(cfg), "spawn_interval_ms");
    }

    #[test]
    fn sanitized_replaces_only_bad_fields() {
        let d = CloudConfig::default();
        let cfg = CloudConfig {
            initial_burst: 4,
            duration_s: Span::new(-10.0, -10.0),
            min_lifetime_s: -5.0,
            opacity: Span::new(f64::NAN, 0.5),
            spawn_interval_ms: f64::INFINITY,
            top_vh: Span::new(5.0, 15.0),
            ..d.clone()
        }
        .sanitized();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.duration_s, d.duration_s);
        assert_eq!(cfg.min_lifetime_s, d.min_lifetime_s);
        assert_eq!(cfg.opacity, d.opacity);
        assert_eq!(cfg.spawn_interval_ms, d.spawn_interval_ms);
        assert_eq!(cfg.initial_burst, 4);
        assert_eq!(cfg.top_vh, Span::new(5.0, 15.0));
        assert_eq!(d.clone().sanitized(), d);
    }
}
