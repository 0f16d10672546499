//! Data-driven game balance
//!
//! Spawn cadence, wave sizes and scroll speed. Loaded from JSON; any field
//! left out keeps its default.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TuningError;

/// Inclusive integer range drawn from with the session RNG
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRange {
    pub min: u32,
    pub max: u32,
}

impl SpawnRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Uniform draw between the bounds. An inverted range is read low to
    /// high rather than rejected, so sampling never fails.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        rng.random_range(lo..=hi)
    }

    fn check(&self, field: &'static str) -> Result<(), TuningError> {
        if self.min > self.max {
            return Err(TuningError::InvertedRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Session balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Pacing ===
    /// Road scroll speed (depth per frame = speed × 0.003 × perspective)
    pub scroll_speed: f32,
    /// Gates to pass to clear a level
    pub gates_needed: u32,

    // === Spawning ===
    /// Frame on which the first timed gate spawns
    pub first_gate_frame: u32,
    /// Frame on which the first timed enemy wave spawns
    pub first_enemy_frame: u32,
    /// Frame on which the first timed hazard spawns (level 2+)
    pub first_hazard_frame: u32,
    /// Frames until the next gate, redrawn after each spawn
    pub gate_interval: SpawnRange,
    /// Frames until the next enemy wave
    pub enemy_interval: SpawnRange,
    /// Frames until the next hazard
    pub hazard_interval: SpawnRange,
    /// Enemies per wave
    pub wave_size: SpawnRange,
    /// Units a lava pit swallows
    pub hazard_damage: SpawnRange,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            scroll_speed: 4.0,
            gates_needed: 4,

            first_gate_frame: 220,
            first_enemy_frame: 250,
            first_hazard_frame: 350,
            gate_interval: SpawnRange::new(180, 260),
            enemy_interval: SpawnRange::new(220, 280),
            hazard_interval: SpawnRange::new(300, 400),
            wave_size: SpawnRange::new(8, 15),
            hazard_damage: SpawnRange::new(5, 15),
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning table
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning: scroll {}, {} gates to clear",
            tuning.scroll_speed,
            tuning.gates_needed
        );
        Ok(tuning)
    }

    /// Reject tables the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if !self.scroll_speed.is_finite() || self.scroll_speed <= 0.0 {
            return Err(TuningError::ScrollSpeed(self.scroll_speed));
        }
        if self.gates_needed == 0 {
            return Err(TuningError::Zero {
                field: "gates_needed",
            });
        }
        if self.wave_size.min == 0 {
            return Err(TuningError::Zero { field: "wave_size" });
        }
        if self.hazard_damage.min == 0 {
            return Err(TuningError::Zero {
                field: "hazard_damage",
            });
        }
        self.gate_interval.check("gate_interval")?;
        self.enemy_interval.check("enemy_interval")?;
        self.hazard_interval.check("hazard_interval")?;
        self.wave_size.check("wave_size")?;
        self.hazard_damage.check("hazard_damage")?;
        Ok(())
    }

    /// Depth advanced per frame before perspective correction
    #[inline]
    pub fn scroll_step(&self) -> f32 {
        self.scroll_speed * crate::consts::SCROLL_TO_DEPTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "gates_needed": 6 }"#).unwrap();
        assert_eq!(tuning.gates_needed, 6);
        assert_eq!(tuning.scroll_speed, 4.0);
        assert_eq!(tuning.gate_interval, SpawnRange::new(180, 260));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = Tuning::from_json(r#"{ "enemy_interval": { "min": 300, "max": 200 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            TuningError::InvertedRange {
                field: "enemy_interval",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_gates_rejected() {
        let err = Tuning::from_json(r#"{ "gates_needed": 0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Zero { .. }));
    }

    #[test]
    fn test_zero_minimums_rejected() {
        let err = Tuning::from_json(r#"{ "hazard_damage": { "min": 0, "max": 10 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            TuningError::Zero {
                field: "hazard_damage"
            }
        ));

        let err = Tuning::from_json(r#"{ "wave_size": { "min": 0, "max": 5 } }"#).unwrap_err();
        assert!(matches!(err, TuningError::Zero { field: "wave_size" }));
    }

    #[test]
    fn test_bad_scroll_speed_rejected() {
        let err = Tuning::from_json(r#"{ "scroll_speed": -1.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::ScrollSpeed(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_sample_within_range() {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
        let range = SpawnRange::new(5, 15);
        for _ in 0..200 {
            let v = range.sample(&mut rng);
            assert!((5..=15).contains(&v));
        }
    }

    #[test]
    fn test_sample_inverted_range() {
        use rand::SeedableRng;
        let mut rng = rand_pcg::Pcg32::seed_from_u64(8);
        let range = SpawnRange::new(15, 8);
        for _ in 0..200 {
            assert!((8..=15).contains(&range.sample(&mut rng)));
        }
    }
}
