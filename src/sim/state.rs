//! Game state and core simulation types
//!
//! One `GameState` is one play session of one level. Everything random is
//! drawn from its seeded RNG, so a seed plus an input sequence replays exactly.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::crowd::Crowd;
use super::enemy::{Enemy, EnemyId};
use super::gate::{Gate, GateArchetype};
use super::hazard::Hazard;
use super::operation::{Operation, operation_pool};
use super::partition::ZonePartition;
use super::projectile::Projectile;
use crate::error::{LevelError, TuningError};
use crate::tuning::Tuning;

/// Playable levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level {
    One,
    Two,
    Three,
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Level::One),
            2 => Ok(Level::Two),
            3 => Ok(Level::Three),
            other => Err(LevelError(other)),
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.number()
    }
}

impl Level {
    pub fn number(self) -> u8 {
        match self {
            Level::One => 1,
            Level::Two => 2,
            Level::Three => 3,
        }
    }

    /// Level after this one, `None` after the last
    pub fn next(self) -> Option<Level> {
        match self {
            Level::One => Some(Level::Two),
            Level::Two => Some(Level::Three),
            Level::Three => None,
        }
    }

    /// Lava pits appear from level 2
    pub fn hazards_enabled(self) -> bool {
        self >= Level::Two
    }

    /// Gate families this level draws from
    pub fn archetypes(self) -> &'static [GateArchetype] {
        match self {
            Level::One => &[GateArchetype::AddSubtract],
            Level::Two => &[GateArchetype::MultiplyDivide],
            Level::Three => &[
                GateArchetype::AddSubtract,
                GateArchetype::MultiplyDivide,
                GateArchetype::PowerSqrt,
                GateArchetype::ExtremeDivide,
            ],
        }
    }

    pub fn operation_pool(self) -> &'static [Operation] {
        operation_pool(self)
    }
}

/// Session lifecycle. `Won` and `Lost` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    Active,
    Won,
    Lost,
}

impl SessionPhase {
    pub fn is_terminal(self) -> bool {
        self != SessionPhase::Active
    }
}

/// What the presentation layer needs for the outcome screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub outcome: SessionPhase,
    pub level: Level,
    pub seed: u64,
    pub population: usize,
    pub gates_passed: u32,
    pub gates_needed: u32,
    pub distance: f32,
    pub frames: u64,
}

/// Frame numbers at which the next timed spawns are due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnSchedule {
    pub next_gate: u64,
    pub next_enemy: u64,
    pub next_hazard: u64,
}

/// Complete session state
#[derive(Debug)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub level: Level,
    pub tuning: Tuning,
    pub phase: SessionPhase,
    /// Frames simulated (also the spawn clock)
    pub frame: u64,
    pub schedule: SpawnSchedule,
    /// Cumulative road scrolled
    pub distance: f32,
    pub gates_passed: u32,
    pub crowd: Crowd,
    pub gates: Vec<Gate>,
    /// Sorted by id
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub hazards: Vec<Hazard>,
    /// Rebuilt every frame from hostile enemies
    pub partition: ZonePartition,
    next_id: u32,
}

impl GameState {
    /// New session with default tuning
    pub fn new(level: Level, seed: u64) -> Self {
        Self::start(level, seed, Tuning::default())
    }

    /// New session with a custom tuning table, rejected if it does not
    /// validate
    pub fn with_tuning(level: Level, seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::start(level, seed, tuning))
    }

    /// The road starts with a gate, an enemy wave and (level 2+) a lava pit
    /// already on the horizon
    fn start(level: Level, seed: u64, tuning: Tuning) -> Self {
        let schedule = SpawnSchedule {
            next_gate: tuning.first_gate_frame as u64,
            next_enemy: tuning.first_enemy_frame as u64,
            next_hazard: tuning.first_hazard_frame as u64,
        };
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level,
            tuning,
            phase: SessionPhase::Active,
            frame: 0,
            schedule,
            distance: 0.0,
            gates_passed: 0,
            crowd: Crowd::new(),
            gates: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            hazards: Vec::new(),
            partition: ZonePartition::new(),
            next_id: 1,
        };

        state.spawn_gate();
        state.spawn_wave();
        if level.hazards_enabled() {
            state.spawn_hazard();
        }

        log::info!(
            "Level {} started with seed {} ({} gates to clear)",
            level.number(),
            seed,
            state.tuning.gates_needed
        );
        state
    }

    /// Allocate a new enemy id
    pub fn next_enemy_id(&mut self) -> EnemyId {
        let id = self.next_id;
        self.next_id += 1;
        EnemyId(id)
    }

    pub fn gates_needed(&self) -> u32 {
        self.tuning.gates_needed
    }

    /// Gate on the horizon
    pub fn spawn_gate(&mut self) {
        let gate = Gate::new(0.0, self.level, &mut self.rng);
        log::debug!(
            "Gate spawned: {} | {} ({:?})",
            gate.left,
            gate.right,
            gate.archetype
        );
        self.gates.push(gate);
    }

    /// Inert wave sharing one depth just beyond the horizon
    pub fn spawn_wave(&mut self) {
        let count = self.tuning.wave_size.sample(&mut self.rng);
        let z = self.rng.random_range(-0.2..0.0);
        for _ in 0..count {
            let x = self.rng.random_range(0.1..0.9);
            let id = self.next_enemy_id();
            self.enemies.push(Enemy::new(id, x, z));
        }
        log::debug!("Enemy wave of {} spawned at depth {:.3}", count, z);
    }

    /// Lava pit beyond the horizon (no-op on level 1)
    pub fn spawn_hazard(&mut self) {
        if !self.level.hazards_enabled() {
            return;
        }
        let x = self.rng.random_range(0.2..0.8);
        let z = self.rng.random_range(-0.3..0.0);
        let damage = self.tuning.hazard_damage.sample(&mut self.rng);
        self.hazards.push(Hazard::new(x, z, damage));
        log::debug!("Lava pit spawned at x {:.2} (damage {})", x, damage);
    }

    /// Release every enemy on the road
    pub fn activate_enemies(&mut self) {
        for enemy in &mut self.enemies {
            enemy.activate();
        }
    }

    pub fn result(&self) -> SessionResult {
        SessionResult {
            outcome: self.phase,
            level: self.level,
            seed: self.seed,
            population: self.crowd.population(),
            gates_passed: self.gates_passed,
            gates_needed: self.tuning.gates_needed,
            distance: self.distance,
            frames: self.frame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing() {
        assert_eq!(Level::try_from(2), Ok(Level::Two));
        assert_eq!(Level::try_from(0), Err(LevelError(0)));
        assert_eq!(Level::try_from(4), Err(LevelError(4)));
        assert_eq!(Level::Three.next(), None);
        assert_eq!(Level::One.next(), Some(Level::Two));
    }

    #[test]
    fn test_session_start_spawns() {
        let state = GameState::new(Level::One, 42);
        assert_eq!(state.phase, SessionPhase::Active);
        assert_eq!(state.crowd.population(), 1);
        assert_eq!(state.gates.len(), 1);
        assert!((8..=15).contains(&state.enemies.len()));
        assert!(state.enemies.iter().all(|e| !e.active && e.depth() < 0.0));
        assert!(state.hazards.is_empty());

        let state = GameState::new(Level::Two, 42);
        assert_eq!(state.hazards.len(), 1);
    }

    #[test]
    fn test_invalid_tuning_is_rejected() {
        use crate::tuning::SpawnRange;

        let tuning = Tuning {
            wave_size: SpawnRange::new(15, 8),
            ..Tuning::default()
        };
        assert!(matches!(
            GameState::with_tuning(Level::One, 1, tuning),
            Err(TuningError::InvertedRange {
                field: "wave_size",
                ..
            })
        ));

        let tuning = Tuning {
            scroll_speed: 0.0,
            ..Tuning::default()
        };
        assert!(GameState::with_tuning(Level::Two, 1, tuning).is_err());

        // Fields are public, so a table can go bad after construction; the
        // spawners still draw from it without failing
        let mut state = GameState::new(Level::Two, 1);
        state.tuning.wave_size = SpawnRange::new(15, 8);
        state.tuning.hazard_damage = SpawnRange::new(9, 6);
        let enemies = state.enemies.len();
        state.spawn_wave();
        state.spawn_hazard();
        assert!((enemies + 8..=enemies + 15).contains(&state.enemies.len()));
        assert!((6..=9).contains(&state.hazards[1].damage));
    }

    #[test]
    fn test_wave_shares_depth_and_ids_increase() {
        let state = GameState::new(Level::One, 7);
        let z = state.enemies[0].depth();
        assert!(state.enemies.iter().all(|e| e.depth() == z));
        assert!(state.enemies.windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_same_seed_same_road() {
        let a = GameState::new(Level::Three, 1234);
        let b = GameState::new(Level::Three, 1234);
        assert_eq!(a.gates[0].left, b.gates[0].left);
        assert_eq!(a.gates[0].right, b.gates[0].right);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.hazards[0].pos, b.hazards[0].pos);
    }

    #[test]
    fn test_result_serializes() {
        let state = GameState::new(Level::Two, 5);
        let json = serde_json::to_string(&state.result()).unwrap();
        assert!(json.contains("\"level\":2"));
        assert!(json.contains("\"outcome\":\"Active\""));
        let back: SessionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state.result());
    }
}
