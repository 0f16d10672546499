//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per frame
//! - Seeded RNG only
//! - Stable iteration order (insertion order, enemies sorted by id)
//! - No rendering or platform dependencies
//!
//! Positions are `Vec2` with `x` lateral in [0, 1] and `y` holding depth
//! (0 at the horizon, 1 at the player).

pub mod crowd;
pub mod enemy;
pub mod gate;
pub mod hazard;
pub mod operation;
pub mod partition;
pub mod projectile;
pub mod state;
pub mod tick;

pub use crowd::{Crowd, Unit, ring_layout, unit_display_size};
pub use enemy::{Enemy, EnemyId, find_enemy};
pub use gate::{Gate, GateArchetype, GatePass, Side};
pub use hazard::Hazard;
pub use operation::{Operation, OperationKind, operation_pool};
pub use partition::{ZonePartition, zone_of};
pub use projectile::Projectile;
pub use state::{GameState, Level, SessionPhase, SessionResult, SpawnSchedule};
pub use tick::{TickInput, autopilot_steer, scroll_delta, tick};
