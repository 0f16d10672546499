//! Crowd Runner - A perspective lane-runner arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (crowd, enemies, gates, game state)
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration boundary errors

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::{LevelError, TuningError};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Hard cap on crowd population
    pub const MAX_POPULATION: usize = 500;

    /// Crowd starts centered on the road
    pub const CROWD_START_X: f32 = 0.5;
    /// Depth anchor of the crowd (near the player)
    pub const CROWD_DEPTH: f32 = 0.85;
    /// Steering limits for the crowd center
    pub const STEER_MIN_X: f32 = 0.1;
    pub const STEER_MAX_X: f32 = 0.9;
    /// Lateral step per steer event (player speed 13 × 0.02)
    pub const STEER_STEP: f32 = 0.26;

    /// Unit movement toward its formation slot, per frame
    pub const UNIT_SPEED: f32 = 0.02;
    /// Closer than this counts as "arrived" (no jitter)
    pub const ARRIVE_EPSILON: f32 = 0.01;
    /// Units never leave the road
    pub const UNIT_MIN_X: f32 = 0.05;
    pub const UNIT_MAX_X: f32 = 0.95;
    pub const UNIT_MIN_Z: f32 = 0.1;
    pub const UNIT_MAX_Z: f32 = 0.95;
    /// Frames between shots for a single unit
    pub const FIRE_INTERVAL: u32 = 20;

    /// Formation rings
    pub const RING_BASE_CAPACITY: usize = 12;
    pub const RING_CAPACITY_GROWTH: usize = 3;
    pub const RING_BASE_RADIUS: f32 = 0.03;
    pub const RING_SPACING: f32 = 0.04;
    /// Depth is squashed so rings read as ellipses on the road
    pub const RING_DEPTH_SQUASH: f32 = 0.3;
    /// Spawn scatter for newly added units
    pub const SPAWN_MIN_RADIUS: f32 = 0.02;
    pub const SPAWN_MAX_RADIUS: f32 = 0.06;

    /// Enemy chase speed per frame
    pub const ENEMY_SPEED: f32 = 0.006;
    /// Enemy touching a unit consumes it
    pub const ENEMY_CONTACT_RADIUS: f32 = 0.03;
    pub const ENEMY_START_HP: i32 = 1;

    /// Projectile speed per frame
    pub const PROJECTILE_SPEED: f32 = 0.03;
    pub const PROJECTILE_HIT_RADIUS: f32 = 0.03;
    /// Projectiles die once they leave [-margin, 1 + margin]
    pub const PROJECTILE_MARGIN: f32 = 0.1;

    /// Depth bands used by the collision partition
    pub const ZONE_COUNT: f32 = 10.0;

    /// Gate triggers when the crowd is this close in depth
    pub const GATE_TOLERANCE: f32 = 0.08;
    /// Visual depth extent of a gate (renderer hint)
    pub const GATE_DEPTH: f32 = 0.15;
    /// Lateral split between the left and right operation
    pub const GATE_SPLIT_X: f32 = 0.5;

    /// Hazard overlap half-extent on both axes
    pub const HAZARD_REACH: f32 = 0.08;
    /// Visual footprint of a lava pit at scale 1.0 (renderer hint)
    pub const HAZARD_BASE_WIDTH: f32 = 80.0;
    pub const HAZARD_BASE_HEIGHT: f32 = 50.0;

    /// Scroll speed is multiplied by this to get depth units per frame
    pub const SCROLL_TO_DEPTH: f32 = 0.003;
    /// Entities past this depth are behind the player
    pub const PASS_THROUGH_DEPTH: f32 = 1.2;

    /// Screen and road trapezoid (projection only)
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 800.0;
    pub const ROAD_TOP_LEFT: f32 = SCREEN_WIDTH / 2.0 - 80.0;
    pub const ROAD_TOP_RIGHT: f32 = SCREEN_WIDTH / 2.0 + 80.0;
    pub const ROAD_TOP_Y: f32 = 50.0;
    pub const ROAD_BOTTOM_LEFT: f32 = 50.0;
    pub const ROAD_BOTTOM_RIGHT: f32 = SCREEN_WIDTH - 50.0;
    pub const ROAD_BOTTOM_Y: f32 = SCREEN_HEIGHT - 80.0;
}

/// Projected screen position with its perspective scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
}

/// Perspective factor at depth z: 0.3 far away, 1.0 at the player
#[inline]
pub fn perspective_scale(z: f32) -> f32 {
    0.3 + 0.7 * z
}

/// Road edges (screen x) at depth z
#[inline]
pub fn road_bounds(z: f32) -> (f32, f32) {
    use consts::*;
    let left = ROAD_TOP_LEFT + (ROAD_BOTTOM_LEFT - ROAD_TOP_LEFT) * z;
    let right = ROAD_TOP_RIGHT + (ROAD_BOTTOM_RIGHT - ROAD_TOP_RIGHT) * z;
    (left, right)
}

/// Convert world (x lateral, z depth) to screen coordinates
pub fn world_to_screen(x: f32, z: f32) -> ScreenPoint {
    use consts::*;
    let (left, right) = road_bounds(z);
    ScreenPoint {
        x: left + (right - left) * x,
        y: ROAD_TOP_Y + (ROAD_BOTTOM_Y - ROAD_TOP_Y) * z,
        scale: perspective_scale(z),
    }
}

/// Project a world position stored as `Vec2 { x, y: depth }`
#[inline]
pub fn project(pos: Vec2) -> ScreenPoint {
    world_to_screen(pos.x, pos.y)
}

/// Step `from` toward `to` by at most `speed`; returns the distance measured
/// before moving. Distances under `epsilon` leave `from` untouched.
#[inline]
pub fn step_toward(from: &mut Vec2, to: Vec2, speed: f32, epsilon: f32) -> f32 {
    let delta = to - *from;
    let dist = delta.length();
    if dist > epsilon {
        *from += delta / dist * speed;
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_corners() {
        let far_left = world_to_screen(0.0, 0.0);
        assert_eq!(far_left.x, consts::ROAD_TOP_LEFT);
        assert_eq!(far_left.y, consts::ROAD_TOP_Y);
        assert!((far_left.scale - 0.3).abs() < 1e-6);

        let near_right = world_to_screen(1.0, 1.0);
        assert_eq!(near_right.x, consts::ROAD_BOTTOM_RIGHT);
        assert_eq!(near_right.y, consts::ROAD_BOTTOM_Y);
        assert!((near_right.scale - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_center_stays_centered() {
        for z in [0.0, 0.25, 0.5, 1.0] {
            let p = world_to_screen(0.5, z);
            assert!((p.x - consts::SCREEN_WIDTH / 2.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_step_toward_arrived_is_noop() {
        let mut pos = Vec2::new(0.5, 0.5);
        let dist = step_toward(&mut pos, Vec2::new(0.505, 0.5), 0.02, 0.01);
        assert!(dist < 0.01);
        assert_eq!(pos, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_step_toward_moves_fixed_amount() {
        let mut pos = Vec2::ZERO;
        step_toward(&mut pos, Vec2::new(1.0, 0.0), 0.02, 0.01);
        assert!((pos.x - 0.02).abs() < 1e-6);
        assert_eq!(pos.y, 0.0);
    }
}
