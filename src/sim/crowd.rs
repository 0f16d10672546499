//! The player's crowd: population arithmetic, ring formation and shooting
//!
//! Units are kept in insertion order. Shrinking always truncates from the end,
//! so the newest units are the first to go.

use glam::Vec2;
use rand::Rng;

use super::enemy::{Enemy, EnemyId, find_enemy};
use super::operation::Operation;
use super::projectile::Projectile;
use crate::consts::*;
use crate::step_toward;

/// A single crowd member
#[derive(Debug, Clone)]
pub struct Unit {
    /// x lateral, y depth
    pub pos: Vec2,
    /// Frames until this unit may fire again
    pub cooldown: u32,
}

impl Unit {
    pub fn new(pos: Vec2) -> Self {
        Self { pos, cooldown: 0 }
    }

    #[inline]
    pub fn can_fire(&self) -> bool {
        self.cooldown == 0
    }

    /// Move one step toward a formation slot and stay on the road
    fn follow(&mut self, slot: Vec2) {
        step_toward(&mut self.pos, slot, UNIT_SPEED, ARRIVE_EPSILON);
        self.pos.x = self.pos.x.clamp(UNIT_MIN_X, UNIT_MAX_X);
        self.pos.y = self.pos.y.clamp(UNIT_MIN_Z, UNIT_MAX_Z);
    }
}

/// Sprite size for every unit given the crowd's population
pub fn unit_display_size(population: usize) -> u32 {
    match population {
        0..=10 => 15,
        11..=50 => 12,
        51..=100 => 10,
        _ => 15u32.saturating_sub((population / 50) as u32).max(8),
    }
}

/// Concentric ring slots around `center`
///
/// Ring `r` holds `12 + 3r` units (the last ring takes whatever is left) at
/// radius `0.03 + 0.04r`, spaced evenly around the circle. Depth offsets are
/// squashed to 30% so rings lie flat on the road.
pub fn ring_layout(count: usize, center: Vec2, out: &mut Vec<Vec2>) {
    out.clear();
    out.reserve(count);

    let mut placed = 0;
    let mut ring = 0;
    while placed < count {
        let in_ring = (RING_BASE_CAPACITY + ring * RING_CAPACITY_GROWTH).min(count - placed);
        let radius = RING_BASE_RADIUS + ring as f32 * RING_SPACING;

        for i in 0..in_ring {
            let angle = i as f32 / in_ring as f32 * std::f32::consts::TAU;
            out.push(Vec2::new(
                center.x + angle.cos() * radius,
                center.y + angle.sin() * radius * RING_DEPTH_SQUASH,
            ));
        }

        placed += in_ring;
        ring += 1;
    }
}

/// The player-controlled crowd
#[derive(Debug, Clone)]
pub struct Crowd {
    units: Vec<Unit>,
    center_x: f32,
    depth: f32,
    /// Enemy every unit shoots at; re-validated each frame
    target: Option<EnemyId>,
    /// Formation slots, one per unit, rebuilt every update
    formation: Vec<Vec2>,
}

impl Default for Crowd {
    fn default() -> Self {
        Self::new()
    }
}

impl Crowd {
    /// One unit, centered, at the crowd's depth anchor
    pub fn new() -> Self {
        Self {
            units: vec![Unit::new(Vec2::new(CROWD_START_X, CROWD_DEPTH))],
            center_x: CROWD_START_X,
            depth: CROWD_DEPTH,
            target: None,
            formation: Vec::new(),
        }
    }

    #[inline]
    pub fn population(&self) -> usize {
        self.units.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// Lateral center the player steers
    #[inline]
    pub fn center_x(&self) -> f32 {
        self.center_x
    }

    /// Fixed depth anchor of the formation
    #[inline]
    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x, self.depth)
    }

    /// Depth of the lead (first) unit, used for gate crossings
    pub fn lead_depth(&self) -> Option<f32> {
        self.units.first().map(|u| u.pos.y)
    }

    pub fn shared_target(&self) -> Option<EnemyId> {
        self.target
    }

    /// Slots computed by the last formation update
    pub fn formation(&self) -> &[Vec2] {
        &self.formation
    }

    pub fn unit_size(&self) -> u32 {
        unit_display_size(self.population())
    }

    // === Population arithmetic ===

    /// Resize to whatever `op` yields; returns the population before and after
    pub fn apply<R: Rng + ?Sized>(&mut self, op: Operation, rng: &mut R) -> (usize, usize) {
        let before = self.population();
        let after = op.apply(before);
        if after > before {
            self.grow(after - before, rng);
        } else if after < before {
            self.units.truncate(after);
        }
        (before, self.population())
    }

    pub fn add<R: Rng + ?Sized>(&mut self, n: u32, rng: &mut R) {
        self.apply(Operation::add(n), rng);
    }

    /// Drop the `n` most recently added units (may empty the crowd)
    pub fn remove(&mut self, n: usize) {
        let keep = self.units.len().saturating_sub(n);
        self.units.truncate(keep);
    }

    pub fn multiply<R: Rng + ?Sized>(&mut self, k: u32, rng: &mut R) {
        self.apply(Operation::multiply(k), rng);
    }

    pub fn divide(&mut self, k: u32) {
        let target = Operation::divide(k).apply(self.population());
        self.units.truncate(target);
    }

    pub fn power<R: Rng + ?Sized>(&mut self, p: u32, rng: &mut R) {
        self.apply(Operation::power(p), rng);
    }

    pub fn sqrt(&mut self) {
        let target = Operation::sqrt().apply(self.population());
        self.units.truncate(target);
    }

    /// New units appear scattered around the center and walk into formation
    fn grow<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) {
        let n = n.min(MAX_POPULATION.saturating_sub(self.units.len()));
        self.units.reserve(n);
        for _ in 0..n {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let radius = rng.random_range(SPAWN_MIN_RADIUS..SPAWN_MAX_RADIUS);
            self.units.push(Unit::new(Vec2::new(
                self.center_x + angle.cos() * radius,
                self.depth + angle.sin() * radius * RING_DEPTH_SQUASH,
            )));
        }
    }

    // === Movement ===

    /// Shift the center one step in the direction of `delta`
    pub fn steer(&mut self, delta: f32) {
        if delta == 0.0 || delta.is_nan() {
            return;
        }
        self.center_x =
            (self.center_x + STEER_STEP * delta.signum()).clamp(STEER_MIN_X, STEER_MAX_X);
    }

    /// Recompute formation slots from the current population and center
    pub fn layout_formation(&mut self) {
        ring_layout(self.units.len(), self.center(), &mut self.formation);
    }

    /// Lay out the formation, walk every unit toward its slot and tick
    /// cooldowns
    pub fn update_formation(&mut self) {
        self.layout_formation();
        for (unit, &slot) in self.units.iter_mut().zip(&self.formation) {
            unit.follow(slot);
        }
        for unit in &mut self.units {
            unit.cooldown = unit.cooldown.saturating_sub(1);
        }
    }

    // === Shooting ===

    /// Keep the current target while it is hostile and ahead, otherwise pick
    /// the hostile enemy ahead that is closest in depth
    pub fn select_target(&mut self, enemies: &[Enemy]) -> Option<EnemyId> {
        let still_valid = self
            .target
            .and_then(|id| find_enemy(enemies, id))
            .is_some_and(|e| e.is_hostile() && e.depth() < self.depth);
        if still_valid {
            return self.target;
        }

        let depth = self.depth;
        let next = enemies
            .iter()
            .filter(|e| e.is_hostile() && e.depth() < depth)
            .min_by(|a, b| {
                (a.depth() - depth)
                    .abs()
                    .partial_cmp(&(b.depth() - depth).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|e| e.id);

        if next != self.target {
            log::debug!("Crowd target {:?} -> {:?}", self.target, next);
        }
        self.target = next;
        next
    }

    /// Pick a target and let the first ready unit fire. One shot per frame.
    pub fn select_target_and_fire(&mut self, enemies: &[Enemy]) -> Option<Projectile> {
        let target = self.select_target(enemies)?;
        let shooter = self.units.iter_mut().find(|u| u.can_fire())?;
        shooter.cooldown = FIRE_INTERVAL;
        Some(Projectile::new(shooter.pos, target))
    }
}
