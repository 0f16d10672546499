//! Lava pits: swallow a batch of units the first time the crowd touches them

use glam::Vec2;

use super::crowd::Crowd;
use crate::consts::{HAZARD_BASE_HEIGHT, HAZARD_BASE_WIDTH, HAZARD_REACH};
use crate::perspective_scale;

/// A static area hazard
#[derive(Debug, Clone)]
pub struct Hazard {
    /// x lateral, y depth
    pub pos: Vec2,
    /// Units removed on trigger
    pub damage: u32,
    /// One-shot
    pub active: bool,
}

impl Hazard {
    pub fn new(x: f32, z: f32, damage: u32) -> Self {
        Self {
            pos: Vec2::new(x, z),
            damage,
            active: true,
        }
    }

    #[inline]
    pub fn depth(&self) -> f32 {
        self.pos.y
    }

    /// On-screen (width, height) of the pit at its current depth
    pub fn footprint(&self) -> (f32, f32) {
        let scale = perspective_scale(self.depth());
        (HAZARD_BASE_WIDTH * scale, HAZARD_BASE_HEIGHT * scale)
    }

    /// Whether any unit stands inside the pit's square reach
    pub fn overlaps(&self, crowd: &Crowd) -> bool {
        crowd.units().iter().any(|u| {
            (u.pos.x - self.pos.x).abs() < HAZARD_REACH
                && (u.pos.y - self.pos.y).abs() < HAZARD_REACH
        })
    }

    /// On first overlap remove `damage` units and go dormant.
    /// Returns how many units were lost.
    pub fn resolve(&mut self, crowd: &mut Crowd) -> Option<usize> {
        if !self.active || crowd.is_empty() || !self.overlaps(crowd) {
            return None;
        }
        let before = crowd.population();
        crowd.remove(self.damage as usize);
        self.active = false;
        Some(before - crowd.population())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_triggers_once() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut crowd = Crowd::new();
        crowd.add(29, &mut rng);
        let mut pit = Hazard::new(0.5, 0.85, 12);

        assert_eq!(pit.resolve(&mut crowd), Some(12));
        assert_eq!(crowd.population(), 18);
        assert!(!pit.active);
        assert_eq!(pit.resolve(&mut crowd), None);
        assert_eq!(crowd.population(), 18);
    }

    #[test]
    fn test_damage_capped_by_population() {
        let mut crowd = Crowd::new();
        let mut pit = Hazard::new(0.5, 0.85, 15);
        assert_eq!(pit.resolve(&mut crowd), Some(1));
        assert!(crowd.is_empty());
    }

    #[test]
    fn test_footprint_grows_when_near() {
        let far = Hazard::new(0.5, 0.0, 5).footprint();
        let near = Hazard::new(0.5, 1.0, 5).footprint();
        assert!((near.0 - HAZARD_BASE_WIDTH).abs() < 1e-4);
        assert!(far.0 < near.0 && far.1 < near.1);
    }

    #[test]
    fn test_miss_keeps_hazard_armed() {
        let mut crowd = Crowd::new();
        let mut pit = Hazard::new(0.5, 0.5, 10);
        assert_eq!(pit.resolve(&mut crowd), None);
        assert!(pit.active);

        let mut side = Hazard::new(0.2, 0.85, 10);
        assert_eq!(side.resolve(&mut crowd), None);
        assert_eq!(crowd.population(), 1);
    }
}
