//! Enemies: spawn inert, chase the crowd once a gate releases the wave

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::crowd::Crowd;
use crate::consts::*;
use crate::step_toward;

/// Stable enemy handle. Holders must look the enemy up every frame; a failed
/// lookup means it was pruned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// A hostile unit
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    /// x lateral, y depth
    pub pos: Vec2,
    pub hp: i32,
    pub alive: bool,
    /// Only active enemies chase and can be targeted
    pub active: bool,
}

impl Enemy {
    pub fn new(id: EnemyId, x: f32, z: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, z),
            hp: ENEMY_START_HP,
            alive: true,
            active: false,
        }
    }

    #[inline]
    pub fn depth(&self) -> f32 {
        self.pos.y
    }

    /// Alive and released
    #[inline]
    pub fn is_hostile(&self) -> bool {
        self.alive && self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn take_damage(&mut self) {
        self.hp -= 1;
        if self.hp <= 0 {
            self.alive = false;
        }
    }

    /// Chase the nearest unit; on contact, take one unit down with it
    ///
    /// Contact is judged on the distance measured before this frame's step.
    pub fn seek(&mut self, crowd: &mut Crowd) {
        if !self.is_hostile() {
            return;
        }

        let Some(target) = crowd
            .units()
            .iter()
            .map(|u| u.pos)
            .min_by(|a, b| {
                a.distance_squared(self.pos)
                    .partial_cmp(&b.distance_squared(self.pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
        else {
            return;
        };

        let dist = step_toward(&mut self.pos, target, ENEMY_SPEED, ARRIVE_EPSILON);
        if dist < ENEMY_CONTACT_RADIUS {
            crowd.remove(1);
            self.alive = false;
        }
    }
}

/// Look up an enemy by id. `enemies` is kept sorted by id (ids are handed out
/// increasing and pruning preserves order).
pub fn find_enemy(enemies: &[Enemy], id: EnemyId) -> Option<&Enemy> {
    enemies
        .binary_search_by_key(&id, |e| e.id)
        .ok()
        .map(|i| &enemies[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inactive_enemy_does_not_move() {
        let mut crowd = Crowd::new();
        let mut enemy = Enemy::new(EnemyId(1), 0.5, 0.5);
        enemy.seek(&mut crowd);
        assert_eq!(enemy.pos, Vec2::new(0.5, 0.5));
        assert_eq!(crowd.population(), 1);
    }

    #[test]
    fn test_enemy_closes_distance() {
        let mut crowd = Crowd::new();
        let mut enemy = Enemy::new(EnemyId(1), 0.5, 0.5);
        enemy.activate();
        let before = enemy.pos.distance(crowd.units()[0].pos);
        enemy.seek(&mut crowd);
        let after = enemy.pos.distance(crowd.units()[0].pos);
        assert!((before - after - ENEMY_SPEED).abs() < 1e-5);
        assert!(enemy.alive);
    }

    #[test]
    fn test_contact_consumes_one_unit() {
        let mut rng = <rand_pcg::Pcg32 as rand::SeedableRng>::seed_from_u64(3);
        let mut crowd = Crowd::new();
        crowd.add(9, &mut rng);
        let lead = crowd.units()[0].pos;
        let mut enemy = Enemy::new(EnemyId(1), lead.x, lead.y - 0.001);
        enemy.activate();
        enemy.seek(&mut crowd);
        assert!(!enemy.alive);
        assert_eq!(crowd.population(), 9);
    }

    #[test]
    fn test_empty_crowd_is_noop() {
        let mut crowd = Crowd::new();
        crowd.remove(1);
        let mut enemy = Enemy::new(EnemyId(1), 0.5, 0.5);
        enemy.activate();
        enemy.seek(&mut crowd);
        assert!(enemy.alive);
        assert_eq!(enemy.pos, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_take_damage_kills() {
        let mut enemy = Enemy::new(EnemyId(1), 0.5, 0.5);
        enemy.take_damage();
        assert!(!enemy.alive);
    }

    #[test]
    fn test_find_enemy() {
        let enemies = vec![
            Enemy::new(EnemyId(2), 0.1, 0.1),
            Enemy::new(EnemyId(5), 0.2, 0.2),
            Enemy::new(EnemyId(9), 0.3, 0.3),
        ];
        assert_eq!(find_enemy(&enemies, EnemyId(5)).map(|e| e.pos.x), Some(0.2));
        assert!(find_enemy(&enemies, EnemyId(4)).is_none());
    }
}
