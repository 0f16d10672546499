//! Projectiles fired by the crowd at its shared target

use glam::Vec2;

use super::enemy::{Enemy, EnemyId, find_enemy};
use super::partition::ZonePartition;
use crate::consts::*;
use crate::step_toward;

/// A shot in flight, homing on the enemy it was fired at
#[derive(Debug, Clone)]
pub struct Projectile {
    /// x lateral, y depth
    pub pos: Vec2,
    /// Captured at fire time; never keeps the enemy alive
    pub target: EnemyId,
    pub active: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, target: EnemyId) -> Self {
        Self {
            pos,
            target,
            active: true,
        }
    }

    /// Home toward the target's current position
    pub fn advance(&mut self, enemies: &[Enemy]) {
        if !self.active {
            return;
        }

        let Some(target) = find_enemy(enemies, self.target).filter(|e| e.alive) else {
            self.active = false;
            return;
        };

        step_toward(&mut self.pos, target.pos, PROJECTILE_SPEED, ARRIVE_EPSILON);

        let lo = -PROJECTILE_MARGIN;
        let hi = 1.0 + PROJECTILE_MARGIN;
        if self.pos.x < lo || self.pos.x > hi || self.pos.y < lo || self.pos.y > hi {
            self.active = false;
        }
    }

    /// Damage the first alive enemy in range within this depth band.
    /// Returns the id of the enemy hit.
    pub fn resolve_hit(
        &mut self,
        partition: &ZonePartition,
        enemies: &mut [Enemy],
    ) -> Option<EnemyId> {
        if !self.active {
            return None;
        }

        for &index in partition.candidates(self.pos.y) {
            let Some(enemy) = enemies.get_mut(index) else {
                continue;
            };
            if enemy.alive && enemy.pos.distance(self.pos) < PROJECTILE_HIT_RADIUS {
                enemy.take_damage();
                self.active = false;
                return Some(enemy.id);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hostile(id: u32, x: f32, z: f32) -> Enemy {
        let mut e = Enemy::new(EnemyId(id), x, z);
        e.activate();
        e
    }

    #[test]
    fn test_homes_on_target() {
        let enemies = vec![hostile(1, 0.5, 0.2)];
        let mut shot = Projectile::new(Vec2::new(0.5, 0.8), EnemyId(1));
        shot.advance(&enemies);
        assert!(shot.active);
        assert!((shot.pos.y - (0.8 - PROJECTILE_SPEED)).abs() < 1e-5);
    }

    #[test]
    fn test_dead_target_deactivates_without_damage() {
        let mut enemies = vec![hostile(1, 0.5, 0.5), hostile(2, 0.5, 0.5)];
        enemies[0].alive = false;

        let mut partition = ZonePartition::new();
        partition.rebuild(&enemies);

        let mut shot = Projectile::new(Vec2::new(0.5, 0.5), EnemyId(1));
        shot.advance(&enemies);
        assert!(!shot.active);
        assert_eq!(shot.resolve_hit(&partition, &mut enemies), None);
        assert!(enemies[1].alive);
    }

    #[test]
    fn test_pruned_target_deactivates() {
        let enemies = vec![hostile(2, 0.5, 0.5)];
        let mut shot = Projectile::new(Vec2::new(0.5, 0.8), EnemyId(1));
        shot.advance(&enemies);
        assert!(!shot.active);
    }

    #[test]
    fn test_one_enemy_per_projectile() {
        let mut enemies = vec![hostile(1, 0.5, 0.55), hostile(2, 0.5, 0.55)];
        let mut partition = ZonePartition::new();
        partition.rebuild(&enemies);

        let mut shot = Projectile::new(Vec2::new(0.5, 0.56), EnemyId(1));
        assert_eq!(shot.resolve_hit(&partition, &mut enemies), Some(EnemyId(1)));
        assert!(!shot.active);
        assert_eq!(enemies.iter().filter(|e| !e.alive).count(), 1);

        // A spent projectile never hits again
        assert_eq!(shot.resolve_hit(&partition, &mut enemies), None);
        assert!(enemies[1].alive);
    }

    #[test]
    fn test_adjacent_band_is_missed() {
        let mut enemies = vec![hostile(1, 0.5, 0.401)];
        let mut partition = ZonePartition::new();
        partition.rebuild(&enemies);

        let mut shot = Projectile::new(Vec2::new(0.5, 0.399), EnemyId(1));
        assert_eq!(shot.resolve_hit(&partition, &mut enemies), None);
        assert!(enemies[0].alive);
    }

    #[test]
    fn test_leaves_envelope() {
        let enemies = vec![hostile(1, 0.5, -0.5)];
        let mut shot = Projectile::new(Vec2::new(0.5, -0.09), EnemyId(1));
        shot.advance(&enemies);
        assert!(!shot.active);
    }
}
