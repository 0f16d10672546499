//! Depth-banded spatial partition for projectile vs enemy tests
//!
//! Enemies are bucketed by `floor(z * 10)`. A projectile only tests enemies in
//! its own band, so a hit straddling a band edge can be missed; with a 0.03
//! contact radius against 0.1-wide bands that is rare and accepted.

use std::collections::HashMap;

use super::enemy::Enemy;
use crate::consts::ZONE_COUNT;

/// Band index for a depth
#[inline]
pub fn zone_of(z: f32) -> i32 {
    (z * ZONE_COUNT).floor() as i32
}

/// Indices into the frame's enemy list, grouped by depth band
#[derive(Debug, Default)]
pub struct ZonePartition {
    zones: HashMap<i32, Vec<usize>>,
}

impl ZonePartition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from alive, active enemies. Bucket vectors are reused between
    /// frames; indices are only valid for the `enemies` slice given here.
    pub fn rebuild(&mut self, enemies: &[Enemy]) {
        for bucket in self.zones.values_mut() {
            bucket.clear();
        }
        for (index, enemy) in enemies.iter().enumerate() {
            if enemy.is_hostile() {
                self.zones
                    .entry(zone_of(enemy.depth()))
                    .or_default()
                    .push(index);
            }
        }
    }

    /// Enemy indices sharing the band of depth `z`
    pub fn candidates(&self, z: f32) -> &[usize] {
        self.zones
            .get(&zone_of(z))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total enemies bucketed this frame
    pub fn len(&self) -> usize {
        self.zones.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
