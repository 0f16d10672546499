//! Gates: a left and a right operation, one of which the crowd walks through

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::crowd::Crowd;
use super::operation::Operation;
use super::state::Level;
use crate::consts::*;

/// Which half of the road
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Side of the road a lateral position falls on
    #[inline]
    pub fn of(x: f32) -> Self {
        if x < GATE_SPLIT_X { Side::Left } else { Side::Right }
    }

    /// Steer direction that moves toward this side
    #[inline]
    pub fn direction(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Families of operation pairs a gate can be drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateArchetype {
    /// +n against -m
    AddSubtract,
    /// ×n against ÷m
    MultiplyDivide,
    /// ^n against √
    PowerSqrt,
    /// ÷10..20 against ×2..3
    ExtremeDivide,
}

const ADD_SUBTRACT_VALUES: &[u32] = &[10, 20, 30, 40, 50];
const MULTIPLY_DIVIDE_FACTORS: &[u32] = &[2, 3, 4, 5];
const POWERS: &[u32] = &[2, 3];
const EXTREME_DIVISORS: &[u32] = &[10, 15, 20];
const EXTREME_MULTIPLIERS: &[u32] = &[2, 3];

fn pick<R: Rng + ?Sized>(values: &[u32], rng: &mut R) -> u32 {
    values.choose(rng).copied().unwrap_or(1)
}

impl GateArchetype {
    /// Draw a (left, right) pair. A coin flip decides which side gets which
    /// operation; magnitudes are drawn per side.
    pub fn roll<R: Rng + ?Sized>(self, rng: &mut R) -> (Operation, Operation) {
        match self {
            GateArchetype::AddSubtract => {
                let left = pick(ADD_SUBTRACT_VALUES, rng);
                let right = pick(ADD_SUBTRACT_VALUES, rng);
                if rng.random_bool(0.5) {
                    (Operation::add(left), Operation::subtract(right))
                } else {
                    (Operation::subtract(left), Operation::add(right))
                }
            }
            GateArchetype::MultiplyDivide => {
                let left = pick(MULTIPLY_DIVIDE_FACTORS, rng);
                let right = pick(MULTIPLY_DIVIDE_FACTORS, rng);
                if rng.random_bool(0.5) {
                    (Operation::multiply(left), Operation::divide(right))
                } else {
                    (Operation::divide(left), Operation::multiply(right))
                }
            }
            GateArchetype::PowerSqrt => {
                let power = pick(POWERS, rng);
                if rng.random_bool(0.5) {
                    (Operation::power(power), Operation::sqrt())
                } else {
                    (Operation::sqrt(), Operation::power(power))
                }
            }
            GateArchetype::ExtremeDivide => {
                let left_divide = pick(EXTREME_DIVISORS, rng);
                let right_divide = pick(EXTREME_DIVISORS, rng);
                let left_multiply = pick(EXTREME_MULTIPLIERS, rng);
                let right_multiply = pick(EXTREME_MULTIPLIERS, rng);
                if rng.random_bool(0.5) {
                    (
                        Operation::divide(left_divide),
                        Operation::multiply(right_multiply),
                    )
                } else {
                    (
                        Operation::multiply(left_multiply),
                        Operation::divide(right_divide),
                    )
                }
            }
        }
    }
}

/// Outcome of a gate crossing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GatePass {
    pub side: Side,
    pub operation: Operation,
    pub before: usize,
    pub after: usize,
}

/// A paired checkpoint spanning the road
#[derive(Debug, Clone)]
pub struct Gate {
    /// Depth
    pub z: f32,
    /// One-shot: set when the crowd passes through
    pub used: bool,
    pub left: Operation,
    pub right: Operation,
    pub archetype: GateArchetype,
}

impl Gate {
    /// Random gate for a level
    pub fn new<R: Rng + ?Sized>(z: f32, level: Level, rng: &mut R) -> Self {
        let archetype = level
            .archetypes()
            .choose(rng)
            .copied()
            .unwrap_or(GateArchetype::AddSubtract);
        let (left, right) = archetype.roll(rng);
        Self {
            z,
            used: false,
            left,
            right,
            archetype,
        }
    }

    /// Gate with fixed operations
    pub fn with_operations(
        z: f32,
        archetype: GateArchetype,
        left: Operation,
        right: Operation,
    ) -> Self {
        Self {
            z,
            used: false,
            left,
            right,
            archetype,
        }
    }

    pub fn operation(&self, side: Side) -> Operation {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// (left, right) labels for the renderer
    pub fn symbols(&self) -> (String, String) {
        (self.left.symbol(), self.right.symbol())
    }

    /// Near and far depth of the gate panels
    pub fn span(&self) -> (f32, f32) {
        (self.z - GATE_DEPTH / 2.0, self.z + GATE_DEPTH / 2.0)
    }

    /// Apply the operation on the crowd's side once the lead unit reaches
    /// the gate. Fires at most once per gate.
    pub fn resolve<R: Rng + ?Sized>(
        &mut self,
        crowd: &mut Crowd,
        rng: &mut R,
    ) -> Option<GatePass> {
        if self.used {
            return None;
        }
        let lead = crowd.lead_depth()?;
        if (lead - self.z).abs() >= GATE_TOLERANCE {
            return None;
        }

        let side = Side::of(crowd.center_x());
        let operation = self.operation(side);
        let (before, after) = crowd.apply(operation, rng);
        self.used = true;

        Some(GatePass {
            side,
            operation,
            before,
            after,
        })
    }
}
