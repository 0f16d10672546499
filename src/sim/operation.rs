//! Gate operations: arithmetic over crowd population
//!
//! An operation is plain data. `apply` is the whole rule set for how a
//! population changes; the crowd resizes itself to whatever `apply` returns.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::state::Level;
use crate::consts::MAX_POPULATION;

/// What an operation does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    Sqrt,
}

/// A kind plus its parameter (ignored for `Sqrt`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Operation {
    pub kind: OperationKind,
    pub value: u32,
}

impl Operation {
    pub const fn add(n: u32) -> Self {
        Self {
            kind: OperationKind::Add,
            value: n,
        }
    }

    pub const fn subtract(n: u32) -> Self {
        Self {
            kind: OperationKind::Subtract,
            value: n,
        }
    }

    pub const fn multiply(k: u32) -> Self {
        Self {
            kind: OperationKind::Multiply,
            value: k,
        }
    }

    pub const fn divide(k: u32) -> Self {
        Self {
            kind: OperationKind::Divide,
            value: k,
        }
    }

    pub const fn power(p: u32) -> Self {
        Self {
            kind: OperationKind::Power,
            value: p,
        }
    }

    pub const fn sqrt() -> Self {
        Self {
            kind: OperationKind::Sqrt,
            value: 0,
        }
    }

    /// Resulting population for a given count, clamped to [0, 500]
    ///
    /// Only `Subtract` can reach zero. `Divide` and `Sqrt` floor at 1 for a
    /// non-empty crowd; zero multipliers and divisors leave the count alone.
    pub fn apply(&self, count: usize) -> usize {
        let n = self.value as usize;
        match self.kind {
            OperationKind::Add => count.saturating_add(n).min(MAX_POPULATION),
            OperationKind::Subtract => count.saturating_sub(n),
            OperationKind::Multiply => {
                if n == 0 {
                    count
                } else {
                    count.saturating_mul(n).min(MAX_POPULATION)
                }
            }
            OperationKind::Divide => {
                if n == 0 || count == 0 {
                    count
                } else {
                    (count / n).max(1)
                }
            }
            OperationKind::Power => {
                if count == 0 {
                    0
                } else {
                    (count as u64)
                        .saturating_pow(self.value)
                        .min(MAX_POPULATION as u64) as usize
                }
            }
            OperationKind::Sqrt => {
                if count == 0 {
                    0
                } else {
                    count.isqrt().max(1)
                }
            }
        }
    }

    /// Gate label, e.g. `+10`, `÷3`, `√`
    pub fn symbol(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OperationKind::Add => write!(f, "+{}", self.value),
            OperationKind::Subtract => write!(f, "-{}", self.value),
            OperationKind::Multiply => write!(f, "x{}", self.value),
            OperationKind::Divide => write!(f, "÷{}", self.value),
            OperationKind::Power => write!(f, "^{}", self.value),
            OperationKind::Sqrt => f.write_str("√"),
        }
    }
}

const LEVEL_1_POOL: &[Operation] = &[
    Operation::add(10),
    Operation::add(20),
    Operation::add(30),
    Operation::add(50),
    Operation::subtract(5),
    Operation::subtract(10),
    Operation::subtract(20),
    Operation::subtract(30),
    Operation::subtract(50),
    Operation::multiply(2),
    Operation::multiply(3),
];

const LEVEL_2_POOL: &[Operation] = &[
    Operation::multiply(2),
    Operation::multiply(3),
    Operation::multiply(4),
    Operation::multiply(5),
    Operation::divide(2),
    Operation::divide(3),
    Operation::divide(4),
    Operation::divide(5),
    Operation::divide(6),
    Operation::divide(7),
    Operation::divide(8),
    Operation::divide(10),
    Operation::sqrt(),
    Operation::power(2),
    Operation::power(3),
    Operation::add(30),
    Operation::subtract(30),
];

const LEVEL_3_POOL: &[Operation] = &[
    Operation::multiply(2),
    Operation::multiply(3),
    Operation::multiply(4),
    Operation::multiply(5),
    Operation::divide(2),
    Operation::divide(3),
    Operation::divide(5),
    Operation::divide(7),
    Operation::divide(10),
    Operation::divide(15),
    Operation::divide(20),
    Operation::sqrt(),
    Operation::power(2),
    Operation::power(3),
    Operation::add(40),
    Operation::subtract(40),
];

/// Catalogue of operations a level can show (legend / HUD)
pub fn operation_pool(level: Level) -> &'static [Operation] {
    match level {
        Level::One => LEVEL_1_POOL,
        Level::Two => LEVEL_2_POOL,
        Level::Three => LEVEL_3_POOL,
    }
}
