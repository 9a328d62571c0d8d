//! Integer lattice momenta and GEVP block coordinates.

use std::fmt;
use std::ops::{Add, Neg};

use serde::{Deserialize, Serialize};

/// Three-momentum in units of `2π/L`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Momentum(pub [i32; 3]);

impl Momentum {
    /// The zero momentum.
    pub const ZERO: Momentum = Momentum([0, 0, 0]);

    /// Creates a momentum from its components.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self([x, y, z])
    }

    /// Squared magnitude, i.e. the dot product with itself.
    pub fn abs2(&self) -> i32 {
        self.0.iter().map(|c| c * c).sum()
    }

    /// Compact label used in file names, e.g. `p0-11`.
    pub fn label(&self) -> String {
        format!("p{}{}{}", self.0[0], self.0[1], self.0[2])
    }
}

impl Add for Momentum {
    type Output = Momentum;

    fn add(self, rhs: Momentum) -> Momentum {
        Momentum([
            self.0[0] + rhs.0[0],
            self.0[1] + rhs.0[1],
            self.0[2] + rhs.0[2],
        ])
    }
}

impl Neg for Momentum {
    type Output = Momentum;

    fn neg(self) -> Momentum {
        Momentum([-self.0[0], -self.0[1], -self.0[2]])
    }
}

impl fmt::Display for Momentum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.0[0], self.0[1], self.0[2])
    }
}

/// Cell of the GEVP matrix identified by the squared magnitudes of the two
/// source momenta. The reversed pair denotes the same cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GevpBlock {
    /// Squared magnitude of the first momentum (never smaller than `second`
    /// when produced by the lookup builder).
    pub first: i32,
    /// Squared magnitude of the second momentum.
    pub second: i32,
}

impl GevpBlock {
    /// Creates a block coordinate.
    pub const fn new(first: i32, second: i32) -> Self {
        Self { first, second }
    }

    /// Returns true if `(a, b)` denotes this block in either order.
    pub fn matches(&self, a: i32, b: i32) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }
}

impl fmt::Display for GevpBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}
