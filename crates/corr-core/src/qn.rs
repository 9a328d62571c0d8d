//! Quantum-number records travelling alongside correlator arrays.

use serde::{Deserialize, Serialize};

use crate::momentum::{GevpBlock, Momentum};

/// Quantum numbers of one raw operator, aligned with axis 0 of the raw
/// correlator array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorQn {
    /// Momenta of the two source particles.
    pub source: [Momentum; 2],
    /// Sink momentum.
    pub sink: Momentum,
    /// Gamma label inserted at the sink.
    pub gamma: i32,
    /// Operator name, used when the operator is written out on its own.
    pub name: String,
}

/// Quantum numbers of one subduced correlator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubducedQn {
    /// Source momenta of the contributing coefficient entry.
    pub source: [Momentum; 2],
    /// Sink momentum of the contributing coefficient entry.
    pub sink: Momentum,
    /// GEVP block the correlator belongs to.
    pub block: GevpBlock,
    /// Squared total momentum.
    pub p_total: i32,
    /// Source polarization label.
    pub polarization: String,
    /// Display name of the gamma class.
    pub gamma_class: String,
    /// Irrep name.
    pub irrep: String,
}

impl SubducedQn {
    /// Collapses the momentum-combination dimension, keeping squared
    /// magnitudes and the label fields.
    pub fn averaged(&self) -> AveragedQn {
        AveragedQn {
            k1_sq: self.source[0].abs2(),
            k2_sq: self.source[1].abs2(),
            p_total: self.p_total,
            polarization: self.polarization.clone(),
            gamma_class: self.gamma_class.clone(),
            irrep: self.irrep.clone(),
        }
    }
}

/// Quantum numbers after averaging over momentum combinations (and rows).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AveragedQn {
    /// Squared magnitude of the first source momentum.
    pub k1_sq: i32,
    /// Squared magnitude of the second source momentum.
    pub k2_sq: i32,
    /// Squared total momentum.
    pub p_total: i32,
    /// Source polarization label.
    pub polarization: String,
    /// Display name of the gamma class.
    pub gamma_class: String,
    /// Irrep name.
    pub irrep: String,
}
