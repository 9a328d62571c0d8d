//! Subduction coefficient capability and a JSON-backed table implementation.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use corr_core::errors::{CorrError, ErrorInfo};
use corr_core::momentum::Momentum;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Coefficient of a two-particle source operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCoefficient {
    /// Momenta of the two particles.
    pub momenta: [Momentum; 2],
    /// Complex weight of the momentum combination.
    pub coefficient: Complex64,
}

/// Coefficients of a single-particle sink operator, one per spatial gamma
/// component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkCoefficient {
    /// Sink momentum.
    pub momentum: Momentum,
    /// Weights of the x, y and z components.
    pub components: [Complex64; 3],
}

/// Source and sink rows of one irrep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IrrepCoefficients {
    /// One entry list per irrep row for the source operator.
    pub source: Vec<Vec<SourceCoefficient>>,
    /// One entry list per irrep row for the sink operator.
    pub sink: Vec<Vec<SinkCoefficient>>,
}

impl IrrepCoefficients {
    /// Number of rows processed: the rows both tables provide.
    ///
    /// Differing row counts are logged and tolerated.
    pub fn common_rows(&self, irrep: &str) -> usize {
        if self.source.len() != self.sink.len() {
            log::warn!(
                "irrep {irrep}: source and sink coefficients differ in row count ({} vs {})",
                self.source.len(),
                self.sink.len()
            );
        }
        self.source.len().min(self.sink.len())
    }
}

/// Supplies subduction coefficients by irrep name.
pub trait CoefficientProvider {
    /// Two-particle source rows of `irrep`.
    fn source_rows(&self, irrep: &str) -> Result<Vec<Vec<SourceCoefficient>>, CorrError>;

    /// Single-particle sink rows of `irrep`.
    fn sink_rows(&self, irrep: &str) -> Result<Vec<Vec<SinkCoefficient>>, CorrError>;

    /// Both tables of `irrep`.
    fn coefficients(&self, irrep: &str) -> Result<IrrepCoefficients, CorrError> {
        Ok(IrrepCoefficients {
            source: self.source_rows(irrep)?,
            sink: self.sink_rows(irrep)?,
        })
    }
}

/// Coefficient tables keyed by irrep name, typically loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TableProvider {
    irreps: BTreeMap<String, IrrepCoefficients>,
}

impl TableProvider {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the table of one irrep.
    pub fn with_irrep(mut self, name: impl Into<String>, table: IrrepCoefficients) -> Self {
        self.irreps.insert(name.into(), table);
        self
    }

    /// Names of all tabulated irreps.
    pub fn irreps(&self) -> impl Iterator<Item = &str> {
        self.irreps.keys().map(String::as_str)
    }

    /// Parses tables from JSON.
    pub fn from_json(json: &str) -> Result<Self, CorrError> {
        serde_json::from_str(json)
            .map_err(|err| CorrError::Serde(ErrorInfo::new("coefficients-parse", err.to_string())))
    }

    /// Loads tables from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CorrError> {
        let json = fs::read_to_string(path).map_err(|err| {
            CorrError::Storage(
                ErrorInfo::new("coefficients-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        Self::from_json(&json)
    }
}

impl TableProvider {
    fn table(&self, irrep: &str) -> Result<&IrrepCoefficients, CorrError> {
        self.irreps.get(irrep).ok_or_else(|| {
            CorrError::Coefficients(
                ErrorInfo::new("unknown-irrep", "no coefficient table for irrep")
                    .with_context("irrep", irrep)
                    .with_hint("add the irrep to the coefficient file"),
            )
        })
    }
}

impl CoefficientProvider for TableProvider {
    fn source_rows(&self, irrep: &str) -> Result<Vec<Vec<SourceCoefficient>>, CorrError> {
        Ok(self.table(irrep)?.source.clone())
    }

    fn sink_rows(&self, irrep: &str) -> Result<Vec<Vec<SinkCoefficient>>, CorrError> {
        Ok(self.table(irrep)?.sink.clone())
    }

    fn coefficients(&self, irrep: &str) -> Result<IrrepCoefficients, CorrError> {
        self.table(irrep).cloned()
    }
}
