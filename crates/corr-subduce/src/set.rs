//! Keyed storage for subduced correlators.
//!
//! Every correlator lives next to its quantum numbers, so the data and the
//! metadata cannot drift out of alignment. Cells are addressed by a typed
//! `(irrep, block, gamma class, row)` key and iterate in key order.

use std::collections::BTreeMap;

use corr_core::errors::{CorrError, ErrorInfo};
use corr_core::momentum::GevpBlock;
use corr_core::qn::SubducedQn;
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

/// Address of one `(irrep, GEVP block, gamma class, row)` cell.
///
/// `block` indexes the irrep's retained block list, `gamma` the configured
/// gamma classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CellKey {
    /// Irrep index.
    pub irrep: usize,
    /// Block index within the irrep.
    pub block: usize,
    /// Gamma class index.
    pub gamma: usize,
    /// Irrep row.
    pub row: usize,
}

impl CellKey {
    /// The key with the row dimension dropped.
    pub fn without_row(&self) -> RowKey {
        RowKey {
            irrep: self.irrep,
            block: self.block,
            gamma: self.gamma,
        }
    }
}

/// Address of one `(irrep, GEVP block, gamma class)` cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowKey {
    /// Irrep index.
    pub irrep: usize,
    /// Block index within the irrep.
    pub block: usize,
    /// Gamma class index.
    pub gamma: usize,
}

/// Shape of one irrep inside a subduced set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrepLayout {
    /// Irrep name.
    pub name: String,
    /// Retained GEVP blocks, in lookup order.
    pub blocks: Vec<GevpBlock>,
    /// Number of rows that were processed.
    pub rows: usize,
}

/// One subduced correlator and its quantum numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct SubducedCorrelator {
    /// Quantum numbers of the momentum combination.
    pub qn: SubducedQn,
    /// Real-valued correlator with the trailing shape of the raw data.
    pub data: ArrayD<f64>,
}

/// Quantum numbers tagged with their cell, as persisted next to the data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedQn {
    /// Cell the correlator belongs to.
    pub key: CellKey,
    /// Quantum numbers of the correlator.
    pub qn: SubducedQn,
}

/// Metadata half of a flattened [`SubducedSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubducedIndex {
    /// Squared total momentum.
    pub p_total: i32,
    /// Per-irrep layout.
    pub irreps: Vec<IrrepLayout>,
    /// Gamma class display names.
    pub gamma_classes: Vec<String>,
    /// One record per correlator, in storage order.
    pub records: Vec<KeyedQn>,
}

/// Subduced correlators for one total momentum.
#[derive(Debug, Clone, PartialEq)]
pub struct SubducedSet {
    p_total: i32,
    irreps: Vec<IrrepLayout>,
    gamma_classes: Vec<String>,
    cells: BTreeMap<CellKey, Vec<SubducedCorrelator>>,
}

impl SubducedSet {
    /// Creates an empty set for total momentum `p_total`.
    pub fn new(p_total: i32, gamma_classes: Vec<String>) -> Self {
        Self {
            p_total,
            irreps: Vec::new(),
            gamma_classes,
            cells: BTreeMap::new(),
        }
    }

    /// Squared total momentum.
    pub fn p_total(&self) -> i32 {
        self.p_total
    }

    /// Irrep layouts in index order.
    pub fn irreps(&self) -> &[IrrepLayout] {
        &self.irreps
    }

    /// Gamma class names in index order.
    pub fn gamma_classes(&self) -> &[String] {
        &self.gamma_classes
    }

    /// Registers an irrep and returns its index.
    pub fn push_irrep(&mut self, layout: IrrepLayout) -> usize {
        self.irreps.push(layout);
        self.irreps.len() - 1
    }

    /// Appends a correlator to `key`, keeping insertion order within the cell.
    pub fn push(&mut self, key: CellKey, correlator: SubducedCorrelator) -> Result<(), CorrError> {
        let Some(layout) = self.irreps.get(key.irrep) else {
            return Err(key_error("unknown-irrep-index", &key));
        };
        if key.block >= layout.blocks.len()
            || key.row >= layout.rows
            || key.gamma >= self.gamma_classes.len()
        {
            return Err(key_error("cell-out-of-range", &key));
        }
        self.cells.entry(key).or_default().push(correlator);
        Ok(())
    }

    /// Correlators stored in `key`, empty if the cell was omitted.
    pub fn cell(&self, key: &CellKey) -> &[SubducedCorrelator] {
        self.cells.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Non-empty cells in key order.
    pub fn cells(&self) -> impl Iterator<Item = (&CellKey, &[SubducedCorrelator])> {
        self.cells.iter().map(|(key, list)| (key, list.as_slice()))
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Total number of correlators.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    /// Returns true if no correlator was recorded.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Applies `f` to every correlator, keeping keys and quantum numbers.
    pub fn try_map_data<F>(&self, mut f: F) -> Result<SubducedSet, CorrError>
    where
        F: FnMut(&ArrayD<f64>) -> Result<ArrayD<f64>, CorrError>,
    {
        let mut cells = BTreeMap::new();
        for (key, list) in &self.cells {
            let mapped = list
                .iter()
                .map(|entry| {
                    Ok(SubducedCorrelator {
                        qn: entry.qn.clone(),
                        data: f(&entry.data)?,
                    })
                })
                .collect::<Result<Vec<_>, CorrError>>()?;
            cells.insert(*key, mapped);
        }
        Ok(SubducedSet {
            p_total: self.p_total,
            irreps: self.irreps.clone(),
            gamma_classes: self.gamma_classes.clone(),
            cells,
        })
    }

    /// Splits the set into a data list and a parallel metadata index.
    pub fn to_parts(&self) -> (Vec<ArrayD<f64>>, SubducedIndex) {
        let mut data = Vec::with_capacity(self.len());
        let mut records = Vec::with_capacity(self.len());
        for (key, list) in &self.cells {
            for entry in list {
                data.push(entry.data.clone());
                records.push(KeyedQn {
                    key: *key,
                    qn: entry.qn.clone(),
                });
            }
        }
        let index = SubducedIndex {
            p_total: self.p_total,
            irreps: self.irreps.clone(),
            gamma_classes: self.gamma_classes.clone(),
            records,
        };
        (data, index)
    }

    /// Rebuilds a set from a data list and its metadata index.
    ///
    /// The two halves must have the same length.
    pub fn from_parts(data: Vec<ArrayD<f64>>, index: SubducedIndex) -> Result<Self, CorrError> {
        if data.len() != index.records.len() {
            return Err(CorrError::Consistency(
                ErrorInfo::new(
                    "subduced-count",
                    "subduced correlators do not agree with their quantum numbers",
                )
                .with_context("correlators", data.len())
                .with_context("records", index.records.len()),
            ));
        }
        let mut set = SubducedSet {
            p_total: index.p_total,
            irreps: index.irreps,
            gamma_classes: index.gamma_classes,
            cells: BTreeMap::new(),
        };
        for (array, record) in data.into_iter().zip(index.records) {
            set.push(
                record.key,
                SubducedCorrelator {
                    qn: record.qn,
                    data: array,
                },
            )?;
        }
        Ok(set)
    }
}

fn key_error(code: &str, key: &CellKey) -> CorrError {
    CorrError::Consistency(
        ErrorInfo::new(code, "cell key outside the subduced layout")
            .with_context("key", format!("{key:?}")),
    )
}
