//! Averaging over momentum combinations and over irrep rows.
//!
//! Both reductions take the arithmetic mean. The metadata of the first entry
//! stands in for the whole group, since the physical quantum numbers no longer
//! depend on the dropped dimension.

use std::collections::BTreeMap;

use corr_core::errors::{CorrError, ErrorInfo};
use corr_core::qn::AveragedQn;
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

use crate::set::{CellKey, IrrepLayout, RowKey, SubducedSet};

/// Averaged correlator with its reduced quantum numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct AveragedCorrelator {
    /// Reduced quantum numbers.
    pub qn: AveragedQn,
    /// Averaged data.
    pub data: ArrayD<f64>,
    /// Number of entries that entered the mean.
    pub count: usize,
}

/// Correlators averaged over momentum combinations, one per
/// `(irrep, block, gamma class, row)` cell.
#[derive(Debug, Clone, PartialEq)]
pub struct MomentumAverage {
    /// Irrep layouts inherited from the subduced set.
    pub irreps: Vec<IrrepLayout>,
    /// Averaged cells in key order.
    pub cells: BTreeMap<CellKey, AveragedCorrelator>,
}

/// Correlators averaged over rows, one per `(irrep, block, gamma class)` cell.
#[derive(Debug, Clone, PartialEq)]
pub struct RowAverage {
    /// Irrep layouts inherited from the subduced set.
    pub irreps: Vec<IrrepLayout>,
    /// Averaged cells in key order.
    pub cells: BTreeMap<RowKey, AveragedCorrelator>,
}

/// Persisted metadata of an averaged level, parallel to its data list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AveragedIndex<K> {
    /// Irrep layouts.
    pub irreps: Vec<IrrepLayout>,
    /// Keys in storage order.
    pub keys: Vec<K>,
    /// Quantum numbers in storage order.
    pub qn: Vec<AveragedQn>,
}

fn mean_of<'a, I>(arrays: I) -> Result<(ArrayD<f64>, usize), CorrError>
where
    I: IntoIterator<Item = &'a ArrayD<f64>>,
{
    let mut iter = arrays.into_iter();
    let Some(first) = iter.next() else {
        return Err(CorrError::Consistency(ErrorInfo::new(
            "empty-average",
            "cannot average an empty cell",
        )));
    };
    let mut sum = first.clone();
    let mut count = 1usize;
    for array in iter {
        if array.shape() != sum.shape() {
            return Err(CorrError::Consistency(
                ErrorInfo::new("shape-mismatch", "averaged correlators differ in shape")
                    .with_shape("expected", sum.shape())
                    .with_shape("found", array.shape()),
            ));
        }
        sum += array;
        count += 1;
    }
    sum /= count as f64;
    Ok((sum, count))
}

/// Averages every cell over its momentum combinations.
pub fn average_momenta(set: &SubducedSet) -> Result<MomentumAverage, CorrError> {
    let mut cells = BTreeMap::new();
    for (key, list) in set.cells() {
        let (data, count) = mean_of(list.iter().map(|entry| &entry.data))?;
        let qn = list[0].qn.averaged();
        cells.insert(*key, AveragedCorrelator { qn, data, count });
    }
    log::info!("averaged {} cells over momenta", cells.len());
    Ok(MomentumAverage {
        irreps: set.irreps().to_vec(),
        cells,
    })
}

/// Averages momentum-averaged cells over irrep rows.
pub fn average_rows(average: &MomentumAverage) -> Result<RowAverage, CorrError> {
    let mut groups: BTreeMap<RowKey, Vec<&AveragedCorrelator>> = BTreeMap::new();
    for (key, cell) in &average.cells {
        groups.entry(key.without_row()).or_default().push(cell);
    }
    let mut cells = BTreeMap::new();
    for (key, group) in groups {
        let (data, count) = mean_of(group.iter().map(|cell| &cell.data))?;
        let qn = group[0].qn.clone();
        cells.insert(key, AveragedCorrelator { qn, data, count });
    }
    log::info!("averaged {} cells over rows", cells.len());
    Ok(RowAverage {
        irreps: average.irreps.clone(),
        cells,
    })
}

fn split<K: Copy>(
    irreps: &[IrrepLayout],
    cells: &BTreeMap<K, AveragedCorrelator>,
) -> (Vec<ArrayD<f64>>, AveragedIndex<K>) {
    let mut data = Vec::with_capacity(cells.len());
    let mut keys = Vec::with_capacity(cells.len());
    let mut qn = Vec::with_capacity(cells.len());
    for (key, cell) in cells {
        data.push(cell.data.clone());
        keys.push(*key);
        qn.push(cell.qn.clone());
    }
    let index = AveragedIndex {
        irreps: irreps.to_vec(),
        keys,
        qn,
    };
    (data, index)
}

impl MomentumAverage {
    /// Splits into a data list and a parallel metadata index.
    pub fn to_parts(&self) -> (Vec<ArrayD<f64>>, AveragedIndex<CellKey>) {
        split(&self.irreps, &self.cells)
    }
}

impl RowAverage {
    /// Splits into a data list and a parallel metadata index.
    pub fn to_parts(&self) -> (Vec<ArrayD<f64>>, AveragedIndex<RowKey>) {
        split(&self.irreps, &self.cells)
    }
}
