//! Irrep subduction of raw lattice correlators and the averaging passes that
//! follow it.

pub mod average;
pub mod coefficients;
pub mod lookup;
pub mod set;
pub mod subduce;

pub use average::{
    average_momenta, average_rows, AveragedCorrelator, AveragedIndex, MomentumAverage, RowAverage,
};
pub use coefficients::{
    CoefficientProvider, IrrepCoefficients, SinkCoefficient, SourceCoefficient, TableProvider,
};
pub use lookup::{admissible_pairs, gevp_blocks, single_momenta};
pub use set::{
    CellKey, IrrepLayout, KeyedQn, RowKey, SubducedCorrelator, SubducedIndex, SubducedSet,
};
pub use subduce::{RawCorrelators, Subducer};
