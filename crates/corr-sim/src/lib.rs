#![doc = "Per-momentum orchestration of the subduction and bootstrap stages."]

pub mod stages;

pub use stages::{bootstrap_momentum, subduce_momentum, StageReport};
