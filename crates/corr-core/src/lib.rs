#![deny(missing_docs)]
#![doc = "Core types, configuration and errors of the correlator resampling and subduction crates."]

pub mod config;
pub mod errors;
pub mod momentum;
pub mod qn;
pub mod rng;

pub use config::{
    default_gamma_classes, load_config, AnalysisConfig, BootstrapConfig, GammaClass, PathConfig,
    ProjectedPart, SubductionConfig,
};
pub use errors::{CorrError, ErrorInfo, MOMENTUM_KEY};
pub use momentum::{GevpBlock, Momentum};
pub use qn::{AveragedQn, OperatorQn, SubducedQn};
pub use rng::{RngHandle, DEFAULT_BOOT_SEED};
