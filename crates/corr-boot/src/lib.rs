//! Binning and seeded bootstrap resampling along the configuration axis.
//!
//! Every routine treats the last axis of its input as the configuration axis
//! and leaves all leading axes untouched.

pub mod binning;
pub mod bootstrap;
pub mod complex;

pub use binning::{bin, truncate_configs};
pub use bootstrap::{bootstrap, Resampler};
pub use complex::{bootstrap_complex, ComplexBoot};

use corr_core::errors::{CorrError, ErrorInfo};
use ndarray::{ArrayBase, Axis, Data, IxDyn};

pub(crate) fn resample_error(code: &str, message: impl Into<String>) -> CorrError {
    CorrError::Resample(ErrorInfo::new(code, message))
}

/// Returns the configuration axis and its length, rejecting scalars and empty axes.
pub(crate) fn config_axis<S>(data: &ArrayBase<S, IxDyn>) -> Result<(Axis, usize), CorrError>
where
    S: Data,
{
    if data.ndim() == 0 {
        return Err(resample_error(
            "scalar-input",
            "resampling needs at least one axis",
        ));
    }
    let axis = Axis(data.ndim() - 1);
    let length = data.len_of(axis);
    if length == 0 {
        return Err(CorrError::Config(
            ErrorInfo::new("empty-config-axis", "configuration axis is empty")
                .with_shape("shape", data.shape()),
        ));
    }
    Ok((axis, length))
}
