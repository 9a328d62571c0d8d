use corr_core::config::BootstrapConfig;
use corr_core::errors::{CorrError, ErrorInfo};
use corr_core::rng::RngHandle;
use ndarray::ArrayD;

use crate::binning::{bin, truncate_configs};
use crate::{config_axis, resample_error};

/// Bootstraps `data` along its last axis.
///
/// Sample 0 holds the exact mean over all configurations. Samples
/// `1..boot_size` each draw `L` configuration indices uniformly with
/// replacement and average the gathered entries. The generator is re-seeded
/// from `seed` on every call, so identical inputs give bit-identical output
/// and two calls over arrays with the same configuration count use the same
/// draws.
pub fn bootstrap(
    data: &ArrayD<f64>,
    boot_size: usize,
    seed: u64,
) -> Result<ArrayD<f64>, CorrError> {
    if boot_size == 0 {
        return Err(resample_error(
            "invalid-boot-size",
            "bootstrap requires at least one sample",
        ));
    }
    let (axis, length) = config_axis(data)?;

    let mut shape = data.shape().to_vec();
    shape[axis.index()] = boot_size;
    let mut boot = ArrayD::<f64>::zeros(shape);

    let mean = data
        .mean_axis(axis)
        .ok_or_else(|| {
            CorrError::Config(ErrorInfo::new("empty-config-axis", "configuration axis is empty"))
        })?;
    boot.index_axis_mut(axis, 0).assign(&mean);

    let mut rng = RngHandle::from_seed(seed);
    let report_every = (boot_size / 10).max(1);
    for sample in 1..boot_size {
        if sample % report_every == 0 {
            log::debug!("bootstrap sample {sample}/{boot_size}");
        }
        let indices = rng.draw_indices(length, length);
        let resampled = data.select(axis, &indices).mean_axis(axis).ok_or_else(|| {
            CorrError::Resample(
                ErrorInfo::new("empty-resample", "resampled draw is empty")
                    .with_context("sample", sample),
            )
        })?;
        boot.index_axis_mut(axis, sample).assign(&resampled);
    }
    Ok(boot)
}

/// Truncation, binning and bootstrap bundled behind one immutable config.
#[derive(Debug, Clone)]
pub struct Resampler<'a> {
    config: &'a BootstrapConfig,
}

impl<'a> Resampler<'a> {
    /// Creates a resampler after validating the configuration.
    pub fn new(config: &'a BootstrapConfig) -> Result<Self, CorrError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration the resampler was built from.
    pub fn config(&self) -> &BootstrapConfig {
        self.config
    }

    /// Bins then bootstraps `data`.
    pub fn resample(&self, data: &ArrayD<f64>) -> Result<ArrayD<f64>, CorrError> {
        let binned = bin(data, self.config.bin_size)?;
        bootstrap(&binned, self.config.boot_size, self.config.seed)
    }

    /// Applies the configured truncation, then bins and bootstraps `data`.
    pub fn resample_truncated(&self, data: &ArrayD<f64>) -> Result<ArrayD<f64>, CorrError> {
        match self.config.max_configs {
            Some(max_configs) => self.resample(&truncate_configs(data, max_configs)?),
            None => self.resample(data),
        }
    }
}
