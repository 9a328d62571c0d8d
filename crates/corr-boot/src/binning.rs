use corr_core::errors::{CorrError, ErrorInfo};
use ndarray::{ArrayD, Slice};

use crate::{config_axis, resample_error};

/// Averages consecutive blocks of `bin_size` configurations.
///
/// Produces `ceil(L / bin_size)` bins. The last bin averages whatever remains
/// and may therefore cover fewer than `bin_size` configurations.
pub fn bin(data: &ArrayD<f64>, bin_size: usize) -> Result<ArrayD<f64>, CorrError> {
    if bin_size == 0 {
        return Err(CorrError::Config(
            ErrorInfo::new("invalid-bin-size", "bin size must be positive")
                .with_hint("set bootstrap.bin_size to at least 1"),
        ));
    }
    let (axis, length) = config_axis(data)?;
    let nb_bins = length.div_ceil(bin_size);

    let mut shape = data.shape().to_vec();
    shape[axis.index()] = nb_bins;
    let mut bins = ArrayD::<f64>::zeros(shape);
    for idx in 0..nb_bins {
        let start = idx * bin_size;
        let end = (start + bin_size).min(length);
        let mean = data
            .slice_axis(axis, Slice::from(start..end))
            .mean_axis(axis)
            .ok_or_else(|| resample_error("empty-bin", "bin covers no configurations"))?;
        bins.index_axis_mut(axis, idx).assign(&mean);
    }
    log::debug!("binned {length} configurations into {nb_bins} bins of size {bin_size}");
    Ok(bins)
}

/// Keeps at most `max_configs` leading configurations.
pub fn truncate_configs(data: &ArrayD<f64>, max_configs: usize) -> Result<ArrayD<f64>, CorrError> {
    let (axis, length) = config_axis(data)?;
    let keep = length.min(max_configs);
    if keep == 0 {
        return Err(resample_error(
            "invalid-max-configs",
            "truncation must keep at least one configuration",
        ));
    }
    Ok(data.slice_axis(axis, Slice::from(0..keep)).to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, IxDyn};

    #[test]
    fn zero_bin_size_is_a_config_error() {
        let data = array![[1.0, 2.0]].into_dyn();
        let err = bin(&data, 0).unwrap_err();
        assert!(matches!(err, CorrError::Config(_)));
    }

    #[test]
    fn uneven_length_leaves_short_last_bin() {
        let data = array![[1.0, 2.0, 3.0, 4.0, 5.0]].into_dyn();
        let bins = bin(&data, 2).unwrap();
        assert_eq!(bins.shape(), &[1, 3]);
        assert_eq!(bins[IxDyn(&[0, 0])], 1.5);
        assert_eq!(bins[IxDyn(&[0, 1])], 3.5);
        assert_eq!(bins[IxDyn(&[0, 2])], 5.0);
    }

    #[test]
    fn oversized_bin_collapses_to_mean() {
        let data = array![[2.0, 4.0, 6.0]].into_dyn();
        let bins = bin(&data, 10).unwrap();
        assert_eq!(bins.shape(), &[1, 1]);
        assert_eq!(bins[IxDyn(&[0, 0])], 4.0);
    }

    #[test]
    fn truncation_keeps_leading_configs() {
        let data = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]].into_dyn();
        let cut = truncate_configs(&data, 2).unwrap();
        assert_eq!(cut, array![[1.0, 2.0], [4.0, 5.0]].into_dyn());
        let untouched = truncate_configs(&data, 10).unwrap();
        assert_eq!(untouched, data);
    }
}
