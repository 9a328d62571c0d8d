//! The two batch stages, each run for one squared total momentum at a time.
//!
//! A stage reads its inputs through a [`DataStore`], writes every output
//! level and finishes with a `manifest.json` listing SHA-256 digests of the
//! files it wrote. Errors abort the current momentum only; files written for
//! earlier momenta stay on disk.

use std::path::{Path, PathBuf};

use corr_boot::{bootstrap_complex, Resampler};
use corr_core::config::AnalysisConfig;
use corr_core::errors::CorrError;
use corr_store::{hash_json, save_array, save_qn, DataStore, StageManifest, Stem};
use corr_subduce::{
    average_momenta, average_rows, CoefficientProvider, RawCorrelators, SubducedSet, Subducer,
};
use ndarray::Axis;

/// Outcome of one stage for one momentum.
#[derive(Debug, Clone)]
pub struct StageReport {
    /// Squared total momentum.
    pub p_total: i32,
    /// Number of subduced correlators handled.
    pub correlators: usize,
    /// Every file the stage wrote, manifest excluded.
    pub written: Vec<PathBuf>,
    /// Location of the manifest.
    pub manifest: PathBuf,
}

/// Subduces the raw correlators of momentum `p` and writes the subduced set
/// with both averaged levels below the input root.
///
/// Errors carry `p` in their context.
pub fn subduce_momentum(
    config: &AnalysisConfig,
    p: i32,
    provider: &dyn CoefficientProvider,
    store: &DataStore,
) -> Result<StageReport, CorrError> {
    subduce_stage(config, p, provider, store).map_err(|err| err.at_momentum(p))
}

fn subduce_stage(
    config: &AnalysisConfig,
    p: i32,
    provider: &dyn CoefficientProvider,
    store: &DataStore,
) -> Result<StageReport, CorrError> {
    log::info!("subduce: p = {p}");
    let (data, qn) = store.load_raw(p)?;
    let raw = RawCorrelators::new(&data, &qn)?;
    let set = Subducer::new(&config.subduction, provider).subduce(p, raw)?;

    let layout = store.layout();
    let written = write_levels(
        store,
        &set,
        [
            layout.subduced(p),
            layout.subduced_avg_momenta(p),
            layout.subduced_avg_rows(p),
        ],
    )?;
    finish("subduce", config, p, &layout.read_dir(p), set.len(), written)
}

/// Bootstraps the subduced correlators of momentum `p`, optionally together
/// with the raw correlators, and writes the results below the bootstrap root.
///
/// Errors carry `p` in their context.
pub fn bootstrap_momentum(
    config: &AnalysisConfig,
    p: i32,
    store: &DataStore,
) -> Result<StageReport, CorrError> {
    boot_stage(config, p, store).map_err(|err| err.at_momentum(p))
}

fn boot_stage(
    config: &AnalysisConfig,
    p: i32,
    store: &DataStore,
) -> Result<StageReport, CorrError> {
    log::info!("boot: p = {p}");
    let resampler = Resampler::new(&config.bootstrap)?;
    let layout = store.layout();

    let mut written = Vec::new();
    if config.bootstrap.bootstrap_raw {
        written.extend(bootstrap_raw(&resampler, p, store)?);
    }

    let set = store.load_subduced(&layout.subduced(p))?;
    log::info!("bootstrapping {} subduced correlators", set.len());
    let boot = set.try_map_data(|data| resampler.resample_truncated(data))?;
    written.extend(write_levels(
        store,
        &boot,
        [
            layout.boot_subduced(p),
            layout.boot_avg_momenta(p),
            layout.boot_avg_rows(p),
        ],
    )?);

    for (key, list) in boot.cells() {
        for entry in list {
            let name = layout.correlator_name(key.row, &entry.qn);
            written.push(save_array(&layout.boot_correlator(p, &name), &entry.data)?);
        }
    }
    finish("boot", config, p, &layout.boot_dir(p), boot.len(), written)
}

fn bootstrap_raw(
    resampler: &Resampler<'_>,
    p: i32,
    store: &DataStore,
) -> Result<Vec<PathBuf>, CorrError> {
    let (data, qn) = store.load_raw(p)?;
    let boot = bootstrap_complex(&data, resampler)?;
    let layout = store.layout();
    let stem = layout.boot_raw(p);

    let mut written = vec![
        save_array(&stem.with_suffix("_real").data_path(), &boot.real)?,
        save_array(&stem.with_suffix("_imag").data_path(), &boot.imag)?,
        save_qn(&stem.qn_path(), &qn)?,
    ];
    for (op, record) in qn.iter().enumerate() {
        let operator = layout.boot_operator(p, &record.name);
        written.push(save_array(
            &operator.with_suffix("_real").data_path(),
            &boot.real.index_axis(Axis(0), op),
        )?);
        written.push(save_array(
            &operator.with_suffix("_imag").data_path(),
            &boot.imag.index_axis(Axis(0), op),
        )?);
    }
    Ok(written)
}

/// Averages `set` over momenta and rows, then writes all three levels to the
/// given stems in that order.
fn write_levels(
    store: &DataStore,
    set: &SubducedSet,
    [full, momenta, rows]: [Stem; 3],
) -> Result<Vec<PathBuf>, CorrError> {
    let momentum_average = average_momenta(set)?;
    let row_average = average_rows(&momentum_average)?;
    let mut written = store.save_subduced(&full, set)?;
    written.extend(store.save_momentum_average(&momenta, &momentum_average)?);
    written.extend(store.save_row_average(&rows, &row_average)?);
    Ok(written)
}

fn finish(
    stage: &str,
    config: &AnalysisConfig,
    p: i32,
    dir: &Path,
    correlators: usize,
    written: Vec<PathBuf>,
) -> Result<StageReport, CorrError> {
    let mut manifest = StageManifest::new(stage, config.diagram.clone(), p, hash_json(config)?);
    manifest.record_all(dir, &written)?;
    let path = dir.join("manifest.json");
    manifest.write(&path)?;
    log::info!("{stage}: p = {p} wrote {} files", written.len());
    Ok(StageReport {
        p_total: p,
        correlators,
        written,
        manifest: path,
    })
}
