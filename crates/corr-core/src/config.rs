//! YAML-configurable parameters shared by every stage.
//!
//! A run builds one [`AnalysisConfig`], validates it once and passes it by
//! reference into binning, bootstrap and subduction. Nothing mutates it
//! afterwards.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{CorrError, ErrorInfo};
use crate::rng::DEFAULT_BOOT_SEED;

fn config_error(code: &str, message: impl Into<String>) -> CorrError {
    CorrError::Config(ErrorInfo::new(code, message))
}

/// Top level configuration of a resampling/subduction run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Diagram name used in every input and output path.
    #[serde(default = "default_diagram")]
    pub diagram: String,
    /// Squared total momenta processed one after another.
    #[serde(default = "default_momenta")]
    pub momenta: Vec<i32>,
    /// Bootstrap and binning settings.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    /// Subduction settings.
    #[serde(default)]
    pub subduction: SubductionConfig,
    /// Input and output directories.
    #[serde(default)]
    pub paths: PathConfig,
}

fn default_diagram() -> String {
    "C20".to_string()
}

fn default_momenta() -> Vec<i32> {
    vec![0]
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            diagram: default_diagram(),
            momenta: default_momenta(),
            bootstrap: BootstrapConfig::default(),
            subduction: SubductionConfig::default(),
            paths: PathConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Checks the configuration for values no stage can work with.
    pub fn validate(&self) -> Result<(), CorrError> {
        if self.diagram.is_empty() {
            return Err(config_error("empty-diagram", "diagram name must not be empty"));
        }
        if let Some(negative) = self.momenta.iter().find(|p| **p < 0) {
            return Err(CorrError::Config(
                ErrorInfo::new("negative-momentum", "squared momenta must be non-negative")
                    .with_context("p", negative),
            ));
        }
        self.bootstrap.validate()?;
        self.subduction.validate()
    }
}

/// Binning and bootstrap parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Number of configurations averaged into one bin.
    #[serde(default = "default_bin_size")]
    pub bin_size: usize,
    /// Number of bootstrap samples, including the mean in sample 0.
    #[serde(default = "default_boot_size")]
    pub boot_size: usize,
    /// Seed every bootstrap call restarts from.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Truncates the configuration axis of subduced data before binning.
    #[serde(default = "default_max_configs")]
    pub max_configs: Option<usize>,
    /// Also bootstrap the raw (non subduced) correlators.
    #[serde(default)]
    pub bootstrap_raw: bool,
}

fn default_bin_size() -> usize {
    1
}

fn default_boot_size() -> usize {
    500
}

fn default_seed() -> u64 {
    DEFAULT_BOOT_SEED
}

fn default_max_configs() -> Option<usize> {
    Some(251)
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            bin_size: default_bin_size(),
            boot_size: default_boot_size(),
            seed: default_seed(),
            max_configs: default_max_configs(),
            bootstrap_raw: false,
        }
    }
}

impl BootstrapConfig {
    /// Rejects zero bin and sample counts.
    pub fn validate(&self) -> Result<(), CorrError> {
        if self.bin_size == 0 {
            return Err(config_error("invalid-bin-size", "bin size must be positive"));
        }
        if self.boot_size == 0 {
            return Err(config_error(
                "invalid-boot-size",
                "bootstrap requires at least one sample",
            ));
        }
        if self.max_configs == Some(0) {
            return Err(config_error(
                "invalid-max-configs",
                "configuration truncation must keep at least one configuration",
            ));
        }
        Ok(())
    }
}

/// Which component of `factor * correlator` a gamma class keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectedPart {
    /// Twice the real part.
    Real,
    /// Twice the imaginary part.
    Imag,
}

/// Set of equivalent gamma labels, one per spatial component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GammaClass {
    /// Display name, e.g. `gi`.
    pub name: String,
    /// Gamma labels for the x, y and z components.
    pub labels: [i32; 3],
    /// Component kept after multiplying with the subduction factor.
    pub part: ProjectedPart,
}

impl GammaClass {
    /// Creates a gamma class.
    pub fn new(name: impl Into<String>, labels: [i32; 3], part: ProjectedPart) -> Self {
        Self {
            name: name.into(),
            labels,
            part,
        }
    }

    /// Returns true if `gamma` belongs to the class.
    pub fn contains(&self, gamma: i32) -> bool {
        self.labels.contains(&gamma)
    }
}

/// The three classes entering the GEVP: `gi`, `g0gi` and `g5g0gi`.
///
/// The purely spatial class keeps the imaginary part; the two time-like
/// classes keep the real part. This compensates the phase convention of the
/// contraction code that produced the raw data.
pub fn default_gamma_classes() -> Vec<GammaClass> {
    vec![
        GammaClass::new("gi", [1, 2, 3], ProjectedPart::Imag),
        GammaClass::new("g0gi", [10, 11, 12], ProjectedPart::Real),
        GammaClass::new("g5g0gi", [13, 14, 15], ProjectedPart::Real),
    ]
}

/// Subduction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubductionConfig {
    /// Cutoff on the squared magnitude of each single-particle momentum.
    #[serde(default = "default_p_max")]
    pub p_max: i32,
    /// Irreps subduced for each squared total momentum.
    #[serde(default = "default_irreps")]
    pub irreps: BTreeMap<i32, Vec<String>>,
    /// Gamma classes, in output order.
    #[serde(default = "default_gamma_classes")]
    pub gamma_classes: Vec<GammaClass>,
    /// Polarization label recorded in the subduced quantum numbers.
    #[serde(default = "default_polarization")]
    pub polarization: String,
}

fn default_p_max() -> i32 {
    4
}

fn default_irreps() -> BTreeMap<i32, Vec<String>> {
    let mut irreps = BTreeMap::new();
    irreps.insert(0, vec!["T1".to_string()]);
    for p in [1, 3, 4] {
        irreps.insert(p, vec!["A1".to_string(), "E2".to_string()]);
    }
    irreps
}

fn default_polarization() -> String {
    "g5".to_string()
}

impl Default for SubductionConfig {
    fn default() -> Self {
        Self {
            p_max: default_p_max(),
            irreps: default_irreps(),
            gamma_classes: default_gamma_classes(),
            polarization: default_polarization(),
        }
    }
}

impl SubductionConfig {
    /// Irreps configured for the squared total momentum `p`; empty if none.
    pub fn irreps_for(&self, p: i32) -> &[String] {
        self.irreps.get(&p).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Rejects negative cutoffs and empty gamma class lists.
    pub fn validate(&self) -> Result<(), CorrError> {
        if self.p_max < 0 {
            return Err(CorrError::Config(
                ErrorInfo::new("invalid-p-max", "momentum cutoff must be non-negative")
                    .with_context("p_max", self.p_max),
            ));
        }
        if self.gamma_classes.is_empty() {
            return Err(config_error(
                "missing-gamma-classes",
                "at least one gamma class is required",
            ));
        }
        Ok(())
    }
}

/// Directory layout of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    /// Root holding raw and subduced correlators.
    #[serde(default = "default_read_root")]
    pub read_root: PathBuf,
    /// Root receiving bootstrap ensembles.
    #[serde(default = "default_boot_root")]
    pub boot_root: PathBuf,
    /// JSON file holding the subduction coefficient tables.
    #[serde(default = "default_coefficients")]
    pub coefficients: PathBuf,
}

fn default_read_root() -> PathBuf {
    PathBuf::from("readdata")
}

fn default_boot_root() -> PathBuf {
    PathBuf::from("bootdata")
}

fn default_coefficients() -> PathBuf {
    PathBuf::from("coefficients.json")
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            read_root: default_read_root(),
            boot_root: default_boot_root(),
            coefficients: default_coefficients(),
        }
    }
}

/// Loads and validates a YAML configuration file.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, CorrError> {
    let contents = fs::read_to_string(path).map_err(|err| {
        CorrError::Storage(
            ErrorInfo::new("config-read", err.to_string()).with_context("path", path.display()),
        )
    })?;
    let config: AnalysisConfig = serde_yaml::from_str(&contents).map_err(|err| {
        CorrError::Serde(
            ErrorInfo::new("config-parse", err.to_string()).with_context("path", path.display()),
        )
    })?;
    config.validate()?;
    Ok(config)
}
