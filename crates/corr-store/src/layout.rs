//! On-disk naming of every stage input and output.
//!
//! All files of one total momentum live under `<root>/p<p>/`. A [`Stem`]
//! names a data/quantum-number pair: the array goes to `<stem>.bin`, its
//! metadata to `<stem>_qn.json`.

use std::path::{Path, PathBuf};

use corr_core::config::PathConfig;
use corr_core::qn::SubducedQn;

/// Extension-less path naming a data file and its quantum-number companion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stem(PathBuf);

impl Stem {
    /// Wraps a path without extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// The bare stem path.
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Appends `suffix` to the file name.
    pub fn with_suffix(&self, suffix: &str) -> Stem {
        let mut name = self.0.clone().into_os_string();
        name.push(suffix);
        Stem(PathBuf::from(name))
    }

    /// Path of the binary array file.
    pub fn data_path(&self) -> PathBuf {
        self.with_suffix(".bin").0
    }

    /// Path of the quantum-number JSON file.
    pub fn qn_path(&self) -> PathBuf {
        self.with_suffix("_qn.json").0
    }
}

/// Directory layout of one diagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    read_root: PathBuf,
    boot_root: PathBuf,
    diagram: String,
}

impl Layout {
    /// Creates the layout for `diagram` below the configured roots.
    pub fn new(paths: &PathConfig, diagram: impl Into<String>) -> Self {
        Self {
            read_root: paths.read_root.clone(),
            boot_root: paths.boot_root.clone(),
            diagram: diagram.into(),
        }
    }

    /// Diagram name used in file names.
    pub fn diagram(&self) -> &str {
        &self.diagram
    }

    /// Per-momentum directory below the input root.
    pub fn read_dir(&self, p: i32) -> PathBuf {
        self.read_root.join(format!("p{p}"))
    }

    /// Per-momentum directory below the bootstrap root.
    pub fn boot_dir(&self, p: i32) -> PathBuf {
        self.boot_root.join(format!("p{p}"))
    }

    fn stem_in(&self, dir: PathBuf, p: i32) -> Stem {
        Stem(dir.join(format!("{}_p{p}", self.diagram)))
    }

    /// Raw complex correlators produced by the contraction code.
    pub fn raw(&self, p: i32) -> Stem {
        self.stem_in(self.read_dir(p), p)
    }

    /// Subduced correlators before resampling.
    pub fn subduced(&self, p: i32) -> Stem {
        self.raw(p).with_suffix("_subduced")
    }

    /// Subduced correlators averaged over momentum combinations.
    pub fn subduced_avg_momenta(&self, p: i32) -> Stem {
        self.raw(p).with_suffix("_subduced_avg_vecks")
    }

    /// Subduced correlators averaged over momenta and rows.
    pub fn subduced_avg_rows(&self, p: i32) -> Stem {
        self.raw(p).with_suffix("_subduced_avg_rows")
    }

    /// Bootstrapped raw correlators; split into `_real` and `_imag` data.
    pub fn boot_raw(&self, p: i32) -> Stem {
        self.stem_in(self.boot_dir(p), p)
    }

    /// One bootstrapped raw operator.
    pub fn boot_operator(&self, p: i32, name: &str) -> Stem {
        Stem(self.boot_dir(p).join("raw").join(name))
    }

    /// Bootstrapped subduced correlators.
    pub fn boot_subduced(&self, p: i32) -> Stem {
        self.boot_raw(p).with_suffix("_subduced")
    }

    /// Bootstrapped correlators averaged over momentum combinations.
    pub fn boot_avg_momenta(&self, p: i32) -> Stem {
        self.boot_raw(p).with_suffix("_subduced_avg_vecks")
    }

    /// Bootstrapped correlators averaged over momenta and rows.
    pub fn boot_avg_rows(&self, p: i32) -> Stem {
        self.boot_raw(p).with_suffix("_subduced_avg_rows")
    }

    /// One bootstrapped subduced correlator.
    pub fn boot_correlator(&self, p: i32, name: &str) -> PathBuf {
        self.boot_dir(p).join("subduced").join(format!("{name}.bin"))
    }

    /// Name of one subduced correlator file, unique within its momentum.
    pub fn correlator_name(&self, row: usize, qn: &SubducedQn) -> String {
        format!(
            "{}_uu_{}_{}_{}_{}.d000.{}_{}.d000.{}",
            self.diagram,
            qn.irrep,
            row,
            qn.source[0].label(),
            qn.source[1].label(),
            qn.polarization,
            qn.sink.label(),
            qn.gamma_class,
        )
    }
}
