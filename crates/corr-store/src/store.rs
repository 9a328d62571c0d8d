use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use corr_core::errors::{CorrError, ErrorInfo};
use corr_core::qn::OperatorQn;
use corr_subduce::{
    AveragedIndex, CellKey, MomentumAverage, RowAverage, RowKey, SubducedIndex, SubducedSet,
};
use ndarray::{ArrayD, Axis};
use num_complex::Complex64;
use serde::{de::DeserializeOwned, Serialize};

use crate::layout::{Layout, Stem};
use crate::codec::Encoding;

fn storage_error(code: &str, err: impl ToString, path: &Path) -> CorrError {
    CorrError::Storage(ErrorInfo::new(code, err.to_string()).with_context("path", path.display()))
}

fn with_path(err: CorrError, path: &Path) -> CorrError {
    match err {
        CorrError::Serde(info) => CorrError::Serde(info.with_context("path", path.display())),
        other => other,
    }
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<PathBuf, CorrError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|err| storage_error("store-mkdir", err, parent))?;
    }
    fs::write(path, bytes).map_err(|err| storage_error("store-write", err, path))?;
    log::debug!("wrote {}", path.display());
    Ok(path.to_path_buf())
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, CorrError> {
    fs::read(path).map_err(|err| {
        let mut info =
            ErrorInfo::new("store-read", err.to_string()).with_context("path", path.display());
        if err.kind() == io::ErrorKind::NotFound {
            info = info.with_hint("run the producing stage for this momentum first");
        }
        CorrError::Storage(info)
    })
}

/// Saves an array (or list of arrays) in binary form.
pub fn save_array<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<PathBuf, CorrError> {
    let bytes = Encoding::Bincode.encode(value).map_err(|err| with_path(err, path))?;
    write_bytes(path, &bytes)
}

/// Loads a value written by [`save_array`].
pub fn load_array<T: DeserializeOwned>(path: &Path) -> Result<T, CorrError> {
    let bytes = read_bytes(path)?;
    Encoding::Bincode.decode(&bytes).map_err(|err| with_path(err, path))
}

/// Saves quantum numbers as indented JSON.
pub fn save_qn<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<PathBuf, CorrError> {
    let bytes = Encoding::Json.encode(value).map_err(|err| with_path(err, path))?;
    write_bytes(path, &bytes)
}

/// Loads quantum numbers written by [`save_qn`].
pub fn load_qn<T: DeserializeOwned>(path: &Path) -> Result<T, CorrError> {
    let bytes = read_bytes(path)?;
    Encoding::Json.decode(&bytes).map_err(|err| with_path(err, path))
}

fn check_count(code: &str, data: usize, qn: usize, stem: &Stem) -> Result<(), CorrError> {
    if data == qn {
        return Ok(());
    }
    Err(CorrError::Consistency(
        ErrorInfo::new(code, "stored data and quantum numbers differ in length")
            .with_context("data", data)
            .with_context("qn", qn)
            .with_context("stem", stem.path().display()),
    ))
}

/// Reads and writes the stage files of one diagram.
#[derive(Debug, Clone)]
pub struct DataStore {
    layout: Layout,
}

impl DataStore {
    /// Creates a store over `layout`.
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Path layout used by the store.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Writes raw correlators of momentum `p` with their operator records.
    pub fn save_raw(
        &self,
        p: i32,
        data: &ArrayD<Complex64>,
        qn: &[OperatorQn],
    ) -> Result<Vec<PathBuf>, CorrError> {
        let stem = self.layout.raw(p);
        let operators = if data.ndim() == 0 { 0 } else { data.len_of(Axis(0)) };
        check_count("qn-count", operators, qn.len(), &stem)?;
        Ok(vec![
            save_array(&stem.data_path(), data)?,
            save_qn(&stem.qn_path(), qn)?,
        ])
    }

    /// Reads raw correlators of momentum `p`; axis 0 must match the records.
    pub fn load_raw(&self, p: i32) -> Result<(ArrayD<Complex64>, Vec<OperatorQn>), CorrError> {
        let stem = self.layout.raw(p);
        let data: ArrayD<Complex64> = load_array(&stem.data_path())?;
        let qn: Vec<OperatorQn> = load_qn(&stem.qn_path())?;
        let operators = if data.ndim() == 0 { 0 } else { data.len_of(Axis(0)) };
        check_count("qn-count", operators, qn.len(), &stem)?;
        log::info!("read {operators} raw operators for p = {p}");
        Ok((data, qn))
    }

    /// Writes a subduced set as a data list and its parallel index.
    pub fn save_subduced(&self, stem: &Stem, set: &SubducedSet) -> Result<Vec<PathBuf>, CorrError> {
        let (data, index) = set.to_parts();
        Ok(vec![
            save_array(&stem.data_path(), &data)?,
            save_qn(&stem.qn_path(), &index)?,
        ])
    }

    /// Reads a subduced set written by [`DataStore::save_subduced`].
    pub fn load_subduced(&self, stem: &Stem) -> Result<SubducedSet, CorrError> {
        let data: Vec<ArrayD<f64>> = load_array(&stem.data_path())?;
        let index: SubducedIndex = load_qn(&stem.qn_path())?;
        check_count("subduced-count", data.len(), index.records.len(), stem)?;
        SubducedSet::from_parts(data, index)
    }

    /// Writes the momentum-averaged level.
    pub fn save_momentum_average(
        &self,
        stem: &Stem,
        average: &MomentumAverage,
    ) -> Result<Vec<PathBuf>, CorrError> {
        let (data, index) = average.to_parts();
        Ok(vec![
            save_array(&stem.data_path(), &data)?,
            save_qn(&stem.qn_path(), &index)?,
        ])
    }

    /// Writes the row-averaged level.
    pub fn save_row_average(
        &self,
        stem: &Stem,
        average: &RowAverage,
    ) -> Result<Vec<PathBuf>, CorrError> {
        let (data, index) = average.to_parts();
        Ok(vec![
            save_array(&stem.data_path(), &data)?,
            save_qn(&stem.qn_path(), &index)?,
        ])
    }

    /// Reads a momentum-averaged level as its raw parts.
    pub fn load_momentum_average(
        &self,
        stem: &Stem,
    ) -> Result<(Vec<ArrayD<f64>>, AveragedIndex<CellKey>), CorrError> {
        self.load_averaged(stem)
    }

    /// Reads a row-averaged level as its raw parts.
    pub fn load_row_average(
        &self,
        stem: &Stem,
    ) -> Result<(Vec<ArrayD<f64>>, AveragedIndex<RowKey>), CorrError> {
        self.load_averaged(stem)
    }

    fn load_averaged<K: DeserializeOwned>(
        &self,
        stem: &Stem,
    ) -> Result<(Vec<ArrayD<f64>>, AveragedIndex<K>), CorrError> {
        let data: Vec<ArrayD<f64>> = load_array(&stem.data_path())?;
        let index: AveragedIndex<K> = load_qn(&stem.qn_path())?;
        check_count("averaged-count", data.len(), index.qn.len(), stem)?;
        if index.keys.len() != index.qn.len() {
            return Err(CorrError::Consistency(
                ErrorInfo::new(
                    "averaged-keys",
                    "averaged keys and quantum numbers differ in length",
                )
                .with_context("stem", stem.path().display()),
            ));
        }
        Ok((data, index))
    }
}
