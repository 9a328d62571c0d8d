use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use corr_core::errors::{CorrError, ErrorInfo};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::codec::{canonical_json, Encoding};

/// SHA-256 digest of raw bytes, lower-case hex.
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// SHA-256 digest of a value's canonical JSON encoding.
pub fn hash_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CorrError> {
    Ok(hash_bytes(&canonical_json(value)?))
}

/// SHA-256 digest of a file's contents.
pub fn hash_file(path: &Path) -> Result<String, CorrError> {
    let bytes = fs::read(path).map_err(|err| {
        CorrError::Storage(
            ErrorInfo::new("hash-read", err.to_string()).with_context("path", path.display()),
        )
    })?;
    Ok(hash_bytes(&bytes))
}

/// Digests of everything one stage wrote for one total momentum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageManifest {
    /// Stage name, `subduce` or `boot`.
    pub stage: String,
    /// Diagram name.
    pub diagram: String,
    /// Squared total momentum.
    pub p_total: i32,
    /// Canonical hash of the configuration the stage ran with.
    pub config_hash: String,
    /// Output digests keyed by path relative to the manifest directory.
    pub outputs: BTreeMap<String, String>,
}

impl StageManifest {
    /// Starts an empty manifest.
    pub fn new(
        stage: impl Into<String>,
        diagram: impl Into<String>,
        p_total: i32,
        config_hash: String,
    ) -> Self {
        Self {
            stage: stage.into(),
            diagram: diagram.into(),
            p_total,
            config_hash,
            outputs: BTreeMap::new(),
        }
    }

    /// Hashes each written file and records it relative to `base`.
    pub fn record_all(&mut self, base: &Path, paths: &[PathBuf]) -> Result<(), CorrError> {
        for path in paths {
            let digest = hash_file(path)?;
            let key = path.strip_prefix(base).unwrap_or(path);
            self.outputs.insert(key.display().to_string(), digest);
        }
        Ok(())
    }

    /// Writes the manifest as indented JSON.
    pub fn write(&self, path: &Path) -> Result<(), CorrError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| {
                CorrError::Storage(
                    ErrorInfo::new("manifest-mkdir", err.to_string())
                        .with_context("path", parent.display()),
                )
            })?;
        }
        let json = Encoding::Json.encode(self)?;
        fs::write(path, json).map_err(|err| {
            CorrError::Storage(
                ErrorInfo::new("manifest-write", err.to_string())
                    .with_context("path", path.display()),
            )
        })
    }

    /// Loads a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, CorrError> {
        let contents = fs::read(path).map_err(|err| {
            CorrError::Storage(
                ErrorInfo::new("manifest-read", err.to_string())
                    .with_context("path", path.display()),
            )
        })?;
        Encoding::Json.decode(&contents)
    }
}
