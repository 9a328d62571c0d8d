//! Filesystem persistence for the correlator stages.
//!
//! Numeric arrays are written with `bincode`, quantum numbers as indented
//! JSON next to them. Every stage writes a manifest of SHA-256 digests.

/// Binary and JSON encodings of stage files.
pub mod codec;
/// Directory and file naming.
pub mod layout;
/// Output digests and per-stage manifests.
pub mod manifest;
/// Typed load and save of stage data.
pub mod store;

pub use codec::{canonical_json, Encoding};
pub use layout::{Layout, Stem};
pub use manifest::{hash_bytes, hash_file, hash_json, StageManifest};
pub use store::{load_array, load_qn, save_array, save_qn, DataStore};
