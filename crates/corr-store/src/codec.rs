use corr_core::errors::{CorrError, ErrorInfo};
use serde::{de::DeserializeOwned, Serialize};

/// On-disk encoding of a stage file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Compact binary form of numeric arrays.
    Bincode,
    /// Indented JSON for quantum numbers and manifests.
    Json,
}

impl Encoding {
    fn name(self) -> &'static str {
        match self {
            Encoding::Bincode => "bincode",
            Encoding::Json => "json",
        }
    }

    fn error<T: ?Sized>(self, action: &str, err: impl ToString) -> CorrError {
        CorrError::Serde(
            ErrorInfo::new(format!("{}-{action}", self.name()), err.to_string())
                .with_context("type", std::any::type_name::<T>()),
        )
    }

    /// Encodes `value`.
    pub fn encode<T: Serialize + ?Sized>(self, value: &T) -> Result<Vec<u8>, CorrError> {
        let encoded = match self {
            Encoding::Bincode => bincode::serialize(value).map_err(|err| err.to_string()),
            Encoding::Json => serde_json::to_vec_pretty(value).map_err(|err| err.to_string()),
        };
        encoded.map_err(|err| self.error::<T>("encode", err))
    }

    /// Decodes a value of type `T`.
    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T, CorrError> {
        let decoded = match self {
            Encoding::Bincode => bincode::deserialize(bytes).map_err(|err| err.to_string()),
            Encoding::Json => serde_json::from_slice(bytes).map_err(|err| err.to_string()),
        };
        decoded.map_err(|err| self.error::<T>("decode", err))
    }
}

/// Compact JSON with object keys in sorted order, used for digests.
///
/// `serde_json::Map` keeps keys sorted, so going through `Value` orders every
/// nested object.
pub fn canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CorrError> {
    let encode_error = |err: serde_json::Error| Encoding::Json.error::<T>("encode", err);
    let value = serde_json::to_value(value).map_err(encode_error)?;
    serde_json::to_vec(&value).map_err(encode_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use ndarray::{ArrayD, IxDyn};
    use num_complex::Complex64;

    #[test]
    fn bincode_keeps_complex_arrays() {
        let data = ArrayD::from_elem(IxDyn(&[2, 3]), Complex64::new(0.5, -1.5));
        let bytes = Encoding::Bincode.encode(&data).unwrap();
        let restored: ArrayD<Complex64> = Encoding::Bincode.decode(&bytes).unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn canonical_json_sorts_keys() {
        let mut map = HashMap::new();
        map.insert("zeta", 1);
        map.insert("alpha", 2);
        let bytes = canonical_json(&map).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"alpha":2,"zeta":1}"#);
    }

    #[test]
    fn decode_errors_name_the_target_type() {
        let err = Encoding::Json.decode::<Vec<i32>>(b"{").unwrap_err();
        assert_eq!(err.info().code, "json-decode");
        assert!(err.info().context["type"].contains("Vec<i32>"));
    }
}
