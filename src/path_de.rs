use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::LoadError;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str, origin: &str) -> Result<T, LoadError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| LoadError::Json {
        origin: origin.to_string(),
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

/// Same, from an already-parsed document (e.g. one jq result).
pub fn from_value_with_path<T: DeserializeOwned>(value: Value, origin: &str) -> Result<T, LoadError> {
    serde_path_to_error::deserialize::<_, T>(value).map_err(|err| LoadError::Json {
        origin: origin.to_string(),
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

/// Read a file and deserialize it with path context.
pub fn from_file_with_path<T: DeserializeOwned>(path: &std::path::Path) -> Result<T, LoadError> {
    let src = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    from_str_with_path(&src, &path.to_string_lossy())
}
