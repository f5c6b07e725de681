use serde::de::DeserializeOwned;

use crate::error::LoadError;

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, LoadError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    let value = serde_path_to_error::deserialize::<_, T>(&mut *de).map_err(into_load_error)?;
    de.end().map_err(|err| LoadError::Decode { json_path: ".".to_string(), message: err.to_string() })?;
    Ok(value)
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, LoadError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize::<_, T>(&mut *de).map_err(into_load_error)?;
    de.end().map_err(|err| LoadError::Decode { json_path: ".".to_string(), message: err.to_string() })?;
    Ok(value)
}

fn into_load_error(err: serde_path_to_error::Error<serde_json::Error>) -> LoadError {
    let json_path = err.path().to_string();
    LoadError::Decode { json_path, message: err.into_inner().to_string() }
}
