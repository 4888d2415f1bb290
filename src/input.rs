//! JSON input for CLI commands.
//!
//! Every file argument accepts `-` for stdin.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::FlowError;

/// Path argument meaning "read stdin".
pub const STDIN: &str = "-";

/// Read the full text of a file, or of stdin for `-`.
pub fn read_input(path: &Path) -> Result<String, FlowError> {
    if path.as_os_str() == STDIN {
        let mut content = String::new();
        io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| FlowError::internal(format!("failed to read stdin: {}", e)))?;
        return Ok(content);
    }

    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => FlowError::file_not_found(path.display().to_string()),
        _ => FlowError::invalid_args(format!("failed to read {}: {}", path.display(), e)),
    })
}

/// Read and deserialize JSON input.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, FlowError> {
    let content = read_input(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OutputErrorCode;
    use tempfile::TempDir;

    #[test]
    fn reads_json_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("values.json");
        fs::write(&path, r#"["a", "b"]"#).unwrap();

        let values: Vec<String> = read_json(&path).unwrap();
        assert_eq!(values, vec!["a", "b"]);
    }

    #[test]
    fn missing_file_is_a_resolution_error() {
        let temp = TempDir::new().unwrap();
        let err = read_json::<Vec<String>>(&temp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, FlowError::FileNotFound { .. }));
        assert_eq!(OutputErrorCode::from(&err), OutputErrorCode::ResolutionError);
    }

    #[test]
    fn malformed_json_is_invalid_arguments() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "{").unwrap();
        let err = read_json::<Vec<String>>(&path).unwrap_err();
        assert_eq!(OutputErrorCode::from(&err), OutputErrorCode::InvalidArguments);
    }
}
