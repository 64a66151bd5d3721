//! Loading of lapd.yml
//!
//! A missing file is replaced by the default configuration before it is
//! read back, so a fresh checkout always has something to edit.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::Config;
use crate::error::{LapdError, Result};

/// Configuration file looked up in the current directory
pub const DEFAULT_CONFIG_FILE: &str = "lapd.yml";

/// Load and validate the configuration at `path`
///
/// Creates the file with [`Config::default_template`] if it does not exist.
pub fn load(path: &Path) -> Result<Config> {
    if !path.exists() {
        write_default(path)?;
    }

    let yaml = fs::read_to_string(path).map_err(|e| LapdError::ConfigReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let config = Config::from_yaml(&yaml).map_err(|e| match e {
        LapdError::ConfigParseFailed { reason, .. } => LapdError::ConfigParseFailed {
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })?;
    config.validate()?;

    debug!(
        path = %path.display(),
        functions = config.functions.len(),
        "configuration loaded"
    );
    Ok(config)
}

/// Persist the default configuration at `path`
pub fn write_default(path: &Path) -> Result<()> {
    let write_failed = |reason: String| LapdError::ConfigWriteFailed {
        path: path.display().to_string(),
        reason,
    };

    let yaml = Config::default_template()
        .to_yaml()
        .map_err(|e| write_failed(e.to_string()))?;
    fs::write(path, yaml).map_err(|e| write_failed(e.to_string()))?;

    info!(path = %path.display(), "created default configuration");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_creates_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILE);

        let config = load(&path).unwrap();

        assert!(path.is_file());
        assert_eq!(config, Config::default_template());

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("s3_bucket: lapd"));
        assert!(written.contains("package: deploy.zip"));
        assert!(written.contains("name: default"));
    }

    #[test]
    fn test_load_keeps_existing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            "functions:\n  - name: worker\n    filter: []\ns3_bucket: b\npackage: k\nlocal_package_name: out.zip\n",
        )
        .unwrap();

        let config = load(&path).unwrap();

        assert_eq!(config.functions[0].name, "worker");
        assert_eq!(config.s3_bucket, "b");
        assert!(!fs::read_to_string(&path).unwrap().contains("default"));
    }

    #[test]
    fn test_load_malformed_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "functions: [unclosed").unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, LapdError::ConfigParseFailed { .. }));
        assert!(err.to_string().contains("lapd.yml"));
    }

    #[test]
    fn test_load_unreadable_path() {
        let temp = TempDir::new().unwrap();
        // A directory exists but cannot be read as a file
        let path = temp.path().join("lapd.yml");
        fs::create_dir(&path).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, LapdError::ConfigReadFailed { .. }));
    }

    #[test]
    fn test_write_default_into_missing_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join("lapd.yml");

        let err = write_default(&path).unwrap_err();
        assert!(matches!(err, LapdError::ConfigWriteFailed { .. }));
    }

    #[test]
    fn test_load_rejects_duplicate_functions() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            "functions:\n  - name: api\n  - name: api\ns3_bucket: b\npackage: k\nlocal_package_name: out.zip\n",
        )
        .unwrap();

        assert!(matches!(load(&path), Err(LapdError::ConfigInvalid { .. })));
    }
}
