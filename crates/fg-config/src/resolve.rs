//! Artifact path resolution.
//!
//! Resolution order: explicit CLI path → `FRAUDGATE_PREPROCESSOR` env var →
//! per-user data directory → current directory.

use std::path::{Path, PathBuf};

/// Environment variable overriding the artifact location.
pub const PREPROCESSOR_ENV: &str = "FRAUDGATE_PREPROCESSOR";

/// Artifact filename used in default locations.
pub const DEFAULT_ARTIFACT_FILE: &str = "preprocessor.json";

/// Application subdirectory under the user data dir.
const APP_DIR_NAME: &str = "fraudgate";

/// Resolve where the fitted preprocessor lives.
///
/// Never touches the filesystem beyond asking the platform for the data
/// directory; existence is checked by the loader, which owns the error
/// message.
pub fn resolve_artifact_path(cli: Option<&Path>) -> PathBuf {
    if let Some(path) = cli {
        return path.to_path_buf();
    }

    if let Ok(env_path) = std::env::var(PREPROCESSOR_ENV) {
        if !env_path.is_empty() {
            return PathBuf::from(env_path);
        }
    }

    if let Some(data_dir) = dirs::data_dir() {
        return data_dir.join(APP_DIR_NAME).join(DEFAULT_ARTIFACT_FILE);
    }

    PathBuf::from(DEFAULT_ARTIFACT_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_path_wins_over_everything() {
        let cli = PathBuf::from("/tmp/custom.json");
        let resolved = resolve_artifact_path(Some(&cli));
        assert_eq!(resolved, cli);
    }

    #[test]
    fn default_path_ends_with_artifact_file() {
        // Without a CLI override the resolved path always points at the
        // well-known filename, wherever it lands.
        if std::env::var(PREPROCESSOR_ENV).is_ok() {
            return;
        }
        let resolved = resolve_artifact_path(None);
        assert_eq!(
            resolved.file_name().unwrap().to_str().unwrap(),
            DEFAULT_ARTIFACT_FILE
        );
    }
}
