//! Validating many log files concurrently

use std::io;
use std::path::{Path, PathBuf};

use tokio::task;
use tracing::debug;

use super::{ValidationReport, Validator};
use crate::config::Config;
use crate::source::FileSource;
use crate::{LogError, Result};

/// Extension the producer gives log files
pub const LOG_EXTENSION: &str = "bin";

/// All `*.bin` files directly inside `dir`, sorted by path
///
/// # Errors
///
/// Returns error if the directory cannot be read
pub fn collect_logs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut logs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some(LOG_EXTENSION) {
            logs.push(path);
        }
    }
    logs.sort();
    Ok(logs)
}

/// Validate one file on disk
///
/// # Errors
///
/// Returns [`LogError::FileNotFound`] if the file does not exist, otherwise
/// as [`Validator::run`]
pub fn validate_path(path: &Path, config: &Config) -> Result<ValidationReport> {
    if !path.exists() {
        return Err(LogError::FileNotFound(path.display().to_string()));
    }

    Validator::new(config.clone())
        .with_label(path.display().to_string())
        .run(&FileSource::new(path))
}

/// Validate each file on the blocking pool, one task per file
///
/// Results come back in input order.
pub async fn validate_paths(
    paths: Vec<PathBuf>,
    config: &Config,
) -> Vec<(PathBuf, Result<ValidationReport>)> {
    let handles: Vec<_> = paths
        .into_iter()
        .map(|path| {
            let config = config.clone();
            let task_path = path.clone();
            let handle = task::spawn_blocking(move || validate_path(&task_path, &config));
            (path, handle)
        })
        .collect();

    debug!("Spawned {} validation tasks", handles.len());

    let mut results = Vec::with_capacity(handles.len());
    for (path, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(LogError::Io(io::Error::other(e.to_string()))),
        };
        results.push((path, result));
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::LogBuilder;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_collect_logs() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "log_002.bin", b"");
        write(temp_dir.path(), "log_001.bin", b"");
        write(temp_dir.path(), "notes.txt", b"");
        std::fs::create_dir(temp_dir.path().join("nested.bin")).unwrap();

        let logs = collect_logs(temp_dir.path()).unwrap();
        let names: Vec<_> = logs
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["log_001.bin", "log_002.bin"]);
    }

    #[test]
    fn test_validate_missing_path() {
        let result = validate_path(Path::new("/nonexistent/log.bin"), &Config::default());
        assert!(matches!(result, Err(LogError::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_validate_paths_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let clean = write(
            temp_dir.path(),
            "clean.bin",
            &LogBuilder::new(1_000, 100).sequential(40).finish(),
        );
        let mut corrupt_bytes = LogBuilder::new(1_000, 100).sequential(40).finish();
        corrupt_bytes[64 + 5] ^= 0xFF;
        let corrupt = write(temp_dir.path(), "corrupt.bin", &corrupt_bytes);
        let truncated = write(temp_dir.path(), "short.bin", b"LCLG");
        let missing = temp_dir.path().join("missing.bin");

        let results = validate_paths(
            vec![clean.clone(), corrupt.clone(), truncated.clone(), missing.clone()],
            &Config::default(),
        )
        .await;

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].0, clean);
        assert!(results[0].1.as_ref().unwrap().is_valid);
        assert_eq!(results[1].0, corrupt);
        assert!(!results[1].1.as_ref().unwrap().crc_valid);
        assert!(matches!(results[2].1, Err(LogError::Format(_))));
        assert!(matches!(results[3].1, Err(LogError::FileNotFound(_))));
    }
}
