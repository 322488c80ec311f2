//! Named log files under the loader's logs directory.

use std::path::{Path, PathBuf};

use crate::error::FileOpsError;

/// Log file name stamped with the current local time.
pub fn default_log_name() -> String {
    chrono::Local::now()
        .format("maploader-%Y%m%d-%H%M%S.log")
        .to_string()
}

/// Writes `message` plus a newline to `<logs_dir>/<filename>`.
///
/// Creates `logs_dir` on demand and replaces an existing file of the same
/// name. Returns the written path.
pub fn write_log_file(
    logs_dir: &Path,
    filename: &str,
    message: &str,
) -> Result<PathBuf, FileOpsError> {
    if !crate::is_plain_name(filename) {
        return Err(FileOpsError::InvalidName(filename.to_string()));
    }

    std::fs::create_dir_all(logs_dir)?;
    let path = logs_dir.join(filename);
    std::fs::write(&path, format!("{message}\n"))?;

    tracing::debug!(path = %path.display(), bytes = message.len() + 1, "wrote log file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_message_with_newline() {
        let tmp = tempfile::tempdir().unwrap();
        let logs = tmp.path().join("logs");

        let path = write_log_file(&logs, "import.log", "imported LIS").unwrap();
        assert_eq!(path, logs.join("import.log"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "imported LIS\n");
    }

    #[test]
    fn overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        write_log_file(tmp.path(), "a.log", "first").unwrap();
        let path = write_log_file(tmp.path(), "a.log", "second").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "second\n");
    }

    #[test]
    fn rejects_paths_as_names() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["../escape.log", "sub/a.log", "", ".."] {
            assert!(
                matches!(
                    write_log_file(tmp.path(), name, "x"),
                    Err(FileOpsError::InvalidName(_))
                ),
                "name {name:?}"
            );
        }
    }

    #[test]
    fn default_name_is_timestamped() {
        let name = default_log_name();
        assert!(name.starts_with("maploader-"));
        assert!(name.ends_with(".log"));
        assert!(crate::is_plain_name(&name));
    }
}
