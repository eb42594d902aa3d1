use crate::config::DemoConfig;
use tempfile::TempDir;

/// Configuration whose file paths all live under `dir`.
///
/// The restricted path is the directory itself, which cannot be opened for writing.
pub(crate) fn temp_config(dir: &TempDir) -> DemoConfig {
    DemoConfig {
        restricted_path: dir.path().to_path_buf(),
        missing_path: dir.path().join("nonexistent.txt"),
        data_path: dir.path().join("test.dat"),
        database_path: dir.path().join("nonexistentdb").join("app.db"),
        color: false,
        ..DemoConfig::default()
    }
}
