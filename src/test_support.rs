use std::path::PathBuf;
use tempfile::TempDir;

/// Path to a file under `tests/fixtures/`.
pub(crate) fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Copy fixtures into a fresh scratch directory, returning it.
pub(crate) fn scratch_with(fixtures: &[&str]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    for name in fixtures {
        std::fs::copy(fixture(name), temp_dir.path().join(name))
            .unwrap_or_else(|e| panic!("failed to copy fixture {}: {}", name, e));
    }
    temp_dir
}

pub(crate) fn read(path: impl Into<PathBuf>) -> String {
    let path = path.into();
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e))
}
