//! Locating and loading decoded-grid fixtures.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use isoband_common::{Grid, GridError};
use serde::Deserialize;

/// Two levels above this crate's manifest: `crates/test-utils/..`.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent()
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// `crates/<crate_name>/testdata` under the workspace root.
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// First existing fixture called `name`.
///
/// `$TEST_DATA_DIR` wins, then `crates/isobands/testdata`, then `testdata`
/// and `.test_files` at the workspace root.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(test_data_dir) = std::env::var("TEST_DATA_DIR") {
        candidates.push(PathBuf::from(test_data_dir).join(name));
    }

    let root = workspace_root();
    candidates.extend([
        crate_testdata_dir("isobands").join(name),
        root.join("testdata").join(name),
        root.join(".test_files").join(name),
    ]);

    candidates.into_iter().find(|path| path.exists())
}

/// Scratch directory, removed on drop.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("create scratch directory")
}

/// Scratch directory whose name starts with `prefix`, removed on drop.
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("create scratch directory")
}

/// A decoded grid as written by the upstream GRIB2 extraction step.
///
/// Field names follow that tool's JSON output; `Lats` and `Lngs` are full
/// row-major meshes the same length as `Values`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DecodedGrid {
    pub size_x: usize,
    pub size_y: usize,
    pub lats: Vec<f64>,
    pub lngs: Vec<f64>,
    pub values: Vec<f64>,
}

impl DecodedGrid {
    /// Validate the arrays into a [`Grid`].
    pub fn into_grid(self) -> Result<Grid, GridError> {
        Grid::new(self.size_x, self.size_y, self.values, self.lats, self.lngs)
    }
}

/// Load a decoded-grid JSON file into a validated [`Grid`].
pub fn load_decoded_grid(path: &Path) -> Result<Grid, Box<dyn std::error::Error + Send + Sync>> {
    let file = File::open(path)?;
    let decoded: DecodedGrid = serde_json::from_reader(BufReader::new(file))?;
    Ok(decoded.into_grid()?)
}
