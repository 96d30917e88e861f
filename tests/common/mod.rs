#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use encoding_rs::UTF_8;
use tempfile::{TempDir, tempdir};
use vehicle_thefts::{
    config::DatasetConfig,
    dataset::{self, Table},
    prepare,
};

pub const SAMPLE: &str = "thefts_sample.csv";

/// Returns the absolute path to a fixture under `tests/data`.
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join(name)
}

/// Loads and prepares the bundled sample snapshot.
pub fn prepared_sample() -> Table {
    let raw = dataset::load_table(&fixture_path(SAMPLE), b',', UTF_8).expect("load sample");
    let (table, _) = prepare::prepare(raw, &DatasetConfig::default()).expect("prepare sample");
    table
}

/// Scratch directory helper that cleans up files automatically on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let mut file = File::create(&path).expect("create temp file");
        file.write_all(contents.as_bytes())
            .expect("write temp file contents");
        path
    }
}
