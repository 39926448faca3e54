//! Test descriptor
//!
//! Everything a single harness run needs: the executable under test, the
//! master seed, and the opaque pass-through constants.

use std::path::{Path, PathBuf};

/// Default executable path, relative to the base directory.
pub const DEFAULT_TEST_PATH: &str = "tests/speed_test";

/// Default master seed.
pub const DEFAULT_SEED: u64 = 234567;

/// Extra positional configuration forwarded to the child process
/// uninterpreted.
pub const DEFAULT_EXTRA_ARGS: (u32, u32) = (30, 50);

/// Descriptor for one harness run.
#[derive(Clone, Debug)]
pub struct TestSpec {
    /// Path to the primary executable, relative to `base_dir`.
    pub test_path: PathBuf,
    /// Master seed for the per-run random generator.
    pub seed: u64,
    /// Two opaque constants passed through to the child process.
    pub extra_args: (u32, u32),
    /// Directory the run is rooted in; scratch directories and the
    /// well-known results file live here.
    pub base_dir: PathBuf,
}

impl TestSpec {
    /// Create a spec with the default extra constants, rooted in the
    /// current directory.
    pub fn new(test_path: impl Into<PathBuf>, seed: u64) -> Self {
        Self {
            test_path: test_path.into(),
            seed,
            extra_args: DEFAULT_EXTRA_ARGS,
            base_dir: PathBuf::from("."),
        }
    }

    /// Set the base directory the run operates in.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Override the opaque pass-through constants.
    pub fn with_extra_args(mut self, a: u32, b: u32) -> Self {
        self.extra_args = (a, b);
        self
    }

    /// Absolute-ish path of the executable under test.
    pub fn executable(&self) -> PathBuf {
        self.base_dir.join(&self.test_path)
    }

    /// Display name of the test, for diagnostics.
    pub fn name(&self) -> &str {
        self.test_path.to_str().unwrap_or("<non-utf8 path>")
    }
}

impl Default for TestSpec {
    fn default() -> Self {
        Self::new(Path::new(DEFAULT_TEST_PATH), DEFAULT_SEED)
    }
}
