//! Request-scoped scratch directories.
//!
//! A `Workspace` is acquired per generate request and released explicitly once
//! the artifact has been read back. Dropping it without calling `release`
//! (e.g. on an error path) still removes the directory, just without reporting
//! failures.

use std::io;
use std::path::Path;

use tempfile::TempDir;

const PREFIX: &str = "pdfgen_";

#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Creates a fresh directory under `root`, or the OS temp dir when `None`.
    pub fn acquire(root: Option<&Path>) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(PREFIX);
        let dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Removes the directory and everything in it.
    pub fn release(self) -> io::Result<()> {
        self.dir.close()
    }
}
