// src/fs/mock.rs

use super::FileSystem;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// In-memory filesystem probe for tests.
///
/// Holds a set of existing paths and can be switched into a failing mode in
/// which every probe returns an I/O error, emulating an unreachable node.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashSet<PathBuf>>>,
    probe_error: Arc<Mutex<Option<io::ErrorKind>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let mut files = self.files.lock().unwrap();
        files.insert(path.as_ref().to_path_buf());
    }

    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let mut files = self.files.lock().unwrap();
        files.remove(path.as_ref());
    }

    /// Make every subsequent probe fail with `kind` (or succeed again with
    /// `None`).
    pub fn fail_probes(&self, kind: Option<io::ErrorKind>) {
        *self.probe_error.lock().unwrap() = kind;
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        if let Some(kind) = *self.probe_error.lock().unwrap() {
            return Err(io::Error::new(
                kind,
                format!("probe failed for {:?}", path),
            ));
        }
        let files = self.files.lock().unwrap();
        Ok(files.contains(path))
    }
}
