// src/fs/mod.rs

use std::fmt::Debug;
use std::io;
use std::path::Path;

pub mod mock;

/// Filesystem probe of the machine that will run the publisher.
///
/// The probe may be backed by another host, so it is fallible: an `Err`
/// means the check itself could not complete, which is different from the
/// path being absent.
pub trait FileSystem: Send + Sync + Debug {
    fn exists(&self, path: &Path) -> io::Result<bool>;
}

/// Implementation that uses `std::fs` on the local machine.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> io::Result<bool> {
        path.try_exists()
    }
}
