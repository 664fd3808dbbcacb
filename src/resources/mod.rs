//! Sources of linter binaries
//!
//! Binaries are addressed by [`Platform::resource_path`](crate::platform::Platform::resource_path),
//! i.e. `<os>/<arch>/<binary-name>`. The crate bundles whatever is present in
//! its `resources/` directory at build time; a directory on disk or an
//! in-memory table can stand in for it.

use rust_embed::Embed;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

/// Lookup of a binary by its resource path
pub trait BinarySource {
    /// Return the bytes stored under `path`, or `None` when there are none.
    ///
    /// An error means a binary is there but could not be read.
    fn load(&self, path: &str) -> io::Result<Option<Cow<'static, [u8]>>>;
}

/// Linter binaries bundled from the crate's `resources/` directory.
#[derive(Embed)]
#[folder = "resources/"]
struct BundledResources;

/// Binaries compiled into the crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedBinaries;

impl BinarySource for EmbeddedBinaries {
    fn load(&self, path: &str) -> io::Result<Option<Cow<'static, [u8]>>> {
        Ok(BundledResources::get(path).map(|file| file.data))
    }
}

/// Binaries laid out on disk under a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryBinaries {
    root: PathBuf,
}

impl DirectoryBinaries {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BinarySource for DirectoryBinaries {
    fn load(&self, path: &str) -> io::Result<Option<Cow<'static, [u8]>>> {
        let file = self.root.join(path);
        let with_path = |e: io::Error| io::Error::new(e.kind(), format!("{}: {}", file.display(), e));

        match std::fs::metadata(&file) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(with_path(e)),
        }

        std::fs::read(&file)
            .map(|bytes| Some(Cow::Owned(bytes)))
            .map_err(with_path)
    }
}

/// Binaries held in memory, keyed by resource path.
#[derive(Debug, Clone, Default)]
pub struct MemoryBinaries {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryBinaries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the binary stored under `path`.
    pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(path.into(), bytes.into());
    }
}

impl BinarySource for MemoryBinaries {
    fn load(&self, path: &str) -> io::Result<Option<Cow<'static, [u8]>>> {
        Ok(self.entries.get(path).map(|bytes| Cow::Owned(bytes.clone())))
    }
}

impl<S: BinarySource + ?Sized> BinarySource for Box<S> {
    fn load(&self, path: &str) -> io::Result<Option<Cow<'static, [u8]>>> {
        (**self).load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_binaries_lookup() {
        let source = MemoryBinaries::new().with("linux/x64/linter", b"\x7fELF\x00\x01".to_vec());
        assert_eq!(
            source.load("linux/x64/linter").unwrap().as_deref(),
            Some(&b"\x7fELF\x00\x01"[..])
        );
        assert!(source.load("linux/arm64/linter").unwrap().is_none());
    }

    #[test]
    fn test_directory_binaries_lookup() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("macos/arm64")).unwrap();
        std::fs::write(dir.path().join("macos/arm64/linter"), [0u8, 159, 146, 150]).unwrap();

        let source = DirectoryBinaries::new(dir.path());
        assert_eq!(
            source.load("macos/arm64/linter").unwrap().as_deref(),
            Some(&[0u8, 159, 146, 150][..])
        );
        assert!(source.load("macos/x64/linter").unwrap().is_none());
        // A directory is not a binary
        assert!(source.load("macos/arm64").unwrap().is_none());
    }

    #[test]
    fn test_embedded_binaries_missing_variant() {
        assert!(EmbeddedBinaries.load("no-such-os/x64/linter").unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_binaries_unreadable_entry_is_error() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("linux/x64")).unwrap();
        // A self-referencing link exists but can never be read
        let link = dir.path().join("linux/x64/linter");
        std::os::unix::fs::symlink(&link, &link).unwrap();

        let err = DirectoryBinaries::new(dir.path())
            .load("linux/x64/linter")
            .unwrap_err();
        assert!(err.to_string().contains("linux/x64/linter"));
    }
}
