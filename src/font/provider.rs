//! Read-only resource trees that font families are loaded from

use crate::error::LoadError;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path};

/// One file directly under a font directory
#[derive(Debug, Clone)]
pub struct FontEntry {
    /// File name including extension
    pub name: String,
    pub bytes: Vec<u8>,
}

/// A read-only directory tree holding font families
pub trait FontProvider {
    /// List the files directly under `path`, sorted by name.
    /// Subdirectories are not entries.
    fn list_entries(&self, path: &Path) -> Result<Vec<FontEntry>, LoadError>;
}

/// Host filesystem provider. Hidden files (leading `.`) are skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsProvider;

impl FontProvider for FsProvider {
    fn list_entries(&self, path: &Path) -> Result<Vec<FontEntry>, LoadError> {
        let io_error = |source: std::io::Error| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };

        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LoadError::PathNotFound(path.to_path_buf()),
            _ => io_error(e),
        })?;
        if !metadata.is_dir() {
            return Err(LoadError::NotADirectory(path.to_path_buf()));
        }

        let mut entries = Vec::new();
        for entry in fs::read_dir(path).map_err(io_error)? {
            let entry = entry.map_err(io_error)?;
            let entry_path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') || !entry_path.is_file() {
                continue;
            }

            let bytes = fs::read(&entry_path).map_err(|source| LoadError::Io {
                path: entry_path.clone(),
                source,
            })?;
            entries.push(FontEntry { name, bytes });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// In-memory resource tree, typically filled with `include_bytes!` so that
/// fonts ship inside the binary
///
/// Paths are relative and `/`-separated; `.` segments are ignored. Absolute
/// paths and `..` never resolve.
///
/// ```
/// use lookup_ocr::MemoryProvider;
///
/// let provider = MemoryProvider::new()
///     .with_file("fonts/digits/0.png", vec![0u8; 4])
///     .with_file("fonts/digits/1.png", vec![0u8; 4]);
/// assert_eq!(provider.len(), 2);
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryProvider {
    files: BTreeMap<String, Cow<'static, [u8]>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, builder style
    pub fn with_file(mut self, path: &str, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        self.insert(path, bytes);
        self
    }

    /// Add or replace a file. Paths that do not normalize to a relative
    /// file path are ignored.
    pub fn insert(&mut self, path: &str, bytes: impl Into<Cow<'static, [u8]>>) {
        match normalize(Path::new(path)) {
            Some(key) if !key.is_empty() => {
                self.files.insert(key, bytes.into());
            }
            _ => tracing::warn!("Ignoring resource with invalid path {:?}", path),
        }
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FontProvider for MemoryProvider {
    fn list_entries(&self, path: &Path) -> Result<Vec<FontEntry>, LoadError> {
        let key = normalize(path).ok_or_else(|| LoadError::PathNotFound(path.to_path_buf()))?;
        if self.files.contains_key(&key) {
            return Err(LoadError::NotADirectory(path.to_path_buf()));
        }

        let prefix = if key.is_empty() {
            String::new()
        } else {
            format!("{}/", key)
        };

        let mut exists = false;
        let mut entries = Vec::new();
        for (file, bytes) in self.files.range(prefix.clone()..) {
            let Some(rest) = file.strip_prefix(&prefix) else {
                break;
            };
            exists = true;
            if !rest.contains('/') {
                entries.push(FontEntry {
                    name: rest.to_string(),
                    bytes: bytes.to_vec(),
                });
            }
        }

        if !exists {
            return Err(LoadError::PathNotFound(path.to_path_buf()));
        }
        Ok(entries)
    }
}

fn normalize(path: &Path) -> Option<String> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_str()?),
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) | Component::ParentDir => return None,
        }
    }
    Some(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> MemoryProvider {
        MemoryProvider::new()
            .with_file("fonts/a/2.png", vec![2])
            .with_file("fonts/a/1.png", vec![1])
            .with_file("fonts/a/nested/x.png", vec![9])
            .with_file("fonts/ab/3.png", vec![3])
            .with_file("readme.txt", b"hello".as_slice())
    }

    #[test]
    fn test_memory_lists_direct_children_sorted() {
        let entries = provider().list_entries(Path::new("fonts/a")).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["1.png", "2.png"]);
        assert_eq!(entries[0].bytes, vec![1]);
    }

    #[test]
    fn test_memory_accepts_dot_and_trailing_slash() {
        let entries = provider().list_entries(Path::new("./fonts/a/")).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_memory_directory_without_files_is_listed_empty() {
        let entries = provider().list_entries(Path::new("fonts")).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_memory_missing_and_absolute_paths() {
        for path in ["fonts/missing", "/", "/fonts/a", "../fonts/a"] {
            let err = provider().list_entries(Path::new(path)).unwrap_err();
            assert!(
                matches!(err, LoadError::PathNotFound(_)),
                "{} should not resolve, got {:?}",
                path,
                err
            );
        }
    }

    #[test]
    fn test_memory_file_is_not_a_directory() {
        let err = provider().list_entries(Path::new("readme.txt")).unwrap_err();
        assert!(matches!(err, LoadError::NotADirectory(_)));
    }

    #[test]
    fn test_fs_lists_files_and_skips_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.png"), [2u8]).unwrap();
        fs::write(dir.path().join("a.png"), [1u8]).unwrap();
        fs::write(dir.path().join(".hidden"), [0u8]).unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let entries = FsProvider.list_entries(dir.path()).unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.png", "b.png"]);
    }

    #[test]
    fn test_fs_missing_path_and_file_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("NON_EXISTENT");
        assert!(matches!(
            FsProvider.list_entries(&missing),
            Err(LoadError::PathNotFound(_))
        ));

        let file = dir.path().join("file.png");
        fs::write(&file, [0u8]).unwrap();
        assert!(matches!(
            FsProvider.list_entries(&file),
            Err(LoadError::NotADirectory(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_fs_unreadable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.png");
        fs::write(&file, [0u8]).unwrap();

        // A file used as a directory fails with ENOTDIR rather than NotFound
        let below_file = file.join("sub");
        let err = FsProvider.list_entries(&below_file).unwrap_err();
        assert!(
            matches!(err, LoadError::Io { ref path, .. } if *path == below_file),
            "got {:?}",
            err
        );
    }
}
