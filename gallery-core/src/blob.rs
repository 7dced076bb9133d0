//! Durable single-blob storage for the record collection.
//!
//! Next to the blob each store keeps the next id to hand out, so ids of
//! deleted records stay retired across restarts while the blob itself
//! remains a plain JSON array.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// A single named blob that is read whole and rewritten whole.
pub trait BlobStore: Send + Sync {
    /// Returns the blob contents, or `None` if nothing has been written yet.
    fn read(&self) -> io::Result<Option<Vec<u8>>>;

    /// Replaces the blob contents.
    fn write(&self, bytes: &[u8]) -> io::Result<()>;

    /// Returns the persisted next id, or `None` if none was written yet.
    fn read_next_id(&self) -> io::Result<Option<u64>>;

    /// Persists the next id to hand out.
    fn write_next_id(&self, next_id: u64) -> io::Result<()>;

    /// Human-readable location for logs.
    fn describe(&self) -> String;
}

/// Blob stored as a file on disk.
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so readers never observe a partially written blob.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    path: PathBuf,
}

impl FileBlobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sidecar file holding the next id, e.g. `images.json.next-id`.
    pub fn next_id_path(&self) -> PathBuf {
        self.sibling(".next-id")
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "images.json".into());
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    /// Writes `bytes` to `target` through the temp file and a rename.
    fn replace(&self, target: &Path, bytes: &[u8]) -> io::Result<()> {
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp = self.temp_path();
        {
            let mut file = fs::File::create(&temp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        fs::rename(&temp, target)
    }
}

impl BlobStore for FileBlobStore {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        self.replace(&self.path, bytes)
    }

    fn read_next_id(&self) -> io::Result<Option<u64>> {
        let text = match fs::read_to_string(self.next_id_path()) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        text.trim()
            .parse()
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn write_next_id(&self, next_id: u64) -> io::Result<()> {
        self.replace(&self.next_id_path(), next_id.to_string().as_bytes())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory blob, mainly for tests. Writes can be made to fail on demand.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    contents: Mutex<Option<Vec<u8>>>,
    next_id: Mutex<Option<u64>>,
    fail_writes: AtomicBool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a blob that already holds `bytes`.
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: Mutex::new(Some(bytes.into())),
            ..Self::default()
        }
    }

    /// Current persisted next id.
    pub fn next_id(&self) -> Option<u64> {
        *self
            .next_id
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Makes subsequent writes fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Current contents of the blob.
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl BlobStore for MemoryBlobStore {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.contents())
    }

    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::other("simulated write failure"));
        }
        *self
            .contents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(bytes.to_vec());
        Ok(())
    }

    fn read_next_id(&self) -> io::Result<Option<u64>> {
        Ok(self.next_id())
    }

    fn write_next_id(&self, next_id: u64) -> io::Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::other("simulated write failure"));
        }
        *self
            .next_id
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(next_id);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
