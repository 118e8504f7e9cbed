//! Upload sandbox: accepts study files into a single flat directory and
//! guards every later read of them.

pub mod guard;
pub mod media;

pub use guard::{Disposition, PathGuard, ServedFile};

use crate::error::{Result, StoreError};
use crate::ids;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Largest accepted upload, 50 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 50 << 20;

/// Result of a completed upload, ready to be attached to a material.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    /// Location relative to the upload directory.
    pub file_path: String,
    /// Name the client uploaded the file as.
    pub file_name: String,
    pub file_size: u64,
}

pub struct UploadService {
    dir: PathBuf,
    max_bytes: u64,
}

impl UploadService {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_limit(dir, MAX_UPLOAD_BYTES)
    }

    pub fn with_limit(dir: impl Into<PathBuf>, max_bytes: u64) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, max_bytes })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Validate `original_name` and open a fresh file for it. Nothing is
    /// created when the extension is not allowed.
    pub fn begin(&self, original_name: &str) -> Result<PendingUpload> {
        let display_name = base_name(original_name).trim().to_string();
        let (stem, ext) = match split_upload_name(&display_name) {
            Some(parts) => parts,
            None => {
                warn!(name = %original_name, "rejected upload with unsupported extension");
                return Err(StoreError::UnsupportedMediaType(display_name));
            }
        };

        loop {
            let stored = format!("{}_{}.{}", stem, ids::next_stamp(), ext);
            let path = self.dir.join(&stored);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    return Ok(PendingUpload {
                        file: Some(file),
                        path,
                        stored_name: stored,
                        file_name: display_name,
                        written: 0,
                        limit: self.max_bytes,
                        committed: false,
                    })
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Copy all of `reader` into the sandbox as `original_name`.
    pub fn store(&self, original_name: &str, mut reader: impl Read) -> Result<StoredFile> {
        let mut pending = self.begin(original_name)?;
        let mut buf = vec![0u8; 64 * 1024];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            pending.write_chunk(&buf[..n])?;
        }
        pending.finish()
    }
}

/// An upload being streamed to disk. Dropping it before [`finish`] removes
/// the partial file.
///
/// [`finish`]: PendingUpload::finish
pub struct PendingUpload {
    file: Option<File>,
    path: PathBuf,
    stored_name: String,
    file_name: String,
    written: u64,
    limit: u64,
    committed: bool,
}

impl PendingUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn write_chunk(&mut self, chunk: &[u8]) -> Result<()> {
        if self.written + chunk.len() as u64 > self.limit {
            warn!(name = %self.file_name, limit = self.limit, "upload exceeds size limit");
            return Err(StoreError::UploadTooLarge { limit: self.limit });
        }
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| StoreError::Io(std::io::Error::other("upload already closed")))?;
        file.write_all(chunk)?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    pub fn finish(mut self) -> Result<StoredFile> {
        if let Some(file) = self.file.take() {
            file.sync_all()?;
        }
        self.committed = true;
        info!(
            path = %self.path.display(),
            name = %self.file_name,
            size = self.written,
            "upload stored"
        );
        Ok(StoredFile {
            file_path: self.stored_name.clone(),
            file_name: self.file_name.clone(),
            file_size: self.written,
        })
    }
}

impl Drop for PendingUpload {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        self.file.take();
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "failed to remove partial upload");
            }
        }
    }
}

fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

/// Sanitized stem and lower-cased extension, or `None` when the extension is
/// missing or not on the allow-list.
fn split_upload_name(name: &str) -> Option<(String, String)> {
    let ext = media::extension_of(name)?;
    media::allowed_content_type(&ext)?;
    let (stem, _) = name.rsplit_once('.')?;
    Some((sanitize_stem(stem), ext))
}

fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = stem
        .replace("..", "_")
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim().trim_matches('.');
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_store_file() {
        let dir = TempDir::new().unwrap();
        let uploads = UploadService::new(dir.path().join("uploads")).unwrap();
        let stored = uploads
            .store("Lecture Notes.PDF", Cursor::new(b"%PDF-1.4 body".to_vec()))
            .unwrap();

        assert_eq!(stored.file_name, "Lecture Notes.PDF");
        assert_eq!(stored.file_size, 13);
        assert!(stored.file_path.starts_with("Lecture Notes_"));
        assert!(stored.file_path.ends_with(".pdf"));
        let on_disk = fs::read(uploads.dir().join(&stored.file_path)).unwrap();
        assert_eq!(on_disk, b"%PDF-1.4 body");
    }

    #[test]
    fn test_unsupported_extension_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let uploads = UploadService::new(dir.path()).unwrap();
        for name in ["payload.exe", "index.html", "noext", ".pdf", "notes.pdf.sh"] {
            let result = uploads.store(name, Cursor::new(b"MZ".to_vec()));
            assert!(
                matches!(result, Err(StoreError::UnsupportedMediaType(_))),
                "accepted {}",
                name
            );
        }
        assert!(entries(dir.path()).is_empty());
    }

    #[test]
    fn test_names_are_sanitized() {
        let dir = TempDir::new().unwrap();
        let uploads = UploadService::new(dir.path()).unwrap();

        let stored = uploads
            .store("../../etc/passwd..x.txt", Cursor::new(b"x".to_vec()))
            .unwrap();
        assert_eq!(stored.file_name, "passwd..x.txt");
        assert!(stored.file_path.starts_with("passwd_x_"));
        assert!(!stored.file_path.contains(".."));

        let stored = uploads
            .store("C:\\Users\\me\\..\\slides.pptx", Cursor::new(b"x".to_vec()))
            .unwrap();
        assert!(stored.file_path.starts_with("slides_"));

        let stored = uploads.store("..png", Cursor::new(b"x".to_vec())).unwrap();
        assert!(stored.file_path.starts_with("file_"));
        assert_eq!(entries(dir.path()).len(), 3);
    }

    #[test]
    fn test_same_name_never_overwrites() {
        let dir = TempDir::new().unwrap();
        let uploads = UploadService::new(dir.path()).unwrap();
        let a = uploads.store("a.txt", Cursor::new(b"first".to_vec())).unwrap();
        let b = uploads.store("a.txt", Cursor::new(b"second".to_vec())).unwrap();
        assert_ne!(a.file_path, b.file_path);
        assert_eq!(fs::read(dir.path().join(&a.file_path)).unwrap(), b"first");
        assert_eq!(fs::read(dir.path().join(&b.file_path)).unwrap(), b"second");
    }

    #[test]
    fn test_oversized_upload_removed() {
        let dir = TempDir::new().unwrap();
        let uploads = UploadService::with_limit(dir.path(), 8).unwrap();

        let result = uploads.store("big.txt", Cursor::new(vec![b'x'; 9]));
        assert!(matches!(result, Err(StoreError::UploadTooLarge { limit: 8 })));
        assert!(entries(dir.path()).is_empty());

        let stored = uploads.store("fits.txt", Cursor::new(vec![b'x'; 8])).unwrap();
        assert_eq!(stored.file_size, 8);
    }

    #[test]
    fn test_abandoned_upload_removed() {
        let dir = TempDir::new().unwrap();
        let uploads = UploadService::new(dir.path()).unwrap();
        let mut pending = uploads.begin("notes.pdf").unwrap();
        pending.write_chunk(b"partial").unwrap();
        let path = pending.path().to_path_buf();
        assert!(path.exists());
        drop(pending);
        assert!(!path.exists());
    }

    #[test]
    fn test_failing_reader_removes_partial_file() {
        struct Broken(bool);
        impl Read for Broken {
            fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
                if self.0 {
                    return Err(std::io::Error::new(ErrorKind::ConnectionReset, "client gone"));
                }
                self.0 = true;
                buf[..4].copy_from_slice(b"data");
                Ok(4)
            }
        }

        let dir = TempDir::new().unwrap();
        let uploads = UploadService::new(dir.path()).unwrap();
        let result = uploads.store("notes.txt", Broken(false));
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert!(entries(dir.path()).is_empty());
    }
}
