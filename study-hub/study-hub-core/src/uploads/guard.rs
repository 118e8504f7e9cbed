use crate::error::{Result, StoreError};
use crate::storage::tree::{MaterialSource, Node};
use crate::uploads::media;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// RFC 5987 `attr-char`: everything else in `filename*` is percent-encoded.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// How a served file should be presented by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    Attachment,
    Inline,
}

impl Disposition {
    fn as_str(&self) -> &'static str {
        match self {
            Disposition::Attachment => "attachment",
            Disposition::Inline => "inline",
        }
    }
}

/// A stored upload that passed every sandbox check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: &'static str,
    pub size: u64,
}

impl ServedFile {
    /// `Content-Disposition` value carrying the original file name. Non-ASCII
    /// names get an RFC 5987 `filename*` parameter next to an ASCII fallback.
    pub fn content_disposition(&self, disposition: Disposition) -> String {
        let fallback: String = self
            .file_name
            .chars()
            .map(|c| match c {
                '"' | '\\' => '_',
                c if c.is_ascii_graphic() || c == ' ' => c,
                _ => '_',
            })
            .collect();
        let mut value = format!("{}; filename=\"{}\"", disposition.as_str(), fallback);
        if !self.file_name.is_ascii() {
            value.push_str("; filename*=UTF-8''");
            value.push_str(&utf8_percent_encode(&self.file_name, ATTR_CHAR).to_string());
        }
        value
    }
}

/// Confines every file read to the upload directory.
pub struct PathGuard {
    root: PathBuf,
}

impl PathGuard {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve the stored file behind a material node.
    pub fn resolve(&self, node: &Node) -> Result<ServedFile> {
        let material = node.material().ok_or_else(|| {
            StoreError::Validation(format!("{} is a folder, not a material", node.id()))
        })?;
        let (file_path, file_name) = match &material.source {
            MaterialSource::File {
                file_path,
                file_name,
                ..
            } => (file_path, file_name),
            MaterialSource::Link { .. } => {
                return Err(StoreError::Validation(format!(
                    "material {} is a link, not a stored file",
                    node.id()
                )))
            }
        };
        let path = self.check_path(file_path)?;
        let size = fs::metadata(&path)?.len();
        let content_type = match media::content_type_for(file_path) {
            "application/octet-stream" => media::content_type_for(file_name),
            known => known,
        };
        Ok(ServedFile {
            path,
            file_name: file_name.clone(),
            content_type,
            size,
        })
    }

    /// Canonical location of `stored`, which is interpreted relative to the
    /// upload directory. Fails with `PathTraversal` for anything that leaves
    /// it, lexically or through symlinks.
    pub fn check_path(&self, stored: &str) -> Result<PathBuf> {
        let root = normalize(&absolute(&self.root)?);
        let candidate = normalize(&root.join(stored));
        if candidate == root || !candidate.starts_with(&root) {
            warn!(path = %stored, "rejected path outside the upload directory");
            return Err(StoreError::PathTraversal(stored.to_string()));
        }

        let canonical_root = fs::canonicalize(&root)?;
        let canonical = fs::canonicalize(&candidate).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StoreError::NotFound(format!("file {}", stored)),
            _ => StoreError::Io(e),
        })?;
        if !canonical.starts_with(&canonical_root) {
            warn!(path = %stored, resolved = %canonical.display(), "rejected link out of the upload directory");
            return Err(StoreError::PathTraversal(stored.to_string()));
        }
        if !fs::metadata(&canonical)?.is_file() {
            return Err(StoreError::NotFound(format!("file {}", stored)));
        }
        Ok(canonical)
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
