use crate::error::{Result, StoreError};
use crate::storage::tree::{MaterialsTree, TreeDocument};
use parking_lot::Mutex;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// JSON-file repository for one materials tree.
///
/// Every call reloads the document from disk. `mutate` holds the store lock
/// across load, change and save so concurrent requests never interleave.
pub struct TreeStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl TreeStore {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current tree, or a fresh root-only tree when nothing has been saved.
    pub fn load(&self) -> Result<MaterialsTree> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no materials document yet");
                return Ok(MaterialsTree::new());
            }
            Err(e) => return Err(e.into()),
        };
        let document: TreeDocument = serde_json::from_slice(&bytes)?;
        let tree = MaterialsTree::from_document(document)?;
        debug!(path = %self.path.display(), nodes = tree.len(), "materials loaded");
        Ok(tree)
    }

    /// Replace the document on disk. The new content is written to a sibling
    /// temp file and renamed over the old one.
    pub fn save(&self, tree: &MaterialsTree) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(&tree.to_document())?;
        let tmp = self.path.with_extension("json.tmp");
        let written = (|| -> std::io::Result<()> {
            let mut file = File::create(&tmp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            fs::rename(&tmp, &self.path)
        })();
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %tmp.display(), error = %cleanup, "failed to remove temp document");
                }
            }
            return Err(StoreError::Io(e));
        }
        debug!(path = %self.path.display(), nodes = tree.len(), "materials saved");
        Ok(())
    }

    /// Run `f` against a freshly loaded tree.
    pub fn read<T>(&self, f: impl FnOnce(&MaterialsTree) -> Result<T>) -> Result<T> {
        let _guard = self.lock.lock();
        let tree = self.load()?;
        f(&tree)
    }

    /// Load, apply `f` and save. Nothing is written when `f` fails.
    pub fn mutate<T>(&self, f: impl FnOnce(&mut MaterialsTree) -> Result<T>) -> Result<T> {
        let _guard = self.lock.lock();
        let mut tree = self.load()?;
        let out = f(&mut tree)?;
        self.save(&tree)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::tree::{NewMaterial, SourceFields, MAX_DEPTH, ROOT_ID};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> TreeStore {
        TreeStore::new(dir.path().join("data").join("materials.json")).unwrap()
    }

    #[test]
    fn test_missing_document_is_empty_root() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let tree = store.load().unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root().id(), ROOT_ID);
        assert!(!store.path().exists());
    }

    #[test]
    fn test_mutate_persists() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let id = store.mutate(|tree| tree.add_folder(ROOT_ID, "Math")).unwrap();

        let reopened = TreeStore::new(store.path()).unwrap();
        let name = reopened
            .read(|tree| Ok(tree.find_by_id(&id).map(|n| n.name().to_string())))
            .unwrap();
        assert_eq!(name.as_deref(), Some("Math"));
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_save_load_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store
            .mutate(|tree| {
                let math = tree.add_folder(ROOT_ID, "Math")?;
                tree.add_material(
                    &math,
                    NewMaterial {
                        name: "Notes.pdf".to_string(),
                        material_type: "pdf".to_string(),
                        description: String::new(),
                        source: SourceFields::file("notes_1.pdf", "Notes.pdf", 12),
                    },
                )
            })
            .unwrap();

        let first = fs::read(store.path()).unwrap();
        let tree = store.load().unwrap();
        store.save(&tree).unwrap();
        let second = fs::read(store.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(store.load().unwrap(), tree);
    }

    #[test]
    fn test_failed_mutation_not_saved() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        store.mutate(|tree| tree.add_folder(ROOT_ID, "Math")).unwrap();
        let before = fs::read(store.path()).unwrap();

        let result = store.mutate(|tree| {
            tree.add_folder(ROOT_ID, "Physics")?;
            tree.delete_node(ROOT_ID)
        });
        assert!(matches!(result, Err(StoreError::Forbidden(_))));
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }

    #[test]
    fn test_corrupt_document() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        fs::write(store.path(), b"{ not json").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));

        fs::write(store.path(), br#"{"root":{"id":"other","name":"x","type":"folder"}}"#).unwrap();
        assert!(matches!(store.load(), Err(StoreError::Corrupt(_))));
        assert!(matches!(
            store.mutate(|tree| tree.add_folder(ROOT_ID, "Math")),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn test_deepest_nesting_reloads() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let mut parent = ROOT_ID.to_string();
        for level in 0..MAX_DEPTH {
            parent = store
                .mutate(|tree| tree.add_folder(&parent, &format!("level {}", level)))
                .unwrap();
        }

        let result = store.mutate(|tree| tree.add_folder(&parent, "too deep"));
        assert!(matches!(result, Err(StoreError::Validation(_))));

        let tree = store.load().unwrap();
        assert_eq!(tree.len(), MAX_DEPTH + 1);
        assert_eq!(tree.depth(&parent), MAX_DEPTH);
        store.save(&tree).unwrap();
        assert_eq!(store.load().unwrap(), tree);
    }

    #[test]
    fn test_concurrent_mutations_all_land() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(store(&dir));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for j in 0..5 {
                        store
                            .mutate(|tree| tree.add_folder(ROOT_ID, &format!("f{}-{}", i, j)))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let tree = store.load().unwrap();
        assert_eq!(tree.root().children().len(), 40);
    }
}
