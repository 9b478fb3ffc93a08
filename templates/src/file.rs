//! JSON file persistence for templates.
//!
//! The whole store lives in one file:
//!
//! ```text
//! {
//!   "version": 1,
//!   "command": [{"label": "open", "features": [0.12, -1.3, ...]}],
//!   "speaker": [{"label": "owner1", "features": [...]}]
//! }
//! ```
//!
//! The file is read once on open and rewritten after every successful write,
//! via a sibling temp file that is renamed over the original.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use voicegate_voiceprint::FeatureVector;

use crate::store::Templates;
use crate::{Category, Template, TemplateError, TemplateStore};

/// Current on-disk format version.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct FileFormat {
    version: u32,
    #[serde(default)]
    command: Vec<Template>,
    #[serde(default)]
    speaker: Vec<Template>,
}

/// [`TemplateStore`] persisted to a JSON file.
pub struct FileStore {
    path: PathBuf,
    inner: RwLock<Templates>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file is an empty store; the file
    /// is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        let path = path.into();
        let templates = if path.exists() {
            load(&path)?
        } else {
            debug!(path = %path.display(), "template file not found, starting empty");
            Templates::default()
        };
        Ok(Self {
            path,
            inner: RwLock::new(templates),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `f` to a copy of the templates, persists the copy, then
    /// publishes it. Nothing changes if either step fails.
    fn mutate<R>(
        &self,
        f: impl FnOnce(&mut Templates) -> Result<R, TemplateError>,
    ) -> Result<R, TemplateError> {
        let mut guard = self.inner.write();
        let mut next = guard.clone();
        let out = f(&mut next)?;
        save(&self.path, &next)?;
        *guard = next;
        Ok(out)
    }
}

impl TemplateStore for FileStore {
    fn enroll(
        &self,
        category: Category,
        label: &str,
        features: FeatureVector,
    ) -> Result<usize, TemplateError> {
        let idx = self.mutate(|t| t.push(category, label, features))?;
        info!(%category, label, idx, path = %self.path.display(), "enrolled template");
        Ok(idx)
    }

    fn all(&self, category: Category) -> Result<Vec<Template>, TemplateError> {
        Ok(self.inner.read().get(category).clone())
    }

    fn remove(&self, category: Category, label: &str) -> Result<usize, TemplateError> {
        let n = self.mutate(|t| Ok(t.remove(category, label)))?;
        info!(%category, label, removed = n, "removed templates");
        Ok(n)
    }

    fn len(&self, category: Category) -> Result<usize, TemplateError> {
        Ok(self.inner.read().get(category).len())
    }
}

fn load(path: &Path) -> Result<Templates, TemplateError> {
    let data = fs::read(path)?;
    let file: FileFormat = serde_json::from_slice(&data)
        .map_err(|e| TemplateError::Store(format!("{}: {e}", path.display())))?;
    if file.version != FORMAT_VERSION {
        return Err(TemplateError::Store(format!(
            "{}: unsupported version {}",
            path.display(),
            file.version
        )));
    }

    let mut templates = Templates::default();
    for (category, list) in [
        (Category::Command, file.command),
        (Category::Speaker, file.speaker),
    ] {
        for t in list {
            templates
                .push(category, &t.label, t.features)
                .map_err(|e| TemplateError::Store(format!("{}: {e}", path.display())))?;
        }
    }
    debug!(
        path = %path.display(),
        command = templates.command.len(),
        speaker = templates.speaker.len(),
        "loaded templates"
    );
    Ok(templates)
}

fn save(path: &Path, templates: &Templates) -> Result<(), TemplateError> {
    let file = FileFormat {
        version: FORMAT_VERSION,
        command: templates.command.clone(),
        speaker: templates.speaker.clone(),
    };
    let data = serde_json::to_vec_pretty(&file)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let written = write_synced(&tmp, &data).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}

fn write_synced(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut f = fs::File::create(path)?;
    f.write_all(data)?;
    f.sync_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fv(v: &[f32]) -> FeatureVector {
        FeatureVector::new(v.to_vec())
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("templates.json")).unwrap();
        assert_eq!(store.len(Category::Command).unwrap(), 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn reload_is_bit_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("templates.json");
        let tricky = vec![0.1f32, -1.0 / 3.0, 1.5e-30, f32::MAX, 123456.79, -0.0];

        {
            let store = FileStore::open(&path).unwrap();
            store.enroll(Category::Command, "open", fv(&tricky)).unwrap();
            store
                .enroll(Category::Speaker, "owner1", fv(&[1.5, 2.5, 3.5, 4.5, 5.5, 6.5]))
                .unwrap();
        }

        let store = FileStore::open(&path).unwrap();
        let cmd = store.all(Category::Command).unwrap();
        assert_eq!(cmd.len(), 1);
        assert_eq!(cmd[0].label, "open");
        for (a, b) in cmd[0].features.as_slice().iter().zip(&tricky) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        assert_eq!(store.all(Category::Speaker).unwrap()[0].label, "owner1");
    }

    #[test]
    fn remove_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");
        {
            let store = FileStore::open(&path).unwrap();
            store.enroll(Category::Speaker, "owner1", fv(&[1.0])).unwrap();
            store.enroll(Category::Speaker, "guest", fv(&[2.0])).unwrap();
            assert_eq!(store.remove(Category::Speaker, "guest").unwrap(), 1);
        }
        let store = FileStore::open(&path).unwrap();
        assert_eq!(
            store.labels(Category::Speaker).unwrap(),
            vec![("owner1".to_string(), 1)]
        );
    }

    #[test]
    fn file_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");
        let store = FileStore::open(&path).unwrap();
        store.enroll(Category::Command, "close", fv(&[0.5, -2.0])).unwrap();

        let v: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
        assert_eq!(v["version"], 1);
        assert_eq!(v["command"][0]["label"], "close");
        assert_eq!(v["command"][0]["features"][1], -2.0);
        assert!(v["speaker"].as_array().unwrap().is_empty());
    }

    #[test]
    fn rejected_write_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");
        let store = FileStore::open(&path).unwrap();
        store.enroll(Category::Command, "open", fv(&[1.0, 2.0])).unwrap();
        let before = fs::read(&path).unwrap();

        assert!(store.enroll(Category::Command, "open", fv(&[1.0])).is_err());
        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(store.len(Category::Command).unwrap(), 1);
    }

    #[test]
    fn failed_save_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");
        // Renaming a file over a non-empty directory fails.
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let err = save(&path, &Templates::default()).unwrap_err();
        assert!(matches!(err, TemplateError::Store(_)));
        assert!(!dir.path().join("templates.json.tmp").exists());
        assert!(path.join("keep").exists());
    }

    #[test]
    fn bad_files_are_store_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");

        fs::write(&path, "not json").unwrap();
        assert!(matches!(FileStore::open(&path), Err(TemplateError::Store(_))));

        fs::write(&path, r#"{"version": 2, "command": [], "speaker": []}"#).unwrap();
        assert!(matches!(FileStore::open(&path), Err(TemplateError::Store(_))));

        fs::write(
            &path,
            r#"{"version": 1, "command": [{"label": "", "features": [1.0]}]}"#,
        )
        .unwrap();
        assert!(matches!(FileStore::open(&path), Err(TemplateError::Store(_))));
    }
}
