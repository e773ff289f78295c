use std::{
    collections::BTreeMap,
    fs,
    io::Write,
    path::{Path, PathBuf},
    sync::Mutex,
};

use directories::BaseDirs;
use label_core::{PreferenceStore, StoreError};

pub const DEFAULT_GROUP: &str = "default";

pub fn prefs_dir() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    Some(base.config_dir().join("labelmaker"))
}

pub fn log_dir() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    Some(base.data_dir().join("labelmaker").join("logs"))
}

/// One preference group stored as a flat JSON object. Writes go through a
/// temp file and a rename so readers never see a half-written group.
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FilePrefs {
    pub fn open(dir: &Path, group: &str) -> Result<Self, StoreError> {
        let path = dir.join(format!("{}.json", sanitize(group)));
        let values = read_group(&path)?;
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        let mut next = values.clone();
        f(&mut next);
        write_group(&self.path, &next)?;
        *values = next;
        Ok(())
    }
}

impl PreferenceStore for FilePrefs {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|m| {
            m.insert(key.to_string(), value.to_string());
        })
    }

    fn put_all(&self, entries: &[(&str, &str)]) -> Result<(), StoreError> {
        self.update(|m| {
            for (k, v) in entries {
                m.insert(k.to_string(), v.to_string());
            }
        })
    }
}

fn read_group(path: &Path) -> Result<BTreeMap<String, String>, StoreError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let data = fs::read(path)?;
    if data.is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_json::from_slice(&data)
        .map_err(|e| StoreError::Decode(format!("{}: {}", path.display(), e)))
}

fn write_group(path: &Path, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = serde_json::to_vec_pretty(values).map_err(|e| StoreError::Decode(e.to_string()))?;
    let mut tmp = path.to_path_buf();
    tmp.set_extension("json.tmp");
    {
        let mut f = fs::File::create(&tmp)?;
        f.write_all(&data)?;
        f.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn sanitize(name: &str) -> String {
    let mut s = name
        .trim()
        .replace(['<', '>', ':', '"', '/', '\\', '|', '?', '*'], "_");
    if s.is_empty() {
        s = DEFAULT_GROUP.to_string();
    }
    s
}
