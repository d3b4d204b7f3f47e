use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cuentos_core::{BlobStore, Error, Result};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::validate_key;

const TMP_SUFFIX: &str = ".tmp-write";

/// Stores each key as a file under `base_path`; `/` in keys maps to subdirectories.
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    base_path: PathBuf,
}

impl FileSystemStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path).map_err(|e| {
            Error::Storage(format!(
                "Failed to create base directory {}: {}",
                base_path.display(),
                e
            ))
        })?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(key.split('/').fold(self.base_path.clone(), |path, part| path.join(part)))
    }

    async fn ensure_parent(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for FileSystemStore {
    async fn put(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        Self::ensure_parent(&path).await?;
        // one temp file per write, so concurrent writers to a key never share it
        let mut tmp = path.clone().into_os_string();
        tmp.push(format!(".{}{}", Uuid::new_v4().simple(), TMP_SUFFIX));
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, data).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            fs::remove_file(&tmp).await.ok();
            return Err(e.into());
        }
        Ok(())
    }

    async fn put_new(&self, key: &str, data: &[u8]) -> Result<()> {
        let path = self.path_for(key)?;
        Self::ensure_parent(&path).await?;
        let mut file = match fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(Error::Storage(format!("key already exists: {}", key)));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(data).await?;
        file.flush().await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys = Vec::new();
        let mut pending = vec![(self.base_path.clone(), String::new())];
        while let Some((dir, rel)) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name().to_string_lossy().into_owned();
                let key = if rel.is_empty() { name } else { format!("{}/{}", rel, name) };
                if entry.file_type().await?.is_dir() {
                    pending.push((entry.path(), key));
                } else if key.starts_with(prefix) && !key.ends_with(TMP_SUFFIX) {
                    keys.push(key);
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}
