use crate::core::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::PathBuf;

/// 以 base_path 為根目錄的本機檔案存取，原地覆寫，不做備份
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    fn read_file(&self, path: &str) -> Result<String> {
        let full_path = self.resolve(path);
        tracing::debug!("Reading {}", full_path.display());
        let content = fs::read_to_string(full_path)?;
        Ok(content)
    }

    fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let full_path = self.resolve(path);
        tracing::debug!("Writing {}", full_path.display());
        fs::write(full_path, content)?;
        Ok(())
    }
}
