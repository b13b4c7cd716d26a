use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// Writes output under a base directory, creating parents as needed.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }

    fn locate(&self, path: &str) -> String {
        Path::new(&self.base_path).join(path).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_str().unwrap());

        storage.write_file("nested/ipca.csv", b"data,IPCA\n").await.unwrap();
        storage.write_file("nested/ipca.csv", b"data,IPCA\n2024-01-01,0.42\n").await.unwrap();

        let written = fs::read(temp_dir.path().join("nested/ipca.csv")).unwrap();
        assert_eq!(written, b"data,IPCA\n2024-01-01,0.42\n");
        assert!(storage.locate("nested/ipca.csv").ends_with("ipca.csv"));
    }
}
