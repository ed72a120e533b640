use crate::core::library::PostureStore;
use crate::domain::ports::PostureRepository;
use crate::utils::error::{PostureError, Result};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Posture store kept as one JSON object: name → `[5 angles]`.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn malformed(&self, reason: impl Into<String>) -> PostureError {
        PostureError::MalformedStoreError {
            path: self.path.display().to_string(),
            reason: reason.into(),
        }
    }

    pub fn parse(&self, data: &[u8]) -> Result<PostureStore> {
        let store: PostureStore =
            serde_json::from_slice(data).map_err(|e| self.malformed(e.to_string()))?;

        if let Some((name, _)) = store.iter().find(|(name, _)| name.trim().is_empty()) {
            return Err(self.malformed(format!("posture name {:?} is empty", name)));
        }

        Ok(store)
    }

    pub fn encode(store: &PostureStore) -> Result<Vec<u8>> {
        // 與舊檔案一致，使用 4 個空白縮排
        let mut buffer = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        store.serialize(&mut serializer)?;
        Ok(buffer)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl PostureRepository for JsonFileRepository {
    async fn load(&self) -> Result<Option<PostureStore>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!("Read {} bytes from {}", data.len(), self.path.display());
        self.parse(&data).map(Some)
    }

    async fn save(&self, store: &PostureStore) -> Result<()> {
        let data = Self::encode(store)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // 先寫暫存檔再改名，避免寫到一半留下壞檔
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, &data).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        tracing::debug!("Wrote {} postures to {}", store.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::AngleVector;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_loads_as_none() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("registered_postures.json"));
        assert!(repo.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("nested/registered_postures.json"));

        let mut store = PostureStore::new();
        store.insert(
            "fist".to_string(),
            AngleVector::new([0.123456789, 2.5, 2.75, 2.8, 2.9]),
        );
        repo.save(&store).await.unwrap();

        let loaded = repo.load().await.unwrap().unwrap();
        assert_eq!(loaded, store);
        assert!(!repo.temp_path().exists());
    }

    #[test]
    fn test_encode_uses_four_space_indent() {
        let mut store = PostureStore::new();
        store.insert("open".to_string(), AngleVector::new([0.0, 0.1, 0.0, 0.1, 0.2]));
        let text = String::from_utf8(JsonFileRepository::encode(&store).unwrap()).unwrap();
        assert!(text.starts_with("{\n    \"open\": [\n        0.0,"));
    }

    #[test]
    fn test_parse_rejects_wrong_shapes() {
        let repo = JsonFileRepository::new("registered_postures.json");

        for bad in [
            "not json",
            "[1, 2, 3]",
            r#"{"fist": [0.1, 0.2, 0.3, 0.4]}"#,
            r#"{"fist": [0.1, 0.2, 0.3, 0.4, 0.5, 0.6]}"#,
            r#"{"fist": ["a", 0.2, 0.3, 0.4, 0.5]}"#,
            r#"{"": [0.1, 0.2, 0.3, 0.4, 0.5]}"#,
        ] {
            let err = repo.parse(bad.as_bytes()).unwrap_err();
            assert!(
                matches!(err, PostureError::MalformedStoreError { .. }),
                "expected malformed store for {}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_accepts_integer_angles() {
        let repo = JsonFileRepository::new("registered_postures.json");
        let store = repo.parse(br#"{"flat": [0, 0, 0, 0, 0]}"#).unwrap();
        assert_eq!(store.get("flat"), Some(&AngleVector::new([0.0; 5])));
    }
}
