use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use catalog_types::Product;

use crate::error::{SourceError, SourceResult};
use crate::source::{parse_base, BaseSource};

/// Base collection stored as a JSON file, read fresh on every fetch.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl BaseSource for FileSource {
    async fn fetch(&self) -> SourceResult<Vec<Product>> {
        let origin = self.origin();
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                origin: origin.clone(),
                source,
            })?;
        let products = parse_base(&body, &origin)?;
        debug!(%origin, count = products.len(), "base collection loaded");
        Ok(products)
    }

    fn origin(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_products_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("produtos.json");
        std::fs::write(
            &path,
            r#"[{"id":"1","nome":"A","categoria":"x","estoque":1,"preco":2},
                {"id":"2","nome":"B","categoria":"x","estoque":0,"preco":3}]"#,
        )
        .unwrap();

        let products = FileSource::new(&path).fetch().await.unwrap();
        let ids: Vec<_> = products.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileSource::new(dir.path().join("nope.json"))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("produtos.json");
        std::fs::write(&path, "not json").unwrap();
        let err = FileSource::new(&path).fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
    }
}
