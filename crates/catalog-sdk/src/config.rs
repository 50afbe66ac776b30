use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use catalog_source::{BaseSource, FileSource, HttpSource, SourceResult};
use catalog_store::{FileBackend, OverlayStore, StoreKeys};
use catalog_types::Product;

use crate::catalog::Catalog;
use crate::error::{CatalogError, CatalogResult};

/// Where the base collection comes from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseLocation {
    File(PathBuf),
    Url(String),
}

impl Default for BaseLocation {
    fn default() -> Self {
        BaseLocation::File(PathBuf::from("data/produtos.json"))
    }
}

/// Defaults the editor fills in for blank form fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorDefaults {
    pub default_category: String,
    pub default_image: String,
    /// Labels of the size tiers, smallest first.
    pub tier_labels: Vec<String>,
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            default_category: "salgada".into(),
            default_image: "img/placeholder.jpg".into(),
            tier_labels: vec!["Broto (4)".into(), "Média (6)".into(), "Grande (8)".into()],
        }
    }
}

/// Catalog configuration, usually read from `cardapio.toml`.
///
/// ```toml
/// overlay_path = ".cardapio/overlay.json"
/// http_timeout_secs = 15
///
/// [base]
/// url = "https://example.com/data/produtos.json"
///
/// [keys]
/// edits = "cardapio-overlay-v1"
/// tombstones = "cardapio-deleted-v1"
///
/// [editor]
/// default_category = "salgada"
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub overlay_path: PathBuf,
    pub http_timeout_secs: u64,
    pub base: BaseLocation,
    pub keys: StoreKeys,
    pub editor: EditorDefaults,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            overlay_path: PathBuf::from(".cardapio/overlay.json"),
            http_timeout_secs: 15,
            base: BaseLocation::default(),
            keys: StoreKeys::default(),
            editor: EditorDefaults::default(),
        }
    }
}

impl CatalogConfig {
    /// Read a TOML config file. A missing file yields the defaults.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> CatalogResult<Self> {
        toml::from_str(text).map_err(|e| CatalogError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> CatalogResult<String> {
        toml::to_string_pretty(self).map_err(|e| CatalogError::Serialization(e.to_string()))
    }

    pub fn source(&self) -> ConfiguredSource {
        match &self.base {
            BaseLocation::File(path) => ConfiguredSource::File(FileSource::new(path)),
            BaseLocation::Url(url) => ConfiguredSource::Http(
                HttpSource::new(url.clone())
                    .with_timeout(Duration::from_secs(self.http_timeout_secs)),
            ),
        }
    }

    pub fn open_store(&self) -> CatalogResult<OverlayStore<FileBackend>> {
        let backend = FileBackend::open(&self.overlay_path)?;
        Ok(OverlayStore::with_keys(backend, self.keys.clone()))
    }

    /// Open a catalog backed by the configured overlay file and base source.
    pub fn open(&self) -> CatalogResult<Catalog<FileBackend, ConfiguredSource>> {
        Ok(Catalog::new(self.open_store()?, self.source()).with_defaults(self.editor.clone()))
    }
}

/// The base source selected by [`CatalogConfig::base`].
#[derive(Clone, Debug)]
pub enum ConfiguredSource {
    File(FileSource),
    Http(HttpSource),
}

#[async_trait]
impl BaseSource for ConfiguredSource {
    async fn fetch(&self) -> SourceResult<Vec<Product>> {
        match self {
            ConfiguredSource::File(s) => s.fetch().await,
            ConfiguredSource::Http(s) => s.fetch().await,
        }
    }

    fn origin(&self) -> String {
        match self {
            ConfiguredSource::File(s) => s.origin(),
            ConfiguredSource::Http(s) => s.origin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = CatalogConfig::default();
        assert_eq!(c.base, BaseLocation::File("data/produtos.json".into()));
        assert_eq!(c.keys.edits, "cardapio-overlay-v1");
        assert_eq!(c.keys.tombstones, "cardapio-deleted-v1");
        assert_eq!(c.editor.tier_labels.len(), 3);
        assert_eq!(c.http_timeout_secs, 15);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = CatalogConfig::from_toml(
            r#"
            http_timeout_secs = 3

            [base]
            url = "http://localhost:8080/data/produtos.json"

            [editor]
            default_category = "bebida"
            "#,
        )
        .unwrap();
        assert_eq!(
            c.base,
            BaseLocation::Url("http://localhost:8080/data/produtos.json".into())
        );
        assert_eq!(c.http_timeout_secs, 3);
        assert_eq!(c.editor.default_category, "bebida");
        assert_eq!(c.editor.default_image, "img/placeholder.jpg");
        assert_eq!(c.overlay_path, PathBuf::from(".cardapio/overlay.json"));
        assert!(matches!(c.source(), ConfiguredSource::Http(_)));
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = CatalogConfig::from_toml("base = 12").unwrap_err();
        assert!(matches!(err, CatalogError::Config(_)));
    }

    #[test]
    fn toml_round_trip() {
        let c = CatalogConfig::default();
        let back = CatalogConfig::from_toml(&c.to_toml().unwrap()).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let c = CatalogConfig::load(&dir.path().join("cardapio.toml")).unwrap();
        assert_eq!(c, CatalogConfig::default());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cardapio.toml");
        std::fs::write(&path, "overlay_path = \"state/o.json\"\n").unwrap();
        let c = CatalogConfig::load(&path).unwrap();
        assert_eq!(c.overlay_path, PathBuf::from("state/o.json"));
    }
}
