use tracing::{debug, info};

use catalog_merge::{merge_with_stats, MergeStats};
use catalog_source::BaseSource;
use catalog_store::{KvBackend, OverlayStatus, OverlayStore};
use catalog_types::{Product, ProductId};
use catalog_view::{Filter, SortMode};

use crate::config::EditorDefaults;
use crate::editor::ProductDraft;
use crate::error::{CatalogError, CatalogResult};
use crate::stock::StockAdjustment;

/// High-level catalog API: base source plus overlay store.
///
/// Every read fetches the base collection again and re-reads the overlay,
/// so results always reflect the latest persisted edits.
pub struct Catalog<B, S> {
    store: OverlayStore<B>,
    source: S,
    defaults: EditorDefaults,
}

impl<B: KvBackend, S: BaseSource> Catalog<B, S> {
    pub fn new(store: OverlayStore<B>, source: S) -> Self {
        Self {
            store,
            source,
            defaults: EditorDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: EditorDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn store(&self) -> &OverlayStore<B> {
        &self.store
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn defaults(&self) -> &EditorDefaults {
        &self.defaults
    }

    // ---- Reads ----

    /// The effective collection. Fails only if the base cannot be loaded.
    pub async fn merged(&self) -> CatalogResult<Vec<Product>> {
        Ok(self.merged_with_stats().await?.0)
    }

    pub async fn merged_with_stats(&self) -> CatalogResult<(Vec<Product>, MergeStats)> {
        let base = self.source.fetch().await?;
        let overlay = self.store.load();
        Ok(merge_with_stats(&base, &overlay.edits, &overlay.tombstones))
    }

    /// The effective collection, filtered and sorted for display.
    pub async fn view(&self, filter: &Filter, mode: SortMode) -> CatalogResult<Vec<Product>> {
        let merged = self.merged().await?;
        Ok(catalog_view::apply(&merged, filter, mode))
    }

    pub async fn find(&self, id: &str) -> CatalogResult<Option<Product>> {
        Ok(self.merged().await?.into_iter().find(|p| p.id.as_str() == id))
    }

    pub async fn categories(&self) -> CatalogResult<Vec<String>> {
        Ok(catalog_view::categories(&self.merged().await?))
    }

    pub fn status(&self) -> OverlayStatus {
        self.store.status()
    }

    // ---- Writes ----

    /// Validate a draft and store it as an edit. Returns what was stored.
    pub fn save(&self, draft: ProductDraft) -> CatalogResult<Product> {
        let product = draft.into_product(&self.defaults)?;
        self.store.upsert(product.clone())?;
        info!(id = %product.id, name = %product.name, "product saved");
        Ok(product)
    }

    /// Change the stock of a visible product and store the result as an edit.
    pub async fn adjust_stock(&self, id: &str, adjustment: StockAdjustment) -> CatalogResult<Product> {
        let current = self
            .find(id)
            .await?
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        let before = current.stock;
        let updated = current.with_stock(adjustment.apply(before));
        self.store.upsert(updated.clone())?;
        debug!(%id, before, after = updated.stock, "stock adjusted");
        Ok(updated)
    }

    pub fn delete(&self, id: &ProductId) -> CatalogResult<()> {
        self.store.delete(id)?;
        info!(%id, "product deleted");
        Ok(())
    }

    pub fn reset(&self) -> CatalogResult<()> {
        Ok(self.store.reset()?)
    }

    /// Replace all edits with a JSON array of products. Returns the count.
    pub fn import_json(&self, text: &str) -> CatalogResult<usize> {
        Ok(self.store.import_json(text)?)
    }

    /// The effective collection as pretty-printed JSON.
    pub async fn export(&self) -> CatalogResult<String> {
        let merged = self.merged().await?;
        serde_json::to_string_pretty(&merged).map_err(|e| CatalogError::Serialization(e.to_string()))
    }
}
