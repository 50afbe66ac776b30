use async_trait::async_trait;

use catalog_types::Product;

use crate::error::{SourceError, SourceResult};

/// Read-only provider of the base product collection.
#[async_trait]
pub trait BaseSource: Send + Sync {
    /// Fetch the whole base collection, in source order.
    async fn fetch(&self) -> SourceResult<Vec<Product>>;

    /// Human-readable location, used in logs and error messages.
    fn origin(&self) -> String;
}

/// Decode a base collection body.
pub fn parse_base(body: &str, origin: &str) -> SourceResult<Vec<Product>> {
    serde_json::from_str(body).map_err(|e| SourceError::Malformed {
        origin: origin.to_string(),
        reason: e.to_string(),
    })
}

/// A base collection held in memory.
#[derive(Clone, Debug, Default)]
pub struct StaticSource {
    products: Vec<Product>,
}

impl StaticSource {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

#[async_trait]
impl BaseSource for StaticSource {
    async fn fetch(&self) -> SourceResult<Vec<Product>> {
        Ok(self.products.clone())
    }

    fn origin(&self) -> String {
        "memory".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_types::{Pricing, ProductId};

    #[test]
    fn parse_array_of_products() {
        let base = parse_base(
            r#"[{"id":"1","nome":"Margherita","categoria":"pizza","estoque":5,"preco":30}]"#,
            "test",
        )
        .unwrap();
        assert_eq!(base.len(), 1);
        assert_eq!(base[0].pricing, Pricing::Flat(30.0));
    }

    #[test]
    fn parse_rejects_non_array() {
        let err = parse_base(r#"{"id":"1"}"#, "test").unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
        let err = parse_base("<html>", "test").unwrap_err();
        assert!(err.to_string().contains("test"));
    }

    #[tokio::test]
    async fn static_source_returns_its_products() {
        let p = Product::new(ProductId::new("a").unwrap(), "A", "x", 1, Pricing::Flat(1.0));
        let source = StaticSource::new(vec![p.clone()]);
        assert_eq!(source.fetch().await.unwrap(), vec![p]);
        assert_eq!(source.origin(), "memory");
    }
}
