//! Product editor: raw form input in, validated [`Product`] out.
//!
//! A [`ProductDraft`] mirrors the editing form. Numeric fields stay as the
//! text the user typed until [`ProductDraft::into_product`] validates them.
//! The pricing variant is chosen explicitly through [`PricingDraft`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use catalog_types::{Pricing, Product, ProductId, SizePrice};

use crate::config::EditorDefaults;

/// Rejected form input. Nothing is written when a draft fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name is required")]
    EmptyName,

    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("{field} cannot be negative")]
    NegativeNumber { field: String },

    #[error("a price or at least one size price is required")]
    MissingPrice,
}

/// One size row of the form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierDraft {
    pub label: String,
    pub amount: String,
}

impl TierDraft {
    pub fn new(label: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            amount: amount.into(),
        }
    }
}

/// Price fields of the form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingDraft {
    Flat(String),
    Tiered(Vec<TierDraft>),
}

impl PricingDraft {
    /// Pair amounts with `labels` in order. Extra amounts are dropped.
    pub fn tiered_with_labels(labels: &[String], amounts: &[String]) -> Self {
        PricingDraft::Tiered(
            labels
                .iter()
                .zip(amounts)
                .map(|(label, amount)| TierDraft::new(label.clone(), amount.clone()))
                .collect(),
        )
    }
}

/// The editing form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDraft {
    /// `None` for a new product; an id is minted on save.
    pub id: Option<ProductId>,
    pub name: String,
    pub category: String,
    pub image: Option<String>,
    pub stock: String,
    pub pricing: PricingDraft,
}

impl ProductDraft {
    /// A blank form for a new product.
    pub fn new(name: impl Into<String>, pricing: PricingDraft) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: String::new(),
            image: None,
            stock: String::new(),
            pricing,
        }
    }

    /// Pre-fill the form from an existing product.
    pub fn from_product(product: &Product) -> Self {
        let pricing = match &product.pricing {
            Pricing::Flat(amount) => PricingDraft::Flat(amount.to_string()),
            Pricing::Tiered(tiers) => PricingDraft::Tiered(
                tiers
                    .iter()
                    .map(|t| TierDraft::new(t.label.clone(), t.price.to_string()))
                    .collect(),
            ),
        };
        Self {
            id: Some(product.id.clone()),
            name: product.name.clone(),
            category: product.category.clone(),
            image: product.image.clone(),
            stock: product.stock.to_string(),
            pricing,
        }
    }

    /// Validate the form and build the product to store.
    ///
    /// Blank category and image fall back to `defaults`; blank stock is 0;
    /// size rows with a blank amount are skipped. A draft with no price at
    /// all is rejected with [`ValidationError::MissingPrice`].
    pub fn into_product(self, defaults: &EditorDefaults) -> Result<Product, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let category = match self.category.trim() {
            "" => defaults.default_category.clone(),
            c => c.to_string(),
        };
        let image = match self.image.as_deref().map(str::trim) {
            Some(i) if !i.is_empty() => i.to_string(),
            _ => defaults.default_image.clone(),
        };
        let stock = parse_stock(&self.stock)?;

        let pricing = match self.pricing {
            PricingDraft::Flat(raw) => {
                Pricing::Flat(parse_amount("price", &raw)?.ok_or(ValidationError::MissingPrice)?)
            }
            PricingDraft::Tiered(rows) => {
                let mut tiers = Vec::with_capacity(rows.len());
                for row in rows {
                    let field = format!("price of {}", row.label);
                    if let Some(price) = parse_amount(&field, &row.amount)? {
                        tiers.push(SizePrice::new(row.label, price));
                    }
                }
                if tiers.is_empty() {
                    return Err(ValidationError::MissingPrice);
                }
                Pricing::Tiered(tiers)
            }
        };

        Ok(Product {
            id: self.id.unwrap_or_else(ProductId::generate),
            name,
            category,
            stock,
            image: Some(image),
            pricing,
        })
    }
}

/// Blank is `None`. Accepts a decimal comma (`12,50`).
fn parse_amount(field: &str, raw: &str) -> Result<Option<f64>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let normalized = if raw.contains('.') {
        raw.to_string()
    } else {
        raw.replace(',', ".")
    };
    let value = normalized
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ValidationError::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        })?;
    if value < 0.0 {
        return Err(ValidationError::NegativeNumber {
            field: field.to_string(),
        });
    }
    Ok(Some(value))
}

fn parse_stock(raw: &str) -> Result<u32, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    let invalid = || ValidationError::InvalidNumber {
        field: "stock".into(),
        value: raw.to_string(),
    };
    let value: i64 = raw.parse().map_err(|_| invalid())?;
    if value < 0 {
        return Err(ValidationError::NegativeNumber {
            field: "stock".into(),
        });
    }
    u32::try_from(value).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> EditorDefaults {
        EditorDefaults::default()
    }

    fn flat(name: &str, price: &str) -> ProductDraft {
        ProductDraft::new(name, PricingDraft::Flat(price.into()))
    }

    #[test]
    fn flat_draft_builds_product() {
        let mut draft = flat("  Guaraná  ", "6,50");
        draft.category = "bebida".into();
        draft.stock = "12".into();
        let p = draft.into_product(&defaults()).unwrap();
        assert_eq!(p.name, "Guaraná");
        assert_eq!(p.category, "bebida");
        assert_eq!(p.stock, 12);
        assert_eq!(p.pricing, Pricing::Flat(6.5));
        assert_eq!(p.image.as_deref(), Some("img/placeholder.jpg"));
        assert_eq!(p.id.as_str().len(), 8);
    }

    #[test]
    fn blank_fields_take_defaults() {
        let p = flat("X", "1").into_product(&defaults()).unwrap();
        assert_eq!(p.category, "salgada");
        assert_eq!(p.stock, 0);
    }

    #[test]
    fn existing_id_is_kept() {
        let mut draft = flat("X", "1");
        draft.id = Some(ProductId::new("abc").unwrap());
        assert_eq!(draft.into_product(&defaults()).unwrap().id.as_str(), "abc");
    }

    #[test]
    fn tiered_draft_skips_blank_rows() {
        let labels = defaults().tier_labels;
        let amounts = vec!["30".to_string(), "".to_string(), "55.9".to_string()];
        let draft = ProductDraft::new("Calabresa", PricingDraft::tiered_with_labels(&labels, &amounts));
        let p = draft.into_product(&defaults()).unwrap();
        assert_eq!(
            p.pricing,
            Pricing::Tiered(vec![
                SizePrice::new("Broto (4)", 30.0),
                SizePrice::new("Grande (8)", 55.9),
            ])
        );
        assert_eq!(p.display_price(), 30.0);
    }

    #[test]
    fn empty_name_is_rejected() {
        assert_eq!(
            flat("   ", "1").into_product(&defaults()),
            Err(ValidationError::EmptyName)
        );
    }

    #[test]
    fn missing_price_is_rejected() {
        assert_eq!(
            flat("X", "").into_product(&defaults()),
            Err(ValidationError::MissingPrice)
        );
        let draft = ProductDraft::new(
            "Y",
            PricingDraft::Tiered(vec![TierDraft::new("Broto (4)", " "), TierDraft::new("Média (6)", "")]),
        );
        assert_eq!(draft.into_product(&defaults()), Err(ValidationError::MissingPrice));
    }

    #[test]
    fn non_numeric_input_is_rejected() {
        let err = flat("X", "trinta").into_product(&defaults()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidNumber { ref field, .. } if field == "price"));

        let mut draft = flat("X", "1");
        draft.stock = "2.5".into();
        assert!(matches!(
            draft.into_product(&defaults()),
            Err(ValidationError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn negative_input_is_rejected() {
        let mut draft = flat("X", "1");
        draft.stock = "-1".into();
        assert_eq!(
            draft.into_product(&defaults()),
            Err(ValidationError::NegativeNumber { field: "stock".into() })
        );
        assert!(matches!(
            flat("X", "-3").into_product(&defaults()),
            Err(ValidationError::NegativeNumber { .. })
        ));
    }

    #[test]
    fn from_product_round_trips_through_validation() {
        let original = Product::new(
            ProductId::new("p1").unwrap(),
            "Portuguesa",
            "salgada",
            4,
            Pricing::Tiered(vec![SizePrice::new("Broto (4)", 31.5), SizePrice::new("Grande (8)", 62.0)]),
        )
        .with_image("img/portuguesa.jpg");
        let rebuilt = ProductDraft::from_product(&original)
            .into_product(&defaults())
            .unwrap();
        assert_eq!(rebuilt, original);
    }
}
