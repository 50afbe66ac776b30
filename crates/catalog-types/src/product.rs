//! The catalog [`Product`] and its pricing model.
//!
//! On the wire a product is a flat JSON object:
//!
//! ```text
//! { "id": "1", "nome": "Margherita", "categoria": "salgada", "estoque": 5,
//!   "imagem": "img/margherita.jpg",
//!   "tamanhos": [ { "rotulo": "Broto (4)", "preco": 30 } ] }
//! ```
//!
//! A product carries either `preco` or a non-empty `tamanhos` list. Decoding
//! coerces instead of validating:
//!
//! - a non-empty `tamanhos` wins over `preco`; with neither, the price is 0
//! - `estoque` accepts any number or numeric string; negatives, non-finite
//!   values, and garbage become 0 and fractions are truncated
//! - amounts accept numbers or numeric strings; anything else becomes 0
//! - missing `nome` / `categoria` become empty strings
//!
//! Only `id` is mandatory.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;
use crate::identity::ProductId;

/// One labelled price tier, e.g. `Broto (4)` at 30.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SizePrice {
    #[serde(rename = "rotulo", default, deserialize_with = "de_text")]
    pub label: String,
    #[serde(
        rename = "preco",
        default,
        serialize_with = "ser_amount",
        deserialize_with = "de_amount"
    )]
    pub price: f64,
}

impl SizePrice {
    pub fn new(label: impl Into<String>, price: f64) -> Self {
        Self {
            label: label.into(),
            price,
        }
    }
}

/// How a product is priced.
#[derive(Clone, Debug, PartialEq)]
pub enum Pricing {
    /// A single price.
    Flat(f64),
    /// Price by size. Never empty when built through [`Pricing::from_parts`].
    Tiered(Vec<SizePrice>),
}

impl Pricing {
    /// Pick the pricing variant from the two optional wire fields.
    ///
    /// A non-empty tier list takes precedence; otherwise the flat amount is
    /// used, defaulting to 0.
    pub fn from_parts(preco: Option<f64>, tamanhos: Option<Vec<SizePrice>>) -> Self {
        match tamanhos {
            Some(tiers) if !tiers.is_empty() => Pricing::Tiered(tiers),
            _ => Pricing::Flat(preco.unwrap_or(0.0)),
        }
    }

    /// Price shown in listings: the flat amount, or the cheapest tier.
    pub fn display_price(&self) -> f64 {
        match self {
            Pricing::Flat(amount) => *amount,
            Pricing::Tiered(tiers) => tiers
                .iter()
                .map(|t| t.price)
                .min_by(f64::total_cmp)
                .unwrap_or(0.0),
        }
    }

    pub fn is_tiered(&self) -> bool {
        matches!(self, Pricing::Tiered(_))
    }

    pub fn tiers(&self) -> &[SizePrice] {
        match self {
            Pricing::Flat(_) => &[],
            Pricing::Tiered(tiers) => tiers,
        }
    }
}

/// A catalog entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProductRecord", into = "ProductRecord")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub stock: u32,
    pub image: Option<String>,
    pub pricing: Pricing,
}

impl Product {
    /// Create a product with no image.
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        category: impl Into<String>,
        stock: u32,
        pricing: Pricing,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            stock,
            image: None,
            pricing,
        }
    }

    /// Decode a product from an already parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, TypeError> {
        serde_json::from_value(value).map_err(|e| TypeError::MalformedProduct(e.to_string()))
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_stock(mut self, stock: u32) -> Self {
        self.stock = stock;
        self
    }

    pub fn display_price(&self) -> f64 {
        self.pricing.display_price()
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock == 0
    }
}

/// Wire shape of a [`Product`].
#[derive(Serialize, Deserialize)]
struct ProductRecord {
    id: ProductId,
    #[serde(default, deserialize_with = "de_text")]
    nome: String,
    #[serde(default, deserialize_with = "de_text")]
    categoria: String,
    #[serde(default, deserialize_with = "de_stock")]
    estoque: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    imagem: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "ser_opt_amount",
        deserialize_with = "de_opt_amount"
    )]
    preco: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tamanhos: Option<Vec<SizePrice>>,
}

impl From<ProductRecord> for Product {
    fn from(r: ProductRecord) -> Self {
        Self {
            id: r.id,
            name: r.nome,
            category: r.categoria,
            stock: r.estoque,
            image: r.imagem,
            pricing: Pricing::from_parts(r.preco, r.tamanhos),
        }
    }
}

impl From<Product> for ProductRecord {
    fn from(p: Product) -> Self {
        let (preco, tamanhos) = match p.pricing {
            Pricing::Flat(amount) => (Some(amount), None),
            Pricing::Tiered(tiers) => (None, Some(tiers)),
        };
        Self {
            id: p.id,
            nome: p.name,
            categoria: p.category,
            estoque: p.stock,
            imagem: p.image,
            preco,
            tamanhos,
        }
    }
}

// ---------------------------------------------------------------------------
// Coercion helpers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl Numeric {
    fn to_f64(&self) -> Option<f64> {
        let n = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) if s.trim().is_empty() => 0.0,
            Numeric::Text(s) => s.trim().parse::<f64>().ok()?,
            Numeric::Flag(b) => f64::from(u8::from(*b)),
        };
        n.is_finite().then_some(n)
    }
}

fn coerce_amount(raw: Option<Numeric>) -> f64 {
    raw.and_then(|n| n.to_f64()).unwrap_or(0.0)
}

fn coerce_stock(raw: Option<Numeric>) -> u32 {
    match raw.and_then(|n| n.to_f64()) {
        Some(n) if n > 0.0 => n.trunc().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

fn de_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

fn de_stock<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    Ok(coerce_stock(Option::<Numeric>::deserialize(d)?))
}

fn de_amount<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(coerce_amount(Option::<Numeric>::deserialize(d)?))
}

fn de_opt_amount<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    Ok(Option::<Numeric>::deserialize(d)?.map(|n| coerce_amount(Some(n))))
}

/// Whole amounts are written as integers so exported JSON reads `30`, not `30.0`.
fn ser_amount<S: Serializer>(amount: &f64, s: S) -> Result<S::Ok, S::Error> {
    if amount.fract() == 0.0 && amount.abs() < 9.0e15 {
        s.serialize_i64(*amount as i64)
    } else {
        s.serialize_f64(*amount)
    }
}

fn ser_opt_amount<S: Serializer>(amount: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
    match amount {
        Some(a) => ser_amount(a, s),
        None => s.serialize_none(),
    }
}
