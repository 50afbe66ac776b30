use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use catalog_types::Product;

use crate::error::ViewError;
use crate::text::compare_names;

/// Display order of a view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    /// Merge order.
    #[default]
    Unsorted,
    NameAsc,
    NameDesc,
    StockAsc,
    StockDesc,
    PriceAsc,
    PriceDesc,
}

impl SortMode {
    pub const ALL: [SortMode; 7] = [
        SortMode::Unsorted,
        SortMode::NameAsc,
        SortMode::NameDesc,
        SortMode::StockAsc,
        SortMode::StockDesc,
        SortMode::PriceAsc,
        SortMode::PriceDesc,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortMode::Unsorted => "none",
            SortMode::NameAsc => "name-asc",
            SortMode::NameDesc => "name-desc",
            SortMode::StockAsc => "stock-asc",
            SortMode::StockDesc => "stock-desc",
            SortMode::PriceAsc => "price-asc",
            SortMode::PriceDesc => "price-desc",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortMode::Unsorted => Ordering::Equal,
            SortMode::NameAsc => compare_names(&a.name, &b.name),
            SortMode::NameDesc => compare_names(&b.name, &a.name),
            SortMode::StockAsc => a.stock.cmp(&b.stock),
            SortMode::StockDesc => b.stock.cmp(&a.stock),
            SortMode::PriceAsc => a.display_price().total_cmp(&b.display_price()),
            SortMode::PriceDesc => b.display_price().total_cmp(&a.display_price()),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts the English names and the Portuguese aliases (`nome-asc`,
/// `estoque-desc`, `preco-asc`, ...).
impl FromStr for SortMode {
    type Err = ViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mode = match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => SortMode::Unsorted,
            "name-asc" | "nome-asc" => SortMode::NameAsc,
            "name-desc" | "nome-desc" => SortMode::NameDesc,
            "stock-asc" | "estoque-asc" => SortMode::StockAsc,
            "stock-desc" | "estoque-desc" => SortMode::StockDesc,
            "price-asc" | "preco-asc" => SortMode::PriceAsc,
            "price-desc" | "preco-desc" => SortMode::PriceDesc,
            _ => return Err(ViewError::UnknownSortMode(s.to_string())),
        };
        Ok(mode)
    }
}

/// Stable sort; products that compare equal keep their input order.
pub fn sort(mut items: Vec<Product>, mode: SortMode) -> Vec<Product> {
    if mode != SortMode::Unsorted {
        items.sort_by(|a, b| mode.compare(a, b));
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_types::{Pricing, ProductId, SizePrice};

    fn product(id: &str, name: &str, stock: u32, pricing: Pricing) -> Product {
        Product::new(ProductId::new(id).unwrap(), name, "x", stock, pricing)
    }

    fn menu() -> Vec<Product> {
        vec![
            product("1", "Margherita", 5, Pricing::Flat(30.0)),
            product("2", "Água", 0, Pricing::Flat(4.0)),
            product(
                "3",
                "Calabresa",
                5,
                Pricing::Tiered(vec![SizePrice::new("Broto", 25.0), SizePrice::new("Grande", 50.0)]),
            ),
        ]
    }

    fn ids(items: &[Product]) -> Vec<&str> {
        items.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn by_name() {
        assert_eq!(ids(&sort(menu(), SortMode::NameAsc)), vec!["2", "3", "1"]);
        assert_eq!(ids(&sort(menu(), SortMode::NameDesc)), vec!["1", "3", "2"]);
    }

    #[test]
    fn by_stock_is_stable() {
        assert_eq!(ids(&sort(menu(), SortMode::StockAsc)), vec!["2", "1", "3"]);
        assert_eq!(ids(&sort(menu(), SortMode::StockDesc)), vec!["1", "3", "2"]);
    }

    #[test]
    fn by_price_uses_cheapest_tier() {
        assert_eq!(ids(&sort(menu(), SortMode::PriceAsc)), vec!["2", "3", "1"]);
        assert_eq!(ids(&sort(menu(), SortMode::PriceDesc)), vec!["1", "3", "2"]);
    }

    #[test]
    fn unsorted_keeps_order() {
        assert_eq!(ids(&sort(menu(), SortMode::Unsorted)), vec!["1", "2", "3"]);
    }

    #[test]
    fn sort_is_a_permutation() {
        for mode in SortMode::ALL {
            let mut sorted = ids(&sort(menu(), mode)).into_iter().map(String::from).collect::<Vec<_>>();
            sorted.sort();
            assert_eq!(sorted, vec!["1", "2", "3"], "{mode}");
        }
    }

    #[test]
    fn parse_modes_and_aliases() {
        assert_eq!("nome-asc".parse::<SortMode>().unwrap(), SortMode::NameAsc);
        assert_eq!("estoque-desc".parse::<SortMode>().unwrap(), SortMode::StockDesc);
        assert_eq!("PRICE-ASC".parse::<SortMode>().unwrap(), SortMode::PriceAsc);
        for mode in SortMode::ALL {
            assert_eq!(mode.as_str().parse::<SortMode>().unwrap(), mode);
        }
        assert_eq!(
            "sideways".parse::<SortMode>(),
            Err(ViewError::UnknownSortMode("sideways".into()))
        );
    }
}
