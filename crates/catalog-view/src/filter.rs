use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use catalog_types::Product;

use crate::text::fold;

/// Which categories a view shows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// `"all"` (any case) or an empty string selects every category.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

/// Name query plus category selection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub query: String,
    pub category: CategoryFilter,
}

impl Filter {
    pub fn new(query: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            query: query.into(),
            category,
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        self.matches_folded(product, &fold(&self.query))
    }

    fn matches_folded(&self, product: &Product, folded_query: &str) -> bool {
        self.category.matches(&product.category)
            && (folded_query.is_empty() || fold(&product.name).contains(folded_query))
    }
}

/// Products matching `filter_by`, in their original order.
pub fn filter(items: &[Product], filter_by: &Filter) -> Vec<Product> {
    let folded = fold(&filter_by.query);
    items
        .iter()
        .filter(|p| filter_by.matches_folded(p, &folded))
        .cloned()
        .collect()
}

/// Distinct non-empty categories, sorted.
pub fn categories(items: &[Product]) -> Vec<String> {
    items
        .iter()
        .filter(|p| !p.category.is_empty())
        .map(|p| p.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
