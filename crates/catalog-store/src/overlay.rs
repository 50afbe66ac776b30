//! In-memory shape of the overlay: ordered edits plus ordered tombstones.
//!
//! Both collections keep the order in which ids first entered them, which is
//! also the order they are persisted in. Replacing an edit keeps its slot.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use catalog_types::{Product, ProductId};

/// Locally created or updated products, keyed by id, in first-insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EditSet {
    items: Vec<Product>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list that may repeat ids. A repeated id keeps the slot of
    /// its first occurrence and the value of its last.
    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut set = Self::new();
        for p in products {
            set.upsert(p);
        }
        set
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.items.iter().find(|p| p.id.as_str() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Insert or replace by id. Returns the replaced product, if any.
    pub fn upsert(&mut self, product: Product) -> Option<Product> {
        match self.items.iter().position(|p| p.id == product.id) {
            Some(i) => Some(std::mem::replace(&mut self.items[i], product)),
            None => {
                self.items.push(product);
                None
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Product> {
        let i = self.items.iter().position(|p| p.id.as_str() == id)?;
        Some(self.items.remove(i))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Product] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Product> {
        self.items
    }
}

impl<'a> IntoIterator for &'a EditSet {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Product> for EditSet {
    fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
        Self::from_products(iter)
    }
}

impl Serialize for EditSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.items)
    }
}

impl<'de> Deserialize<'de> for EditSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Self::from_products(Vec::<Product>::deserialize(deserializer)?))
    }
}

/// Ids deleted from the effective view, in deletion order, without repeats.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TombstoneSet {
    ids: Vec<ProductId>,
}

impl TombstoneSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|t| t.as_str() == id)
    }

    /// Record a tombstone. Returns `false` if it was already present.
    pub fn insert(&mut self, id: ProductId) -> bool {
        if self.contains(id.as_str()) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Clear a tombstone. Returns `false` if it was not present.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|t| t.as_str() == id) {
            Some(i) => {
                self.ids.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProductId> {
        self.ids.iter()
    }
}

impl<'a> IntoIterator for &'a TombstoneSet {
    type Item = &'a ProductId;
    type IntoIter = std::slice::Iter<'a, ProductId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

impl FromIterator<ProductId> for TombstoneSet {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl Serialize for TombstoneSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.ids)
    }
}

impl<'de> Deserialize<'de> for TombstoneSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Vec::<ProductId>::deserialize(deserializer)?
            .into_iter()
            .collect())
    }
}

/// A snapshot of both overlay collections.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Overlay {
    pub edits: EditSet,
    pub tombstones: TombstoneSet,
}

impl Overlay {
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty() && self.tombstones.is_empty()
    }

    /// True when no id is both edited and tombstoned.
    pub fn is_disjoint(&self) -> bool {
        self.edits
            .iter()
            .all(|p| !self.tombstones.contains(p.id.as_str()))
    }

    pub fn status(&self) -> OverlayStatus {
        OverlayStatus {
            edits: self.edits.len(),
            tombstones: self.tombstones.len(),
        }
    }
}

/// Sizes of the overlay collections, for status lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayStatus {
    pub edits: usize,
    pub tombstones: usize,
}
