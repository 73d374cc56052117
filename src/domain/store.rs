//! Ordered, id-unique entity store.
//!
//! The store is the browse-mode list: pages append to it in fetch order and it
//! rejects any entity whose id is already present, so overlapping pages (the
//! server shifting items between requests) never produce duplicate rows.

use super::EntitySummary;
use std::collections::HashSet;

/// Append-only sequence of entity summaries, unique by `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityStore {
    entities: Vec<EntitySummary>,
    ids: HashSet<i64>,
}

impl EntityStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `items` in order, skipping ids already stored.
    ///
    /// Returns the number of entities actually added. Duplicates within
    /// `items` itself are skipped as well; the first occurrence wins.
    pub fn append(&mut self, items: impl IntoIterator<Item = EntitySummary>) -> usize {
        let before = self.entities.len();
        for item in items {
            if self.ids.insert(item.id) {
                self.entities.push(item);
            } else {
                tracing::debug!(id = item.id, name = %item.name, "skipping duplicate entity");
            }
        }
        self.entities.len() - before
    }

    #[must_use]
    pub fn contains(&self, id: i64) -> bool {
        self.ids.contains(&id)
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&EntitySummary> {
        if !self.contains(id) {
            return None;
        }
        self.entities.iter().find(|entity| entity.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntitySummary> {
        self.entities.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[EntitySummary] {
        &self.entities
    }

    /// Case-insensitive substring match on names, preserving store order.
    #[must_use]
    pub fn filter_by_name(&self, query: &str) -> Vec<EntitySummary> {
        let needle = query.to_lowercase();
        self.entities
            .iter()
            .filter(|entity| entity.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

impl<'a> IntoIterator for &'a EntityStore {
    type Item = &'a EntitySummary;
    type IntoIter = std::slice::Iter<'a, EntitySummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}
