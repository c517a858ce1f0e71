use crate::shape::Shape;
use fnv::FnvHashSet;

/// Opaque identifier, interpreted by the caller only
/// (an array index for players, a packed generational id for enemies...).
pub type EntityId = u64;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityType {
    Player,
    Enemy,
}

/// What a cell stores for every shape covering it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityRecord {
    pub shape: Shape,
    pub entity_type: EntityType,
    pub entity_id: EntityId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct QueryResult {
    pub entity_type: EntityType,
    pub entity_id: EntityId,
}

/// Reusable, deduplicating output buffer for [`Grid::query`](crate::Grid::query).
///
/// Results are kept in the order they were first found.
/// Keep one around and pass it to every query so the query path doesn't allocate once warmed up.
///
/// ```rust
/// use flat_broadphase::{EntityType, QueryResult, QueryResults};
///
/// let mut out = QueryResults::new();
/// assert!(out.insert(QueryResult { entity_type: EntityType::Enemy, entity_id: 3 }));
/// assert!(!out.insert(QueryResult { entity_type: EntityType::Enemy, entity_id: 3 }));
/// assert_eq!(out.len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct QueryResults {
    items: Vec<QueryResult>,
    seen: FnvHashSet<QueryResult>,
}

impl QueryResults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            seen: FnvHashSet::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Empties the buffer, keeping its allocations.
    pub fn clear(&mut self) {
        self.items.clear();
        self.seen.clear();
    }

    /// Returns false if the result was already present.
    pub fn insert(&mut self, r: QueryResult) -> bool {
        if !self.seen.insert(r) {
            return false;
        }
        self.items.push(r);
        true
    }

    pub fn contains(&self, r: &QueryResult) -> bool {
        self.seen.contains(r)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryResult> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[QueryResult] {
        &self.items
    }
}

impl<'a> IntoIterator for &'a QueryResults {
    type Item = &'a QueryResult;
    type IntoIter = std::slice::Iter<'a, QueryResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
