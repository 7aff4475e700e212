use std::{
    any::{TypeId, type_name},
    fmt,
    hash::{Hash, Hasher},
};

use crate::{Collection, Surface};

/// Static capability class of a collection type. Fixes its wire strategy.
///
/// Ordered from least to most capable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Capability {
    /// Forward iteration only, count unknown. Chunked with a zero-length terminator.
    BareEnumerable,
    /// Upfront count, forward iteration. One chunk, no terminator.
    SizedOnly,
    /// Upfront count and positional access. One chunk, no terminator.
    Indexable,
}

impl Capability {
    /// Classifies a declared surface, preferring the most capable class it satisfies.
    ///
    /// Positional access without a count is not usable on its own and is ignored.
    pub fn classify<C: Collection>(surface: &Surface<C>) -> Self {
        match (surface.has_len(), surface.has_get()) {
            (true, true) => Self::Indexable,
            (true, false) => Self::SizedOnly,
            (false, _) => Self::BareEnumerable,
        }
    }

    #[inline]
    pub fn is_known_length(&self) -> bool {
        matches!(self, Self::Indexable | Self::SizedOnly)
    }

    #[inline]
    pub fn is_chunked(&self) -> bool {
        *self == Self::BareEnumerable
    }
}

/// Identity of a (collection type, element type) pair.
#[derive(Debug, Clone, Copy)]
pub struct SchemaKey {
    collection_id: TypeId,
    item_id: TypeId,
    collection: &'static str,
    item: &'static str,
}

impl SchemaKey {
    pub fn of<C: Collection>() -> Self {
        Self {
            collection_id: TypeId::of::<C>(),
            item_id: TypeId::of::<C::Item>(),
            collection: type_name::<C>(),
            item: type_name::<C::Item>(),
        }
    }

    #[inline]
    pub fn collection(&self) -> &'static str {
        self.collection
    }

    #[inline]
    pub fn item(&self) -> &'static str {
        self.item
    }
}

impl PartialEq for SchemaKey {
    fn eq(&self, other: &Self) -> bool {
        self.collection_id == other.collection_id && self.item_id == other.item_id
    }
}

impl Eq for SchemaKey {}

impl Hash for SchemaKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.collection_id.hash(state);
        self.item_id.hash(state);
    }
}

impl fmt::Display for SchemaKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.collection, self.item)
    }
}

/// Classification result computed once per type pair and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionDescriptor {
    key: SchemaKey,
    capability: Capability,
}

impl CollectionDescriptor {
    pub fn of<C: Collection>(surface: &Surface<C>) -> Self {
        Self {
            key: SchemaKey::of::<C>(),
            capability: Capability::classify(surface),
        }
    }

    #[inline]
    pub fn key(&self) -> SchemaKey {
        self.key
    }

    #[inline]
    pub fn capability(&self) -> Capability {
        self.capability
    }

    #[inline]
    pub fn collection(&self) -> &'static str {
        self.key.collection
    }

    #[inline]
    pub fn item(&self) -> &'static str {
        self.key.item
    }
}
