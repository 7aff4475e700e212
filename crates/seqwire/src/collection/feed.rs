use std::borrow::Borrow;

use super::{Collection, Surface};

/// Append-only sequence that only supports forward iteration.
///
/// A `Feed` deliberately exposes no element count, so it is encoded with the
/// chunked strategy: memory spent on buffering while writing stays bounded by
/// the chunk size regardless of how many elements were fed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed<T> {
    items: Vec<T>,
}

impl<T> Default for Feed<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Feed<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn append(&mut self, value: T) {
        self.items.push(value);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T> FromIterator<T> for Feed<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<T> Extend<T> for Feed<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl<T> IntoIterator for Feed<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Feed<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: 'static> Collection for Feed<T> {
    type Item = T;

    #[inline]
    fn iter_items(&self) -> impl Iterator<Item = impl Borrow<T>> {
        self.items.iter()
    }

    fn surface() -> Surface<Self> {
        Surface::new()
            .with_default(Feed::new)
            .with_append(Feed::append)
    }
}
