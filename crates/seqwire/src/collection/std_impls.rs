use std::{
    borrow::Borrow,
    collections::{BTreeSet, BinaryHeap, HashSet, LinkedList, VecDeque},
    hash::{BuildHasher, Hash},
};

use super::{Collection, Surface};

fn extend_from<C, T>(collection: &mut C, items: &mut dyn Iterator<Item = T>)
where
    C: Extend<T>,
{
    collection.extend(items);
}

fn vec_get<T>(vec: &Vec<T>, index: usize) -> &T {
    &vec[index]
}

fn deque_get<T>(deque: &VecDeque<T>, index: usize) -> &T {
    &deque[index]
}

fn btree_insert<T: Ord>(set: &mut BTreeSet<T>, value: T) {
    set.insert(value);
}

fn hash_insert<T: Eq + Hash, S: BuildHasher>(set: &mut HashSet<T, S>, value: T) {
    set.insert(value);
}

fn hash_with_capacity<T, S: BuildHasher + Default>(capacity: usize) -> HashSet<T, S> {
    HashSet::with_capacity_and_hasher(capacity, S::default())
}

impl<T: 'static> Collection for Vec<T> {
    type Item = T;

    #[inline]
    fn iter_items(&self) -> impl Iterator<Item = impl Borrow<T>> {
        self.iter()
    }

    fn surface() -> Surface<Self> {
        Surface::new()
            .with_len(Vec::len)
            .with_get(vec_get)
            .with_capacity(Vec::with_capacity)
            .with_default(Vec::new)
            .with_extend(extend_from)
            .with_push(Vec::push)
    }
}

impl<T: 'static> Collection for VecDeque<T> {
    type Item = T;

    #[inline]
    fn iter_items(&self) -> impl Iterator<Item = impl Borrow<T>> {
        self.iter()
    }

    fn surface() -> Surface<Self> {
        Surface::new()
            .with_len(VecDeque::len)
            .with_get(deque_get)
            .with_capacity(VecDeque::with_capacity)
            .with_default(VecDeque::new)
            .with_extend(extend_from)
            .with_enqueue(VecDeque::push_back)
    }
}

impl<T: 'static> Collection for LinkedList<T> {
    type Item = T;

    #[inline]
    fn iter_items(&self) -> impl Iterator<Item = impl Borrow<T>> {
        self.iter()
    }

    fn surface() -> Surface<Self> {
        Surface::new()
            .with_len(LinkedList::len)
            .with_default(LinkedList::new)
            .with_extend(extend_from)
            .with_append(LinkedList::push_back)
    }
}

impl<T: Ord + 'static> Collection for BTreeSet<T> {
    type Item = T;

    #[inline]
    fn iter_items(&self) -> impl Iterator<Item = impl Borrow<T>> {
        self.iter()
    }

    fn surface() -> Surface<Self> {
        Surface::new()
            .with_len(BTreeSet::len)
            .with_default(BTreeSet::new)
            .with_extend(extend_from)
            .with_append(btree_insert)
    }
}

impl<T, S> Collection for HashSet<T, S>
where
    T: Eq + Hash + 'static,
    S: BuildHasher + Default + 'static,
{
    type Item = T;

    #[inline]
    fn iter_items(&self) -> impl Iterator<Item = impl Borrow<T>> {
        self.iter()
    }

    fn surface() -> Surface<Self> {
        Surface::new()
            .with_len(HashSet::len)
            .with_capacity(hash_with_capacity)
            .with_default(HashSet::default)
            .with_extend(extend_from)
            .with_append(hash_insert)
    }
}

/// Iterates in the heap's internal order; round trips preserve the multiset only.
impl<T: Ord + 'static> Collection for BinaryHeap<T> {
    type Item = T;

    #[inline]
    fn iter_items(&self) -> impl Iterator<Item = impl Borrow<T>> {
        self.iter()
    }

    fn surface() -> Surface<Self> {
        Surface::new()
            .with_len(BinaryHeap::len)
            .with_capacity(BinaryHeap::with_capacity)
            .with_default(BinaryHeap::new)
            .with_extend(extend_from)
            .with_push(BinaryHeap::push)
    }
}
