use std::borrow::Borrow;

mod feed;
mod std_impls;

pub use feed::*;

/// Positional element access.
pub type GetFn<C> = for<'a> fn(&'a C, usize) -> &'a <C as Collection>::Item;
/// Single-element insertion.
pub type AddFn<C> = fn(&mut C, <C as Collection>::Item);
/// Bulk append of already decoded elements.
pub type ExtendFn<C> = fn(&mut C, &mut dyn Iterator<Item = <C as Collection>::Item>);

/// A collection-typed field that seqwire can encode and decode.
///
/// Forward iteration is the only required capability. Everything else a type
/// supports is declared through [`Collection::surface`], which the codec builder
/// inspects once per type to pick an encode and a decode strategy.
pub trait Collection: Sized + 'static {
    type Item: 'static;

    /// Yields every element, in the order the wire stream should carry them.
    fn iter_items(&self) -> impl Iterator<Item = impl Borrow<Self::Item>>;

    /// Declares the operations this type supports.
    fn surface() -> Surface<Self>;
}

/// Table of optional operations a [`Collection`] exposes.
///
/// Built once per type pair by the codec builder and never consulted again on
/// the per-record path: the chosen entries are copied into the compiled codec.
pub struct Surface<C: Collection> {
    pub(crate) len: Option<fn(&C) -> usize>,
    pub(crate) get: Option<GetFn<C>>,
    pub(crate) with_capacity: Option<fn(usize) -> C>,
    pub(crate) default: Option<fn() -> C>,
    pub(crate) extend: Option<ExtendFn<C>>,
    pub(crate) append: Option<AddFn<C>>,
    pub(crate) enqueue: Option<AddFn<C>>,
    pub(crate) push: Option<AddFn<C>>,
}

impl<C: Collection> Surface<C> {
    /// A surface with no capabilities beyond forward iteration.
    pub fn new() -> Self {
        Self {
            len: None,
            get: None,
            with_capacity: None,
            default: None,
            extend: None,
            append: None,
            enqueue: None,
            push: None,
        }
    }

    /// Upfront element count.
    pub fn with_len(mut self, len: fn(&C) -> usize) -> Self {
        self.len = Some(len);
        self
    }

    /// Positional access, valid for every index below the count.
    pub fn with_get(mut self, get: GetFn<C>) -> Self {
        self.get = Some(get);
        self
    }

    /// Sized construction.
    pub fn with_capacity(mut self, with_capacity: fn(usize) -> C) -> Self {
        self.with_capacity = Some(with_capacity);
        self
    }

    /// Default construction.
    pub fn with_default(mut self, default: fn() -> C) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_extend(mut self, extend: ExtendFn<C>) -> Self {
        self.extend = Some(extend);
        self
    }

    pub fn with_append(mut self, append: AddFn<C>) -> Self {
        self.append = Some(append);
        self
    }

    pub fn with_enqueue(mut self, enqueue: AddFn<C>) -> Self {
        self.enqueue = Some(enqueue);
        self
    }

    pub fn with_push(mut self, push: AddFn<C>) -> Self {
        self.push = Some(push);
        self
    }

    #[inline]
    pub fn has_len(&self) -> bool {
        self.len.is_some()
    }

    #[inline]
    pub fn has_get(&self) -> bool {
        self.get.is_some()
    }
}

impl<C: Collection> Default for Surface<C> {
    fn default() -> Self {
        Self::new()
    }
}
