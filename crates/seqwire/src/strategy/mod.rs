use std::any::type_name;

use crate::{
    AddFn, AddMethod, Capability, Collection, Error, ExtendFn, GetFn, ItemCodec, Result, Sink,
    Source, Surface,
};

mod chunked;
mod known_len;

pub(crate) use chunked::*;
pub(crate) use known_len::*;

/// Encode side of a compiled codec, chosen from the capability class.
pub(crate) enum EncodeStrategy<C: Collection> {
    Indexable { len: fn(&C) -> usize, get: GetFn<C> },
    SizedOnly { len: fn(&C) -> usize },
    Chunked { max_chunk: usize },
}

impl<C: Collection> EncodeStrategy<C> {
    pub fn select(capability: Capability, surface: &Surface<C>, max_chunk: usize) -> Self {
        match (capability, surface.len, surface.get) {
            (Capability::Indexable, Some(len), Some(get)) => Self::Indexable { len, get },
            (Capability::SizedOnly | Capability::Indexable, Some(len), _) => {
                Self::SizedOnly { len }
            }
            _ => Self::Chunked { max_chunk },
        }
    }

    #[inline]
    pub fn encode(
        &self,
        sink: &mut dyn Sink,
        collection: &C,
        item: &dyn ItemCodec<C::Item>,
    ) -> Result<()> {
        match *self {
            Self::Indexable { len, get } => encode_indexable(sink, collection, len, get, item),
            Self::SizedOnly { len } => encode_sized(sink, collection, len, item),
            Self::Chunked { max_chunk } => encode_chunked(sink, collection, max_chunk, item),
        }
    }
}

/// How decoded elements of a known-length stream reach the collection.
pub(crate) enum Insert<C: Collection> {
    Extend(ExtendFn<C>),
    Add(AddFn<C>),
}

/// How the target collection is created before decoding into it.
pub(crate) enum Construct<C: Collection> {
    WithCapacity(fn(usize) -> C),
    Default(fn() -> C),
}

impl<C: Collection> Construct<C> {
    #[inline]
    pub fn build(&self, capacity_hint: usize) -> C {
        match *self {
            Self::WithCapacity(with_capacity) => with_capacity(capacity_hint),
            Self::Default(default) => default(),
        }
    }
}

/// Decode side of a compiled codec.
pub(crate) enum DecodeStrategy<C: Collection> {
    KnownLength {
        construct: Construct<C>,
        insert: Insert<C>,
        capacity_hint_limit: usize,
    },
    Chunked {
        default: fn() -> C,
        add: AddFn<C>,
    },
}

impl<C: Collection> DecodeStrategy<C> {
    /// Wires the decode path for `capability`, resolving the insertion
    /// operation when the path needs one.
    ///
    /// Returns the add method that was resolved, if any.
    pub fn select(
        capability: Capability,
        surface: &Surface<C>,
        capacity_hint_limit: usize,
    ) -> Result<(Self, Option<AddMethod>)> {
        let collection = type_name::<C>();

        if capability.is_chunked() {
            let default = surface
                .default
                .ok_or(Error::NoConstructor { collection })?;
            let (method, add) = AddMethod::require(surface)?;
            return Ok((Self::Chunked { default, add }, Some(method)));
        }

        let construct = match (surface.with_capacity, surface.default) {
            (Some(with_capacity), _) => Construct::WithCapacity(with_capacity),
            (None, Some(default)) => Construct::Default(default),
            (None, None) => return Err(Error::NoConstructor { collection }),
        };

        let (insert, method) = match surface.extend {
            Some(extend) => (Insert::Extend(extend), None),
            None => match AddMethod::resolve(surface) {
                Some((method, add)) => (Insert::Add(add), Some(method)),
                None => return Err(Error::NoInsertion { collection }),
            },
        };

        Ok((
            Self::KnownLength {
                construct,
                insert,
                capacity_hint_limit,
            },
            method,
        ))
    }

    #[inline]
    pub fn decode(
        &self,
        source: &mut dyn Source,
        item: &dyn ItemCodec<C::Item>,
        max_chunk_len: u32,
    ) -> Result<C> {
        match self {
            Self::KnownLength {
                construct,
                insert,
                capacity_hint_limit,
            } => decode_known_len(
                source,
                construct,
                insert,
                *capacity_hint_limit,
                max_chunk_len,
                item,
            ),
            Self::Chunked { default, add } => {
                decode_chunked(source, *default, *add, max_chunk_len, item)
            }
        }
    }
}

/// Reads a chunk header and checks it against the agreed maximum.
#[inline]
pub(crate) fn read_header(source: &mut dyn Source, max_chunk_len: u32) -> Result<u32> {
    let len = source.read_chunk_header()?;
    if len > max_chunk_len {
        return Err(Error::ChunkTooLong {
            len,
            max: max_chunk_len,
        });
    }
    Ok(len)
}

#[inline]
pub(crate) fn chunk_len(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::CountOverflow { len })
}
