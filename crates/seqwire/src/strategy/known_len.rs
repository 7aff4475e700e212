use std::borrow::Borrow;

use crate::{Collection, GetFn, ItemCodec, Result, Sink, Source};

use super::{Construct, Insert, chunk_len, read_header};

/// One chunk carrying the whole collection, elements fetched by position.
pub(crate) fn encode_indexable<C: Collection>(
    sink: &mut dyn Sink,
    collection: &C,
    len: fn(&C) -> usize,
    get: GetFn<C>,
    item: &dyn ItemCodec<C::Item>,
) -> Result<()> {
    let count = len(collection);
    sink.write_chunk_header(chunk_len(count)?)?;
    for index in 0..count {
        item.encode_item(sink, get(collection, index))?;
    }
    Ok(())
}

/// One chunk carrying the whole collection, elements fetched by iteration.
///
/// The header is written from the count observed up front. The collection must
/// not change between that read and the end of iteration, otherwise the header
/// and the number of elements emitted disagree and the stream is malformed.
pub(crate) fn encode_sized<C: Collection>(
    sink: &mut dyn Sink,
    collection: &C,
    len: fn(&C) -> usize,
    item: &dyn ItemCodec<C::Item>,
) -> Result<()> {
    let count = len(collection);
    sink.write_chunk_header(chunk_len(count)?)?;

    let mut emitted = 0usize;
    for value in collection.iter_items() {
        item.encode_item(sink, value.borrow())?;
        emitted += 1;
    }
    debug_assert_eq!(
        emitted, count,
        "iteration length disagrees with the count of the collection"
    );

    Ok(())
}

/// Reads the single header, then exactly that many elements. No terminator.
pub(crate) fn decode_known_len<C: Collection>(
    source: &mut dyn Source,
    construct: &Construct<C>,
    insert: &Insert<C>,
    capacity_hint_limit: usize,
    max_chunk_len: u32,
    item: &dyn ItemCodec<C::Item>,
) -> Result<C> {
    let count = read_header(source, max_chunk_len)? as usize;
    let mut collection = construct.build(count.min(capacity_hint_limit));

    match *insert {
        Insert::Extend(extend) => {
            let mut failure = None;
            let mut decoded = (0..count).map_while(|_| match item.decode_item(source) {
                Ok(value) => Some(value),
                Err(e) => {
                    failure = Some(e);
                    None
                }
            });
            extend(&mut collection, &mut decoded);
            drop(decoded);
            if let Some(e) = failure {
                return Err(e);
            }
        }
        Insert::Add(add) => {
            for _ in 0..count {
                add(&mut collection, item.decode_item(source)?);
            }
        }
    }

    Ok(collection)
}
