use std::{any::type_name, borrow::Borrow};

use log::trace;

use crate::{AddFn, Collection, Error, ItemCodec, MAX_CHUNK, Result, Sink, Source};

use super::{chunk_len, read_header};

/// Encodes a source of unknown length as a run of chunks.
///
/// Elements are buffered up to `max_chunk` and flushed as one full chunk when
/// the next element arrives. Once the source is exhausted the remainder goes
/// out as a final chunk, and a zero-length terminator follows unless that
/// final chunk was already empty.
///
/// ```text
/// 2050 elements, max_chunk = 1024:
///   [1024] e0 .. e1023  [1024] e1024 .. e2047  [2] e2048 e2049  [0]
/// ```
pub(crate) fn encode_chunked<C: Collection>(
    sink: &mut dyn Sink,
    collection: &C,
    max_chunk: usize,
    item: &dyn ItemCodec<C::Item>,
) -> Result<()> {
    // Grows past the default only when the source actually has that many.
    let mut buffer = Vec::with_capacity(max_chunk.min(MAX_CHUNK));

    for value in collection.iter_items() {
        if buffer.len() == max_chunk {
            flush(sink, &mut buffer, item)?;
        }
        buffer.push(value);
    }

    let tail = buffer.len();
    flush(sink, &mut buffer, item)?;
    if tail != 0 {
        sink.write_chunk_header(0)?;
    }

    Ok(())
}

fn flush<T, B: Borrow<T>>(
    sink: &mut dyn Sink,
    buffer: &mut Vec<B>,
    item: &dyn ItemCodec<T>,
) -> Result<()> {
    trace!("Flushing chunk of {} element(s)", buffer.len());
    sink.write_chunk_header(chunk_len(buffer.len())?)?;
    for value in buffer.drain(..) {
        item.encode_item(sink, value.borrow())?;
    }
    Ok(())
}

/// Inverse of [`encode_chunked`]: reads chunks until a zero-length header.
///
/// Running out of input before that header is a protocol violation.
pub(crate) fn decode_chunked<C: Collection>(
    source: &mut dyn Source,
    default: fn() -> C,
    add: AddFn<C>,
    max_chunk_len: u32,
    item: &dyn ItemCodec<C::Item>,
) -> Result<C> {
    let mut collection = default();

    loop {
        let len = match read_header(source, max_chunk_len) {
            Ok(len) => len,
            Err(Error::UnexpectedEof) => {
                return Err(Error::MissingTerminator {
                    collection: type_name::<C>(),
                });
            }
            Err(e) => return Err(e),
        };
        if len == 0 {
            break;
        }
        for _ in 0..len {
            add(&mut collection, item.decode_item(source)?);
        }
    }

    Ok(collection)
}
