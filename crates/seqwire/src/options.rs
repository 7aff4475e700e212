use crate::{Error, Result};

/// Default flush granularity of the chunked encoder, in elements.
pub const MAX_CHUNK: usize = 1024;

/// Default upper bound on the capacity hint used by known-length decode.
pub const CAPACITY_HINT_LIMIT: usize = 64 * 1024;

/// Tuning knobs shared by every codec a [`CodecRegistry`](crate::CodecRegistry) compiles.
///
/// `max_chunk` only affects how a writer splits unknown-length sources; decoding
/// is chunk-size agnostic. `max_chunk_len` is the reader-side ceiling any chunk
/// header must respect.
///
/// Values are checked when a codec is compiled: a `max_chunk` outside
/// `1..=u32::MAX` fails construction with [`Error::InvalidMaxChunk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodecOptions {
    max_chunk: usize,
    max_chunk_len: u32,
    capacity_hint_limit: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_chunk: MAX_CHUNK,
            max_chunk_len: u32::MAX,
            capacity_hint_limit: CAPACITY_HINT_LIMIT,
        }
    }
}

impl CodecOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elements buffered before a full chunk is flushed.
    #[inline]
    pub fn max_chunk(&self) -> usize {
        self.max_chunk
    }

    /// Largest chunk header a decoder accepts.
    #[inline]
    pub fn max_chunk_len(&self) -> u32 {
        self.max_chunk_len
    }

    /// Largest capacity hint passed to sized construction while decoding.
    #[inline]
    pub fn capacity_hint_limit(&self) -> usize {
        self.capacity_hint_limit
    }

    pub fn with_max_chunk(mut self, max_chunk: usize) -> Self {
        self.max_chunk = max_chunk;
        self
    }

    pub fn with_max_chunk_len(mut self, max_chunk_len: u32) -> Self {
        self.max_chunk_len = max_chunk_len;
        self
    }

    pub fn with_capacity_hint_limit(mut self, limit: usize) -> Self {
        self.capacity_hint_limit = limit;
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.max_chunk == 0 || u32::try_from(self.max_chunk).is_err() {
            return Err(Error::InvalidMaxChunk {
                max_chunk: self.max_chunk,
            });
        }
        Ok(())
    }
}
