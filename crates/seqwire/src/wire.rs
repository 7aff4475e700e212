use std::io::{Read, Write};

use crate::Result;

/// Width in bytes of a chunk header on the wire.
pub const CHUNK_HEADER_SIZE: usize = size_of::<u32>();

/// Byte sink that encoders write into.
///
/// Implemented for every [`std::io::Write`], so a `Vec<u8>`, a `File` or a
/// `BufWriter` can be passed wherever a `&mut dyn Sink` is expected.
pub trait Sink {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Writes a chunk header: a little-endian `u32` element count.
    #[inline]
    fn write_chunk_header(&mut self, len: u32) -> Result<()> {
        self.write_bytes(&len.to_le_bytes())
    }
}

impl<W: Write + ?Sized> Sink for W {
    #[inline]
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_all(bytes)?;
        Ok(())
    }
}

/// Byte source that decoders read from.
///
/// Implemented for every [`std::io::Read`]. Running out of input surfaces as
/// [`Error::UnexpectedEof`](crate::Error::UnexpectedEof).
pub trait Source {
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()>;

    #[inline]
    fn read_chunk_header(&mut self) -> Result<u32> {
        let mut buf = [0u8; CHUNK_HEADER_SIZE];
        self.read_bytes(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }
}

impl<R: Read + ?Sized> Source for R {
    #[inline]
    fn read_bytes(&mut self, buf: &mut [u8]) -> Result<()> {
        self.read_exact(buf)?;
        Ok(())
    }
}
