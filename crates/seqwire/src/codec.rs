use std::{marker::PhantomData, sync::Arc};

use crate::{CodecRegistry, Collection, Error, Result, Sink, Source};

/// Element-level encode/decode for a single value.
///
/// Implementations must be self-framing: `decode` consumes exactly the bytes
/// `encode` produced, so values can be laid back to back inside a chunk.
pub trait Codec: Sized + Send + Sync + 'static {
    fn encode(&self, sink: &mut dyn Sink) -> Result<()>;

    fn decode(source: &mut dyn Source) -> Result<Self>;

    /// Resolves the codec an enclosing collection uses for this type.
    ///
    /// Called once, when the enclosing collection codec is compiled. Collection
    /// types override it to hand out their own compiled codec; composite types
    /// override it to resolve their parts from the same registry.
    fn item_codec(registry: &CodecRegistry) -> Result<Arc<dyn ItemCodec<Self>>> {
        let _ = registry;
        let codec: Arc<dyn ItemCodec<Self>> = Arc::new(PlainCodec::<Self>::new());
        Ok(codec)
    }
}

/// Object-safe element codec a compiled collection codec closes over.
pub trait ItemCodec<T>: Send + Sync {
    fn encode_item(&self, sink: &mut dyn Sink, value: &T) -> Result<()>;

    fn decode_item(&self, source: &mut dyn Source) -> Result<T>;
}

/// [`ItemCodec`] backed by a type's [`Codec`] implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCodec<T>(PhantomData<fn() -> T>);

impl<T> PlainCodec<T> {
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

/// [`ItemCodec`] assembled from a pair of closures.
///
/// Composite element types (options, tuples, derived structs) use it to close
/// over the item codecs of their parts, so every nested collection is resolved
/// from the registry compiling the enclosing codec.
pub struct FnCodec<T, E, D> {
    encode: E,
    decode: D,
    _item: PhantomData<fn() -> T>,
}

impl<T, E, D> FnCodec<T, E, D>
where
    E: Fn(&mut dyn Sink, &T) -> Result<()> + Send + Sync,
    D: Fn(&mut dyn Source) -> Result<T> + Send + Sync,
{
    pub fn new(encode: E, decode: D) -> Self {
        Self {
            encode,
            decode,
            _item: PhantomData,
        }
    }
}

impl<T, E, D> ItemCodec<T> for FnCodec<T, E, D>
where
    E: Fn(&mut dyn Sink, &T) -> Result<()> + Send + Sync,
    D: Fn(&mut dyn Source) -> Result<T> + Send + Sync,
{
    #[inline]
    fn encode_item(&self, sink: &mut dyn Sink, value: &T) -> Result<()> {
        (self.encode)(sink, value)
    }

    #[inline]
    fn decode_item(&self, source: &mut dyn Source) -> Result<T> {
        (self.decode)(source)
    }
}

impl<T: Codec> ItemCodec<T> for PlainCodec<T> {
    #[inline(always)]
    fn encode_item(&self, sink: &mut dyn Sink, value: &T) -> Result<()> {
        value.encode(sink)
    }

    #[inline(always)]
    fn decode_item(&self, source: &mut dyn Source) -> Result<T> {
        T::decode(source)
    }
}

/// Collections nest as elements of other values through their compiled codec.
///
/// Inside a compiled codec, directly or through an option, tuple or derived
/// struct, the inner codec is resolved once from the same registry when the
/// outer one is compiled. A direct `encode`/`decode` call has no registry at
/// hand and looks it up in [`CodecRegistry::global`].
impl<C> Codec for C
where
    C: Collection + Send + Sync,
    C::Item: Codec,
{
    #[inline]
    fn encode(&self, sink: &mut dyn Sink) -> Result<()> {
        CodecRegistry::global().encode(sink, self)
    }

    #[inline]
    fn decode(source: &mut dyn Source) -> Result<Self> {
        CodecRegistry::global().decode(source)
    }

    fn item_codec(registry: &CodecRegistry) -> Result<Arc<dyn ItemCodec<Self>>> {
        let codec: Arc<dyn ItemCodec<Self>> = registry.get::<C>()?;
        Ok(codec)
    }
}

macro_rules! impl_codec_for_numeric {
    ($($t:ty),*) => {
        $(
            impl Codec for $t {
                #[inline]
                fn encode(&self, sink: &mut dyn Sink) -> Result<()> {
                    sink.write_bytes(&self.to_le_bytes())
                }

                #[inline]
                fn decode(source: &mut dyn Source) -> Result<Self> {
                    let mut buf = [0u8; size_of::<$t>()];
                    source.read_bytes(&mut buf)?;
                    Ok(<$t>::from_le_bytes(buf))
                }
            }
        )*
    };
}

impl_codec_for_numeric!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128, f32, f64);

// Pointer-sized integers travel as 64-bit so both ends agree across platforms.
impl Codec for usize {
    #[inline]
    fn encode(&self, sink: &mut dyn Sink) -> Result<()> {
        (*self as u64).encode(sink)
    }

    #[inline]
    fn decode(source: &mut dyn Source) -> Result<Self> {
        let value = u64::decode(source)?;
        usize::try_from(value).map_err(|_| Error::IntegerOutOfRange(value.into()))
    }
}

impl Codec for isize {
    #[inline]
    fn encode(&self, sink: &mut dyn Sink) -> Result<()> {
        (*self as i64).encode(sink)
    }

    #[inline]
    fn decode(source: &mut dyn Source) -> Result<Self> {
        let value = i64::decode(source)?;
        isize::try_from(value).map_err(|_| Error::IntegerOutOfRange(value.into()))
    }
}

impl Codec for bool {
    #[inline]
    fn encode(&self, sink: &mut dyn Sink) -> Result<()> {
        sink.write_bytes(&[*self as u8])
    }

    #[inline]
    fn decode(source: &mut dyn Source) -> Result<Self> {
        match u8::decode(source)? {
            0 => Ok(false),
            1 => Ok(true),
            byte => Err(Error::InvalidBool(byte)),
        }
    }
}

impl Codec for char {
    #[inline]
    fn encode(&self, sink: &mut dyn Sink) -> Result<()> {
        u32::from(*self).encode(sink)
    }

    #[inline]
    fn decode(source: &mut dyn Source) -> Result<Self> {
        let scalar = u32::decode(source)?;
        char::from_u32(scalar).ok_or(Error::InvalidChar(scalar))
    }
}

impl Codec for () {
    #[inline]
    fn encode(&self, _: &mut dyn Sink) -> Result<()> {
        Ok(())
    }

    #[inline]
    fn decode(_: &mut dyn Source) -> Result<Self> {
        Ok(())
    }
}

const STRING_BLOCK: usize = 4096;

/// `u32` byte length followed by UTF-8 bytes.
impl Codec for String {
    fn encode(&self, sink: &mut dyn Sink) -> Result<()> {
        let len = self.len();
        u32::try_from(len)
            .map_err(|_| Error::CountOverflow { len })?
            .encode(sink)?;
        sink.write_bytes(self.as_bytes())
    }

    /// The declared length is not trusted for allocation: bytes are read in
    /// blocks and the buffer only grows as they arrive.
    fn decode(source: &mut dyn Source) -> Result<Self> {
        let len = u32::decode(source)? as usize;
        let mut buf = Vec::with_capacity(len.min(STRING_BLOCK));
        let mut block = [0u8; STRING_BLOCK];
        let mut remaining = len;
        while remaining > 0 {
            let n = remaining.min(STRING_BLOCK);
            source.read_bytes(&mut block[..n])?;
            buf.extend_from_slice(&block[..n]);
            remaining -= n;
        }
        Ok(String::from_utf8(buf)?)
    }
}

fn encode_option<T>(
    sink: &mut dyn Sink,
    value: &Option<T>,
    inner: &dyn ItemCodec<T>,
) -> Result<()> {
    match value {
        None => sink.write_bytes(&[0]),
        Some(value) => {
            sink.write_bytes(&[1])?;
            inner.encode_item(sink, value)
        }
    }
}

fn decode_option<T>(source: &mut dyn Source, inner: &dyn ItemCodec<T>) -> Result<Option<T>> {
    match u8::decode(source)? {
        0 => Ok(None),
        1 => Ok(Some(inner.decode_item(source)?)),
        tag => Err(Error::InvalidOptionTag(tag)),
    }
}

/// `u8` presence tag (0 or 1) followed by the value when present.
impl<T: Codec> Codec for Option<T> {
    fn encode(&self, sink: &mut dyn Sink) -> Result<()> {
        encode_option(sink, self, &PlainCodec::<T>::new())
    }

    fn decode(source: &mut dyn Source) -> Result<Self> {
        decode_option(source, &PlainCodec::<T>::new())
    }

    fn item_codec(registry: &CodecRegistry) -> Result<Arc<dyn ItemCodec<Self>>> {
        let inner = T::item_codec(registry)?;
        let encoder = inner.clone();
        let codec: Arc<dyn ItemCodec<Self>> = Arc::new(FnCodec::new(
            move |sink: &mut dyn Sink, value: &Self| encode_option(sink, value, encoder.as_ref()),
            move |source: &mut dyn Source| decode_option(source, inner.as_ref()),
        ));
        Ok(codec)
    }
}

macro_rules! impl_codec_for_tuple {
    ($($name:ident . $idx:tt),+) => {
        impl<$($name: Codec),+> Codec for ($($name,)+) {
            #[inline]
            fn encode(&self, sink: &mut dyn Sink) -> Result<()> {
                $(self.$idx.encode(sink)?;)+
                Ok(())
            }

            #[inline]
            fn decode(source: &mut dyn Source) -> Result<Self> {
                Ok(($($name::decode(source)?,)+))
            }

            fn item_codec(registry: &CodecRegistry) -> Result<Arc<dyn ItemCodec<Self>>> {
                let decoders = Arc::new(($(<$name as Codec>::item_codec(registry)?,)+));
                let encoders = decoders.clone();
                let codec: Arc<dyn ItemCodec<Self>> = Arc::new(FnCodec::new(
                    move |sink: &mut dyn Sink, value: &Self| {
                        $(encoders.$idx.encode_item(sink, &value.$idx)?;)+
                        Ok(())
                    },
                    move |source: &mut dyn Source| Ok(($(decoders.$idx.decode_item(source)?,)+)),
                ));
                Ok(codec)
            }
        }
    };
}

impl_codec_for_tuple!(A.0, B.1);
impl_codec_for_tuple!(A.0, B.1, C.2);
impl_codec_for_tuple!(A.0, B.1, C.2, D.3);
