use std::{fmt, sync::Arc};

use log::debug;

use crate::{
    AddMethod, CodecOptions, Collection, CollectionDescriptor, ItemCodec, Result, SchemaKey,
    Sink, Source,
    strategy::{DecodeStrategy, EncodeStrategy},
};

/// Encoder and decoder for one (collection type, element type) pair.
///
/// Classification, strategy selection and add-method resolution all happen in
/// [`CompiledCodec::build`]. Afterwards the codec is immutable and can be shared
/// across threads; `encode` and `decode` only touch call-local state.
pub struct CompiledCodec<C: Collection> {
    descriptor: CollectionDescriptor,
    add_method: Option<AddMethod>,
    encoder: EncodeStrategy<C>,
    decoder: DecodeStrategy<C>,
    item: Arc<dyn ItemCodec<C::Item>>,
    max_chunk_len: u32,
}

impl<C: Collection> CompiledCodec<C> {
    /// Compiles a codec around `item` without going through a registry.
    pub fn build(item: Arc<dyn ItemCodec<C::Item>>, options: CodecOptions) -> Result<Self> {
        options
            .validate()
            .inspect_err(|e| debug!("{}: codec construction failed: {e}", SchemaKey::of::<C>()))?;

        let surface = C::surface();
        let descriptor = CollectionDescriptor::of(&surface);
        let capability = descriptor.capability();

        let encoder = EncodeStrategy::select(capability, &surface, options.max_chunk());
        let (decoder, add_method) =
            DecodeStrategy::select(capability, &surface, options.capacity_hint_limit())
                .inspect_err(|e| debug!("{}: codec construction failed: {e}", descriptor.key()))?;

        debug!(
            "{}: compiled as {:?} (add method: {})",
            descriptor.key(),
            capability,
            add_method.map_or("none".to_string(), |m| m.to_string())
        );

        Ok(Self {
            descriptor,
            add_method,
            encoder,
            decoder,
            item,
            max_chunk_len: options.max_chunk_len(),
        })
    }

    #[inline]
    pub fn descriptor(&self) -> &CollectionDescriptor {
        &self.descriptor
    }

    /// Insertion operation the decoder uses, when it needs one.
    #[inline]
    pub fn add_method(&self) -> Option<AddMethod> {
        self.add_method
    }

    #[inline]
    pub fn encode(&self, sink: &mut dyn Sink, collection: &C) -> Result<()> {
        self.encoder.encode(sink, collection, self.item.as_ref())
    }

    /// Decodes one collection value.
    ///
    /// On error the partially decoded collection is dropped.
    #[inline]
    pub fn decode(&self, source: &mut dyn Source) -> Result<C> {
        self.decoder
            .decode(source, self.item.as_ref(), self.max_chunk_len)
    }

    pub fn encode_to_vec(&self, collection: &C) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode(&mut buf, collection)?;
        Ok(buf)
    }

    pub fn decode_from_slice(&self, mut bytes: &[u8]) -> Result<C> {
        self.decode(&mut bytes)
    }
}

impl<C: Collection> ItemCodec<C> for CompiledCodec<C> {
    #[inline]
    fn encode_item(&self, sink: &mut dyn Sink, value: &C) -> Result<()> {
        self.encode(sink, value)
    }

    #[inline]
    fn decode_item(&self, source: &mut dyn Source) -> Result<C> {
        self.decode(source)
    }
}

impl<C: Collection> fmt::Debug for CompiledCodec<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledCodec")
            .field("descriptor", &self.descriptor)
            .field("add_method", &self.add_method)
            .field("max_chunk_len", &self.max_chunk_len)
            .finish_non_exhaustive()
    }
}
