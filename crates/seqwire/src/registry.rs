use std::{
    any::{Any, type_name},
    collections::HashMap,
    sync::{Arc, LazyLock, OnceLock},
};

use log::debug;
use parking_lot::{Mutex, RwLock};

use crate::{
    Codec, CodecOptions, Collection, CollectionDescriptor, CompiledCodec, Error, Result,
    SchemaKey, Sink, Source,
};

type AnyCodec = Arc<dyn Any + Send + Sync>;

/// Cache entry for one type pair.
///
/// `building` serializes construction so concurrent first requests wait for a
/// single build instead of racing; `codec` is read lock-free once set.
#[derive(Default)]
struct Slot {
    codec: OnceLock<AnyCodec>,
    building: Mutex<()>,
}

static GLOBAL: LazyLock<CodecRegistry> = LazyLock::new(CodecRegistry::default);

/// Process-lifetime cache of compiled collection codecs, keyed by type pair.
///
/// Every type pair is compiled at most once. Failed builds are not cached, so
/// a later request retries construction.
#[derive(Default)]
pub struct CodecRegistry {
    options: CodecOptions,
    slots: RwLock<HashMap<SchemaKey, Arc<Slot>>>,
}

impl CodecRegistry {
    pub fn new(options: CodecOptions) -> Self {
        Self {
            options,
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Registry with default options shared by the whole process.
    ///
    /// Collections nested inside other values resolve their codec here.
    pub fn global() -> &'static CodecRegistry {
        &GLOBAL
    }

    #[inline]
    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Returns the compiled codec for `C`, building it on first use.
    pub fn get<C>(&self) -> Result<Arc<CompiledCodec<C>>>
    where
        C: Collection,
        C::Item: Codec,
    {
        let slot = self.slot(SchemaKey::of::<C>());

        if let Some(codec) = slot.codec.get() {
            return Self::downcast(codec.clone());
        }

        let _building = slot.building.lock();
        if let Some(codec) = slot.codec.get() {
            return Self::downcast(codec.clone());
        }

        let item = <C::Item as Codec>::item_codec(self)?;
        let codec = Arc::new(CompiledCodec::<C>::build(item, self.options)?);
        let _ = slot.codec.set(codec.clone() as AnyCodec);
        Ok(codec)
    }

    pub fn descriptor<C>(&self) -> Result<CollectionDescriptor>
    where
        C: Collection,
        C::Item: Codec,
    {
        Ok(*self.get::<C>()?.descriptor())
    }

    pub fn encode<C>(&self, sink: &mut dyn Sink, collection: &C) -> Result<()>
    where
        C: Collection,
        C::Item: Codec,
    {
        self.get::<C>()?.encode(sink, collection)
    }

    pub fn decode<C>(&self, source: &mut dyn Source) -> Result<C>
    where
        C: Collection,
        C::Item: Codec,
    {
        self.get::<C>()?.decode(source)
    }

    pub fn to_vec<C>(&self, collection: &C) -> Result<Vec<u8>>
    where
        C: Collection,
        C::Item: Codec,
    {
        self.get::<C>()?.encode_to_vec(collection)
    }

    pub fn from_slice<C>(&self, bytes: &[u8]) -> Result<C>
    where
        C: Collection,
        C::Item: Codec,
    {
        self.get::<C>()?.decode_from_slice(bytes)
    }

    /// Number of type pairs with a compiled codec.
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .values()
            .filter(|slot| slot.codec.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: SchemaKey) -> Arc<Slot> {
        if let Some(slot) = self.slots.read().get(&key) {
            return slot.clone();
        }
        let mut slots = self.slots.write();
        slots
            .entry(key)
            .or_insert_with(|| {
                debug!("{key}: new registry slot");
                Arc::new(Slot::default())
            })
            .clone()
    }

    fn downcast<C: Collection>(codec: AnyCodec) -> Result<Arc<CompiledCodec<C>>> {
        codec.downcast::<CompiledCodec<C>>().map_err(|_| {
            Error::InvariantViolation(format!(
                "registry slot for {} holds a different codec type",
                type_name::<C>()
            ))
        })
    }
}
