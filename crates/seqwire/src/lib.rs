#![doc = include_str!("../README.md")]

#[cfg(feature = "derive")]
pub use seqwire_derive::Codec;

mod add_method;
mod capability;
mod codec;
mod collection;
mod compiled;
mod error;
mod options;
mod registry;
mod strategy;
mod wire;

pub use add_method::*;
pub use capability::*;
pub use codec::*;
pub use collection::*;
pub use compiled::*;
pub use error::*;
pub use options::*;
pub use registry::*;
pub use wire::*;
