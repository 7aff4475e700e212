use std::{any::type_name, fmt};

use crate::{AddFn, Collection, Error, Result, Surface};

/// Single-element insertion operation picked for a collection type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddMethod {
    Append,
    Enqueue,
    Push,
}

impl AddMethod {
    /// Probe order. The first operation a type declares wins.
    pub const PRIORITY: [AddMethod; 3] = [Self::Append, Self::Enqueue, Self::Push];

    fn lookup<C: Collection>(self, surface: &Surface<C>) -> Option<AddFn<C>> {
        match self {
            Self::Append => surface.append,
            Self::Enqueue => surface.enqueue,
            Self::Push => surface.push,
        }
    }

    /// Returns the highest-priority insertion operation `surface` declares.
    pub fn resolve<C: Collection>(surface: &Surface<C>) -> Option<(Self, AddFn<C>)> {
        Self::PRIORITY
            .into_iter()
            .find_map(|method| method.lookup(surface).map(|add| (method, add)))
    }

    /// Like [`AddMethod::resolve`], failing with a schema error when nothing matches.
    pub fn require<C: Collection>(surface: &Surface<C>) -> Result<(Self, AddFn<C>)> {
        Self::resolve(surface).ok_or(Error::NoAddMethod {
            collection: type_name::<C>(),
        })
    }
}

impl fmt::Display for AddMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Append => "append",
            Self::Enqueue => "enqueue",
            Self::Push => "push",
        })
    }
}
