use std::{io, result, string::FromUtf8Error};

use thiserror::Error;

pub type Result<T, E = Error> = result::Result<T, E>;

/// Error types for seqwire operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    IO(io::Error),

    // Schema errors
    #[error("No insertion operation (append, enqueue or push) found on {collection}")]
    NoAddMethod { collection: &'static str },

    #[error("No constructor (default or with_capacity) found on {collection}")]
    NoConstructor { collection: &'static str },

    #[error("max_chunk must be in 1..=u32::MAX, got {max_chunk}")]
    InvalidMaxChunk { max_chunk: usize },

    #[error("Neither bulk append nor an insertion operation found on {collection}")]
    NoInsertion { collection: &'static str },

    // Protocol errors
    #[error("Chunk header {len} exceeds agreed maximum {max}")]
    ChunkTooLong { len: u32, max: u32 },

    #[error("Source exhausted before the terminator chunk of {collection}")]
    MissingTerminator { collection: &'static str },

    #[error("Unexpected end of input")]
    UnexpectedEof,

    // Data errors
    #[error("Collection of {len} elements does not fit a chunk header")]
    CountOverflow { len: usize },

    #[error(transparent)]
    InvalidUtf8(#[from] FromUtf8Error),

    #[error("Invalid bool byte: {0}")]
    InvalidBool(u8),

    #[error("Invalid char scalar: {0:#x}")]
    InvalidChar(u32),

    #[error("Invalid option tag: {0}")]
    InvalidOptionTag(u8),

    #[error("Integer {0} does not fit the platform's pointer width")]
    IntegerOutOfRange(i128),

    // Internal invariant errors
    #[error("Internal invariant violated: {0}")]
    InvariantViolation(String),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Codec construction failed; raised once, at build time.
    Schema,
    /// The byte stream is not well formed.
    Protocol,
    /// A value decoded from well-framed bytes is invalid for its type.
    Data,
    Io,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoAddMethod { .. }
            | Self::NoConstructor { .. }
            | Self::NoInsertion { .. }
            | Self::InvalidMaxChunk { .. } => ErrorKind::Schema,
            Self::ChunkTooLong { .. } | Self::MissingTerminator { .. } | Self::UnexpectedEof => {
                ErrorKind::Protocol
            }
            Self::CountOverflow { .. }
            | Self::InvalidUtf8(_)
            | Self::InvalidBool(_)
            | Self::InvalidChar(_)
            | Self::InvalidOptionTag(_)
            | Self::IntegerOutOfRange(_) => ErrorKind::Data,
            Self::IO(_) => ErrorKind::Io,
            Self::InvariantViolation(_) => ErrorKind::Internal,
        }
    }

    #[inline]
    pub fn is_schema(&self) -> bool {
        self.kind() == ErrorKind::Schema
    }

    #[inline]
    pub fn is_protocol(&self) -> bool {
        self.kind() == ErrorKind::Protocol
    }
}

impl From<io::Error> for Error {
    fn from(value: io::Error) -> Self {
        if value.kind() == io::ErrorKind::UnexpectedEof {
            Self::UnexpectedEof
        } else {
            Self::IO(value)
        }
    }
}
