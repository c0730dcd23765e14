//! Core value types shared across the pipeline.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ChunkError, ChunkResult};

/// Key/value metadata attached to zones and written back through a
/// [`PropertySink`](crate::source::PropertySink).
pub type Properties = BTreeMap<String, String>;

/// Chunk identifier as stored in the 44-byte point and 124-byte chunk
/// records.
pub type ChunkId = i32;

/// Opaque 16-byte identifier of one source object (typically a UUID).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ObjectId([u8; 16]);

impl ObjectId {
  /// The all-zero identifier. Objects carrying it are never packed.
  pub const NIL: Self = Self([0; 16]);

  /// Wrap raw identifier bytes.
  pub const fn from_bytes(bytes: [u8; 16]) -> Self {
    Self(bytes)
  }

  /// Build an identifier from a number (big-endian in the low bytes).
  ///
  /// Handy for tests and synthetic data sets.
  pub fn from_u128(value: u128) -> Self {
    Self(value.to_be_bytes())
  }

  /// Raw identifier bytes.
  #[inline]
  pub fn as_bytes(&self) -> &[u8; 16] {
    &self.0
  }

  /// True for [`ObjectId::NIL`].
  #[inline]
  pub fn is_nil(&self) -> bool {
    self.0 == [0; 16]
  }
}

impl From<[u8; 16]> for ObjectId {
  fn from(bytes: [u8; 16]) -> Self {
    Self(bytes)
  }
}

/// Hyphenated 8-4-4-4-12 lowercase hex.
impl fmt::Display for ObjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, byte) in self.0.iter().enumerate() {
      if matches!(i, 4 | 6 | 8 | 10) {
        f.write_str("-")?;
      }
      write!(f, "{byte:02x}")?;
    }
    Ok(())
  }
}

impl fmt::Debug for ObjectId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ObjectId({self})")
  }
}

/// Accepts 32 hex digits, with or without hyphens.
impl FromStr for ObjectId {
  type Err = ChunkError;

  fn from_str(s: &str) -> ChunkResult<Self> {
    let invalid = || ChunkError::InvalidObjectId(s.to_owned());
    let digits: Vec<u8> = s.bytes().filter(|b| *b != b'-').collect();
    if digits.len() != 32 {
      return Err(invalid());
    }

    let mut bytes = [0u8; 16];
    for (slot, pair) in bytes.iter_mut().zip(digits.chunks_exact(2)) {
      let hi = (pair[0] as char).to_digit(16).ok_or_else(invalid)?;
      let lo = (pair[1] as char).to_digit(16).ok_or_else(invalid)?;
      *slot = (hi * 16 + lo) as u8;
    }
    Ok(Self(bytes))
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
