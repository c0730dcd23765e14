//! Fixed-width little-endian records for points and chunks.
//!
//! See [`crate::constants`] for the byte layouts. Encoding is total;
//! decoding only checks the buffer length, there is no version field.

use std::fmt;

use glam::DVec3;

use crate::constants::{
  BOX_RECORD_SIZE, LEGACY_POINT_RECORD_SIZE, OBB_RECORD_SIZE, OBJECT_ID_SIZE, POINT_RECORD_SIZE,
  UNASSIGNED_CHUNK,
};
use crate::error::{ChunkError, ChunkResult};
use crate::geometry::{AxisAlignedBox, OrientedBox};
use crate::types::{ChunkId, ObjectId};

/// The four record layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
  LegacyPoint,
  Point,
  AxisAlignedChunk,
  OrientedChunk,
}

impl RecordKind {
  /// Encoded size in bytes.
  pub const fn size(self) -> usize {
    match self {
      RecordKind::LegacyPoint => LEGACY_POINT_RECORD_SIZE,
      RecordKind::Point => POINT_RECORD_SIZE,
      RecordKind::AxisAlignedChunk => BOX_RECORD_SIZE,
      RecordKind::OrientedChunk => OBB_RECORD_SIZE,
    }
  }
}

impl fmt::Display for RecordKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      RecordKind::LegacyPoint => "legacy point",
      RecordKind::Point => "point",
      RecordKind::AxisAlignedChunk => "axis-aligned chunk",
      RecordKind::OrientedChunk => "oriented chunk",
    })
  }
}

// =============================================================================
// Record trait
// =============================================================================

/// A value with a fixed-width binary layout.
pub trait Record: Sized {
  /// Layout of this record.
  const KIND: RecordKind;

  /// Append exactly `KIND.size()` bytes.
  fn write_to(&self, out: &mut Vec<u8>);

  /// Parse from a buffer of exactly `KIND.size()` bytes.
  fn read_from(reader: &mut Reader<'_>) -> Self;

  /// Encode into a fresh buffer.
  fn encode(&self) -> Vec<u8> {
    let mut out = Vec::with_capacity(Self::KIND.size());
    self.write_to(&mut out);
    out
  }

  /// Decode one record, failing when `bytes` is not exactly one record long.
  fn decode(bytes: &[u8]) -> ChunkResult<Self> {
    let expected = Self::KIND.size();
    if bytes.len() != expected {
      return Err(ChunkError::RecordLength {
        kind: Self::KIND,
        expected,
        actual: bytes.len(),
      });
    }
    Ok(Self::read_from(&mut Reader::new(bytes)))
  }
}

/// Encode a slice of records back to back.
pub fn encode_records<R: Record>(records: &[R]) -> Vec<u8> {
  let mut out = Vec::with_capacity(records.len() * R::KIND.size());
  for record in records {
    record.write_to(&mut out);
  }
  out
}

/// Decode a buffer of concatenated records.
pub fn decode_records<R: Record>(bytes: &[u8]) -> ChunkResult<Vec<R>> {
  let record_size = R::KIND.size();
  if bytes.len() % record_size != 0 {
    return Err(ChunkError::StreamLength {
      kind: R::KIND,
      record_size,
      actual: bytes.len(),
    });
  }
  Ok(
    bytes
      .chunks_exact(record_size)
      .map(|chunk| R::read_from(&mut Reader::new(chunk)))
      .collect(),
  )
}

// =============================================================================
// Byte cursor
// =============================================================================

/// Forward-only cursor over a record whose length was already checked.
pub struct Reader<'a> {
  bytes: &'a [u8],
  pos: usize,
}

impl<'a> Reader<'a> {
  fn new(bytes: &'a [u8]) -> Self {
    Self { bytes, pos: 0 }
  }

  fn take<const N: usize>(&mut self) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(&self.bytes[self.pos..self.pos + N]);
    self.pos += N;
    buf
  }

  pub fn u8(&mut self) -> u8 {
    self.take::<1>()[0]
  }

  pub fn i32(&mut self) -> i32 {
    i32::from_le_bytes(self.take())
  }

  pub fn f64(&mut self) -> f64 {
    f64::from_le_bytes(self.take())
  }

  pub fn vec3(&mut self) -> DVec3 {
    DVec3::new(self.f64(), self.f64(), self.f64())
  }

  pub fn object_id(&mut self) -> ObjectId {
    ObjectId::from_bytes(self.take::<OBJECT_ID_SIZE>())
  }
}

fn write_vec3(out: &mut Vec<u8>, v: DVec3) {
  out.extend_from_slice(&v.x.to_le_bytes());
  out.extend_from_slice(&v.y.to_le_bytes());
  out.extend_from_slice(&v.z.to_le_bytes());
}

// =============================================================================
// Record types
// =============================================================================

/// One object reduced to its id, its center and the chunk it landed in.
///
/// `chunk_id` is the only field written after creation, by the classifier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackedPoint {
  pub id: ObjectId,
  pub position: DVec3,
  pub chunk_id: ChunkId,
}

impl PackedPoint {
  /// Unclassified point.
  pub fn new(id: ObjectId, position: DVec3) -> Self {
    Self {
      id,
      position,
      chunk_id: UNASSIGNED_CHUNK,
    }
  }
}

impl Record for PackedPoint {
  const KIND: RecordKind = RecordKind::Point;

  fn write_to(&self, out: &mut Vec<u8>) {
    out.extend_from_slice(self.id.as_bytes());
    write_vec3(out, self.position);
    out.extend_from_slice(&self.chunk_id.to_le_bytes());
  }

  fn read_from(reader: &mut Reader<'_>) -> Self {
    Self {
      id: reader.object_id(),
      position: reader.vec3(),
      chunk_id: reader.i32(),
    }
  }
}

/// 40-byte point layout without a chunk id. Decodes with chunk id 0.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegacyPoint(pub PackedPoint);

impl Record for LegacyPoint {
  const KIND: RecordKind = RecordKind::LegacyPoint;

  fn write_to(&self, out: &mut Vec<u8>) {
    out.extend_from_slice(self.0.id.as_bytes());
    write_vec3(out, self.0.position);
  }

  fn read_from(reader: &mut Reader<'_>) -> Self {
    Self(PackedPoint::new(reader.object_id(), reader.vec3()))
  }
}

impl From<LegacyPoint> for PackedPoint {
  fn from(legacy: LegacyPoint) -> Self {
    legacy.0
  }
}

/// Axis-aligned chunk with a one-byte id.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PackedBox {
  pub id: u8,
  pub bounds: AxisAlignedBox,
}

impl PackedBox {
  /// Inclusive containment.
  #[inline]
  pub fn contains(&self, point: DVec3) -> bool {
    self.bounds.contains_point(point)
  }
}

impl Record for PackedBox {
  const KIND: RecordKind = RecordKind::AxisAlignedChunk;

  fn write_to(&self, out: &mut Vec<u8>) {
    out.push(self.id);
    write_vec3(out, self.bounds.min);
    write_vec3(out, self.bounds.max);
  }

  fn read_from(reader: &mut Reader<'_>) -> Self {
    let id = reader.u8();
    let min = reader.vec3();
    let max = reader.vec3();
    Self {
      id,
      bounds: AxisAlignedBox { min, max },
    }
  }
}

impl Record for OrientedBox {
  const KIND: RecordKind = RecordKind::OrientedChunk;

  fn write_to(&self, out: &mut Vec<u8>) {
    out.extend_from_slice(&self.id.to_le_bytes());
    write_vec3(out, self.center);
    for axis in self.axes() {
      write_vec3(out, *axis);
    }
    write_vec3(out, self.extents);
  }

  fn read_from(reader: &mut Reader<'_>) -> Self {
    let id = reader.i32();
    let center = reader.vec3();
    let axes = [reader.vec3(), reader.vec3(), reader.vec3()];
    let extents = reader.vec3();
    OrientedBox::from_trusted_parts(id, center, axes, extents)
  }
}

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;
