use proptest::prelude::*;

use super::*;

fn sample_point() -> PackedPoint {
  PackedPoint {
    id: ObjectId::from_u128(0xdead_beef),
    position: DVec3::new(1.5, -2.25, 1e9),
    chunk_id: 42,
  }
}

#[test]
fn test_point_layout() {
  let bytes = sample_point().encode();
  assert_eq!(bytes.len(), 44);
  assert_eq!(&bytes[0..16], ObjectId::from_u128(0xdead_beef).as_bytes());
  assert_eq!(&bytes[16..24], &1.5f64.to_le_bytes());
  assert_eq!(&bytes[40..44], &42i32.to_le_bytes());
}

#[test]
fn test_legacy_point_drops_chunk_id() {
  let bytes = LegacyPoint(sample_point()).encode();
  assert_eq!(bytes.len(), 40);

  let decoded: PackedPoint = LegacyPoint::decode(&bytes).unwrap().into();
  assert_eq!(decoded.id, sample_point().id);
  assert_eq!(decoded.position, sample_point().position);
  assert_eq!(decoded.chunk_id, 0);
}

#[test]
fn test_box_layout() {
  let packed = PackedBox {
    id: 9,
    bounds: AxisAlignedBox::new(DVec3::new(-1.0, -2.0, -3.0), DVec3::new(1.0, 2.0, 3.0)),
  };
  let bytes = packed.encode();
  assert_eq!(bytes.len(), 49);
  assert_eq!(bytes[0], 9);
  assert_eq!(&bytes[1..9], &(-1.0f64).to_le_bytes());
  assert_eq!(&bytes[41..49], &3.0f64.to_le_bytes());
  assert_eq!(PackedBox::decode(&bytes).unwrap(), packed);
}

#[test]
fn test_obb_layout() {
  let obb = OrientedBox::axis_aligned(-3, DVec3::new(4.0, 5.0, 6.0), DVec3::new(0.5, 1.0, 2.0));
  let bytes = obb.encode();
  assert_eq!(bytes.len(), 124);
  assert_eq!(&bytes[0..4], &(-3i32).to_le_bytes());
  assert_eq!(&bytes[4..12], &4.0f64.to_le_bytes());
  // axis X = (1, 0, 0)
  assert_eq!(&bytes[28..36], &1.0f64.to_le_bytes());
  assert_eq!(&bytes[116..124], &2.0f64.to_le_bytes());
  assert_eq!(OrientedBox::decode(&bytes).unwrap(), obb);
}

#[test]
fn test_decode_rejects_wrong_length() {
  let bytes = sample_point().encode();
  assert_eq!(
    PackedPoint::decode(&bytes[..43]),
    Err(ChunkError::RecordLength {
      kind: RecordKind::Point,
      expected: 44,
      actual: 43,
    })
  );

  let mut long = bytes.clone();
  long.push(0);
  assert!(PackedPoint::decode(&long).is_err());
  assert!(LegacyPoint::decode(&bytes).is_err());
  assert!(OrientedBox::decode(&[]).is_err());
  assert!(PackedBox::decode(&[0; 48]).is_err());
}

#[test]
fn test_stream_roundtrip_and_length_check() {
  let points = vec![
    sample_point(),
    PackedPoint::new(ObjectId::from_u128(2), DVec3::ONE),
  ];
  let bytes = encode_records(&points);
  assert_eq!(bytes.len(), 88);
  assert_eq!(decode_records::<PackedPoint>(&bytes).unwrap(), points);

  assert!(decode_records::<PackedPoint>(&[]).unwrap().is_empty());
  assert!(matches!(
    decode_records::<PackedPoint>(&bytes[..87]),
    Err(ChunkError::StreamLength { record_size: 44, actual: 87, .. })
  ));
}

fn finite() -> impl Strategy<Value = f64> {
  -1e12f64..1e12
}

fn vec3() -> impl Strategy<Value = DVec3> {
  (finite(), finite(), finite()).prop_map(|(x, y, z)| DVec3::new(x, y, z))
}

proptest! {
  #[test]
  fn prop_point_roundtrip(id in any::<u128>(), position in vec3(), chunk_id in any::<i32>()) {
    let point = PackedPoint { id: ObjectId::from_u128(id), position, chunk_id };
    prop_assert_eq!(PackedPoint::decode(&point.encode()).unwrap(), point);
  }

  #[test]
  fn prop_legacy_point_roundtrip(id in any::<u128>(), position in vec3(), chunk_id in any::<i32>()) {
    let point = PackedPoint { id: ObjectId::from_u128(id), position, chunk_id };
    let bytes = LegacyPoint(point).encode();
    prop_assert_eq!(bytes.len(), 40);
    let decoded = PackedPoint::from(LegacyPoint::decode(&bytes).unwrap());
    prop_assert_eq!(decoded, PackedPoint { chunk_id: 0, ..point });
  }

  #[test]
  fn prop_box_roundtrip(id in any::<u8>(), min in vec3(), max in vec3()) {
    let packed = PackedBox { id, bounds: AxisAlignedBox { min, max } };
    prop_assert_eq!(PackedBox::decode(&packed.encode()).unwrap(), packed);
  }

  #[test]
  fn prop_obb_roundtrip(
    id in any::<i32>(),
    center in vec3(),
    extents in (0.0f64..1e6, 0.0f64..1e6, 0.0f64..1e6),
    angle in -360.0f64..360.0,
  ) {
    let bounds = AxisAlignedBox::from_center_half_extents(
      center,
      DVec3::new(extents.0, extents.1, extents.2),
    );
    let obb = OrientedBox::from_aabb_rotated_z(&bounds, angle, id);
    prop_assert_eq!(OrientedBox::decode(&obb.encode()).unwrap(), obb);
  }

  #[test]
  fn prop_decode_fails_off_size(len in 0usize..256) {
    prop_assume!(len != 124);
    let bytes = vec![0u8; len];
    prop_assert!(OrientedBox::decode(&bytes).is_err());
  }
}
