//! JSON input files: objects, zones and recorded collision results.

use anyhow::{Context, Result};
use glam::DVec3;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use zone_chunks::{
	AxisAlignedBox, BoxedItem, Collision, ObjectId, OrientedBox, Properties, RecordedOracle, SourceObject,
	Zone, ZONE_TEST_NAME,
};

/// One object: id plus an optional world box.
#[derive(Debug, Deserialize)]
pub struct ObjectEntry {
	pub id: String,
	pub min: Option<[f64; 3]>,
	pub max: Option<[f64; 3]>,
}

/// One zone volume with the metadata copied onto its points.
#[derive(Debug, Deserialize)]
pub struct ZoneEntry {
	pub id: String,
	pub min: [f64; 3],
	pub max: [f64; 3],
	#[serde(default)]
	pub properties: Properties,
}

/// Collision results computed by an external engine.
#[derive(Debug, Deserialize)]
pub struct CollisionFile {
	#[serde(default = "default_test_name")]
	pub test_name: String,
	pub collisions: Vec<CollisionEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CollisionEntry {
	pub zone: String,
	pub point: String,
	pub distance: f64,
	pub volume: f64,
}

fn default_test_name() -> String {
	ZONE_TEST_NAME.to_owned()
}

fn parse_id(raw: &str) -> Result<ObjectId> {
	raw.parse().with_context(|| format!("Invalid object id: {raw}"))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
	let content = std::fs::read_to_string(path)
		.with_context(|| format!("Failed to read file: {}", path.display()))?;
	serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON: {}", path.display()))
}

impl ObjectEntry {
	pub fn to_source(&self) -> Result<SourceObject> {
		let bounds = match (self.min, self.max) {
			(Some(min), Some(max)) => Some(AxisAlignedBox::normalized(DVec3::from_array(min), DVec3::from_array(max))),
			(None, None) => None,
			_ => anyhow::bail!("Object {} needs both min and max, or neither", self.id),
		};
		Ok(SourceObject {
			id: parse_id(&self.id)?,
			bounds,
		})
	}
}

impl ZoneEntry {
	/// Zone volume rotated like the root volume.
	pub fn to_zone(&self, index: usize, rotation_degrees: f64) -> Result<Zone> {
		let bounds = AxisAlignedBox::normalized(DVec3::from_array(self.min), DVec3::from_array(self.max));
		Ok(Zone {
			item: BoxedItem {
				id: parse_id(&self.id)?,
				bounds: OrientedBox::from_aabb_rotated_z(&bounds, rotation_degrees, index as i32),
			},
			properties: self.properties.clone(),
		})
	}
}

impl CollisionFile {
	pub fn into_oracle(self) -> Result<RecordedOracle> {
		let collisions = self
			.collisions
			.iter()
			.map(|c| {
				Ok(Collision {
					zone: parse_id(&c.zone)?,
					point: parse_id(&c.point)?,
					distance: c.distance,
					volume: c.volume,
				})
			})
			.collect::<Result<Vec<_>>>()?;
		Ok(RecordedOracle {
			test_name: self.test_name,
			collisions,
		})
	}
}

pub fn load_objects(path: &Path) -> Result<Vec<SourceObject>> {
	let entries: Vec<ObjectEntry> = read_json(path)?;
	entries.iter().map(ObjectEntry::to_source).collect()
}

pub fn load_zones(path: &Path, rotation_degrees: f64) -> Result<Vec<Zone>> {
	let entries: Vec<ZoneEntry> = read_json(path)?;
	entries
		.iter()
		.enumerate()
		.map(|(index, entry)| entry.to_zone(index, rotation_degrees))
		.collect()
}

pub fn load_oracle(path: &Path) -> Result<RecordedOracle> {
	read_json::<CollisionFile>(path)?.into_oracle()
}
