//! Property sink that collects tags for a JSON report.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use zone_chunks::{ObjectId, Properties, PropertySink};

/// Object id → category → properties.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct JsonTagSink {
	tags: BTreeMap<String, BTreeMap<String, Properties>>,
}

impl JsonTagSink {
	pub fn len(&self) -> usize {
		self.tags.len()
	}

	pub fn get(&self, object: ObjectId, category: &str) -> Option<&Properties> {
		self.tags.get(&object.to_string())?.get(category)
	}

	/// Write the collected tags as pretty-printed JSON.
	pub fn write(&self, path: &Path) -> Result<()> {
		let json = serde_json::to_string_pretty(self).context("Failed to serialize tags")?;
		std::fs::write(path, json).with_context(|| format!("Failed to write tags: {}", path.display()))
	}
}

impl PropertySink for JsonTagSink {
	fn attach(&mut self, object: ObjectId, category: &str, properties: &Properties) {
		self.tags
			.entry(object.to_string())
			.or_default()
			.entry(category.to_owned())
			.or_default()
			.extend(properties.iter().map(|(k, v)| (k.clone(), v.clone())));
	}
}
