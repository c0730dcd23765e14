//! Configuration parsing for chunk tagging runs.

use anyhow::{Context, Result};
use glam::DVec3;
use serde::Deserialize;
use std::path::Path;
use zone_chunks::{BoundaryPolicy, ClassifyStrategy, PartitionConfig};

/// Root configuration for one tagging run.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// Leaf chunk size along each root axis, in model units.
	#[serde(default = "default_cell_size")]
	pub cell_size: [f64; 3],
	/// Plan rotation of the model grid in degrees.
	#[serde(default)]
	pub rotation_degrees: f64,
	/// Point location strategy.
	#[serde(default)]
	pub strategy: StrategyConfig,
	/// Shared-face resolution for the linear scan.
	#[serde(default)]
	pub boundary_policy: PolicyConfig,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyConfig {
	#[default]
	Tree,
	Linear,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyConfig {
	#[default]
	FirstMatch,
	NearestCenter,
}

fn default_cell_size() -> [f64; 3] {
	[20.0; 3]
}

impl Default for Config {
	fn default() -> Self {
		Self {
			cell_size: default_cell_size(),
			rotation_degrees: 0.0,
			strategy: StrategyConfig::default(),
			boundary_policy: PolicyConfig::default(),
		}
	}
}

impl Config {
	/// Load configuration from a TOML file.
	pub fn load(path: &Path) -> Result<Self> {
		let content = std::fs::read_to_string(path)
			.with_context(|| format!("Failed to read config file: {}", path.display()))?;
		Self::parse(&content)
	}

	/// Parse and validate TOML text.
	pub fn parse(content: &str) -> Result<Self> {
		let config: Config = toml::from_str(content).with_context(|| "Failed to parse config TOML")?;

		if config.cell_size.iter().any(|s| !s.is_finite() || *s <= 0.0) {
			anyhow::bail!("cell_size must be positive on every axis, got {:?}", config.cell_size);
		}
		if !config.rotation_degrees.is_finite() {
			anyhow::bail!("rotation_degrees must be finite");
		}

		Ok(config)
	}

	/// Core run parameters.
	pub fn partition_config(&self) -> PartitionConfig {
		let policy = match self.boundary_policy {
			PolicyConfig::FirstMatch => BoundaryPolicy::FirstMatch,
			PolicyConfig::NearestCenter => BoundaryPolicy::NearestCenter,
		};
		PartitionConfig {
			cell_size: DVec3::from_array(self.cell_size),
			rotation_degrees: self.rotation_degrees,
			strategy: match self.strategy {
				StrategyConfig::Tree => ClassifyStrategy::TreeDescent,
				StrategyConfig::Linear => ClassifyStrategy::LinearScan(policy),
			},
		}
	}
}
