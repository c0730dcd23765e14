//! Chunk and zone tagger.
//!
//! Partitions the bounding volume of an object set into oriented chunks,
//! assigns every object to one chunk and resolves overlapping zone volumes.
//!
//! File formats:
//! - objects.json: `[{ "id": uuid, "min": [x,y,z], "max": [x,y,z] }]`
//! - zones.json: `[{ "id": uuid, "min": [...], "max": [...], "properties": {..} }]`
//! - *.bin: concatenated little-endian records (124-byte chunks, 44-byte points)
//! - tags.json: `{ uuid: { category: { key: value } } }`

mod config;
mod input;
mod sink;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use zone_chunks::geometry::wireframe::tree_wireframe;
use zone_chunks::{
	build_tree, classify_by_tree, classify_linear, decode_records, disambiguate, encode_records, pack_points,
	pack_volumes, partition, root_volume, tag_chunks, tag_zones, BoxOverlapOracle, ChunkSession, Classification,
	ClassifyStrategy, CollisionOracle, OrientedBox, Record, TracingProgress,
};

use config::Config;
use sink::JsonTagSink;

/// Chunk partitioning and zone tagging for large object sets.
#[derive(Parser, Debug)]
#[command(name = "chunk_tagger")]
#[command(about = "Partitions object sets into oriented chunks and tags objects with chunk and zone ids")]
struct Args {
	/// Path to configuration TOML file (defaults apply when omitted).
	#[arg(short, long, global = true)]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Cut the model bounds into leaf chunks.
	Partition {
		objects: PathBuf,
		#[arg(short, long, default_value = "leaves.bin")]
		output: PathBuf,
	},
	/// Group leaf chunks into a tree and write every node in pre-order.
	BuildTree {
		leaves: PathBuf,
		#[arg(short, long, default_value = "tree.bin")]
		output: PathBuf,
	},
	/// Assign objects to leaf chunks and write chunk tags.
	Classify {
		objects: PathBuf,
		leaves: PathBuf,
		#[arg(short, long, default_value = ".")]
		out_dir: PathBuf,
	},
	/// Resolve the zone of every object and write zone tags.
	Zones {
		objects: PathBuf,
		zones: PathBuf,
		/// Recorded collision results; the built-in box overlap test is used
		/// when omitted.
		#[arg(long)]
		collisions: Option<PathBuf>,
		#[arg(short, long, default_value = "zones.json")]
		output: PathBuf,
	},
	/// Export the tree over leaf chunks as colored line segments.
	Wireframe {
		leaves: PathBuf,
		#[arg(short, long, default_value = "wireframe.json")]
		output: PathBuf,
	},
	/// Pack, partition, build the tree and classify in one session.
	Run {
		objects: PathBuf,
		#[arg(short, long, default_value = ".")]
		out_dir: PathBuf,
	},
}

fn main() -> Result<()> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.init();

	let args = Args::parse();
	let config = match &args.config {
		Some(path) => {
			info!(path = %path.display(), "loading config");
			Config::load(path)?
		}
		None => Config::default(),
	};
	let core = config.partition_config();
	core.validate().context("Invalid partition config")?;

	match args.command {
		Command::Partition { objects, output } => {
			let objects = input::load_objects(&objects)?;
			let root = root_volume(&objects, core.rotation_degrees).context("Failed to fit root volume")?;
			let leaves = partition(&root, core.cell_size).context("Partition failed")?;
			write_records(&output, &leaves)?;
			info!(leaves = leaves.len(), output = %output.display(), "partition written");
		}
		Command::BuildTree { leaves, output } => {
			let tree = build_tree(read_records(&leaves)?).context("Tree build failed")?;
			write_records(&output, &tree.boxes())?;
			info!(
				nodes = tree.node_count(),
				leaves = tree.leaf_count(),
				depth = tree.depth(),
				root = tree.id(),
				"tree written"
			);
		}
		Command::Classify { objects, leaves, out_dir } => {
			let objects = input::load_objects(&objects)?;
			let leaves: Vec<OrientedBox> = read_records(&leaves)?;
			let points = pack_points(&objects, &TracingProgress);

			let classification = match core.strategy {
				ClassifyStrategy::TreeDescent => {
					let tree = build_tree(leaves).context("Tree build failed")?;
					classify_by_tree(points, &tree, &TracingProgress)
				}
				ClassifyStrategy::LinearScan(policy) => {
					classify_linear(points, &leaves, policy, &TracingProgress)
				}
			};
			write_classification(&out_dir, &classification)?;
		}
		Command::Zones {
			objects,
			zones,
			collisions,
			output,
		} => {
			let objects = input::load_objects(&objects)?;
			let zones = input::load_zones(&zones, core.rotation_degrees)?;
			let points = pack_volumes(&objects, core.rotation_degrees);

			let oracle: Box<dyn CollisionOracle> = match &collisions {
				Some(path) => Box::new(input::load_oracle(path)?),
				None => Box::new(BoxOverlapOracle),
			};
			let assignment =
				disambiguate(&zones, &points, oracle.as_ref(), &TracingProgress).context("Zone detection failed")?;

			let mut sink = JsonTagSink::default();
			tag_zones(&mut sink, &assignment, &TracingProgress);
			sink.write(&output)?;
			info!(tagged = sink.len(), output = %output.display(), "zone tags written");
		}
		Command::Wireframe { leaves, output } => {
			let tree = build_tree(read_records(&leaves)?).context("Tree build failed")?;
			let segments: Vec<_> = tree_wireframe(&tree)
				.into_iter()
				.map(|(color, (a, b))| (color, a.to_array(), b.to_array()))
				.collect();
			let json = serde_json::to_string(&segments).context("Failed to serialize wireframe")?;
			std::fs::write(&output, json)
				.with_context(|| format!("Failed to write wireframe: {}", output.display()))?;
			info!(segments = segments.len(), output = %output.display(), "wireframe written");
		}
		Command::Run { objects, out_dir } => {
			let objects = input::load_objects(&objects)?;
			let mut session = ChunkSession::new(core);
			let classification = session.run(&objects, &TracingProgress).context("Run failed")?.clone();

			std::fs::create_dir_all(&out_dir)
				.with_context(|| format!("Failed to create output dir: {}", out_dir.display()))?;
			write_records(&out_dir.join("leaves.bin"), &session.state().leaves)?;
			if let Some(tree) = &session.state().tree {
				write_records(&out_dir.join("tree.bin"), &tree.boxes())?;
			}
			write_classification(&out_dir, &classification)?;

			let t = session.timings;
			info!(
				pack_us = t.pack_us,
				partition_us = t.partition_us,
				tree_us = t.tree_us,
				classify_us = t.classify_us,
				"session {} finished",
				session.id.raw()
			);
		}
	}

	Ok(())
}

fn read_records<R: Record>(path: &Path) -> Result<Vec<R>> {
	let bytes = std::fs::read(path).with_context(|| format!("Failed to read records: {}", path.display()))?;
	decode_records(&bytes).with_context(|| format!("Malformed {} file: {}", R::KIND, path.display()))
}

fn write_records<R: Record>(path: &Path, records: &[R]) -> Result<()> {
	std::fs::write(path, encode_records(records))
		.with_context(|| format!("Failed to write records: {}", path.display()))
}

fn write_classification(out_dir: &Path, classification: &Classification) -> Result<()> {
	std::fs::create_dir_all(out_dir)
		.with_context(|| format!("Failed to create output dir: {}", out_dir.display()))?;

	let points_path = out_dir.join("points.bin");
	std::fs::write(&points_path, classification.packed_points())
		.with_context(|| format!("Failed to write points: {}", points_path.display()))?;
	write_records(&out_dir.join("chunks.bin"), &classification.chunks)?;

	let mut sink = JsonTagSink::default();
	tag_chunks(&mut sink, &classification.points, &TracingProgress);
	sink.write(&out_dir.join("tags.json"))?;

	info!(
		points = classification.points.len(),
		chunks = classification.chunks.len(),
		out_dir = %out_dir.display(),
		"classification written"
	);
	Ok(())
}
