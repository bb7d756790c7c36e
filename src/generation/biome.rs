//! # Biome Module
//!
//! Declarative generation parameters: ground height, terrain shape, the ore
//! lode table, and tree gating. A profile is plain data, read-only once
//! loaded; terrain generation consumes it without ever mutating it.

use serde::Deserialize;

use crate::error::WorldError;
use crate::voxels::block::{block_id_by_name, BlockId};

/// An ore-placement rule: a height band plus 3D-noise parameters that decide,
/// per stone voxel, whether the lode's block replaces it.
#[derive(Clone, Debug, Deserialize)]
pub struct LodeRule {
    /// Display name of the lode, e.g. `"coal seam"`.
    pub name: String,
    /// The block id written on a match.
    pub block_id: BlockId,
    /// Lowest height (exclusive) at which the lode occurs.
    pub min_height: i32,
    /// Highest height (exclusive) at which the lode occurs.
    pub max_height: i32,
    /// Noise frequency of the lode shape.
    pub scale: f32,
    /// Noise acceptance threshold; higher is rarer.
    pub threshold: f32,
    /// Noise plane offset keeping this lode independent of others.
    pub noise_offset: f32,
}

/// Generation parameters for one biome.
///
/// The engine consumes a single profile; the authoring format is external,
/// but profiles also deserialize from JSON for data-driven setups.
#[derive(Clone, Debug, Deserialize)]
pub struct BiomeProfile {
    /// Biome display name.
    pub name: String,
    /// Terrain height floor: the lowest surface the height map can produce.
    pub solid_ground_height: i32,
    /// Maximum terrain amplitude above the floor.
    pub terrain_height: i32,
    /// Noise frequency of the height map.
    pub terrain_scale: f32,
    /// Noise frequency of the tree-zone gate.
    pub tree_zone_scale: f32,
    /// Tree-zone gate threshold in `[0, 1]`; areas below it grow no trees.
    pub tree_zone_threshold: f32,
    /// Noise frequency of the per-column tree-placement gate.
    pub tree_placement_scale: f32,
    /// Tree-placement gate threshold in `[0, 1]`; higher means sparser trees.
    pub tree_placement_threshold: f32,
    /// Smallest trunk height, inclusive.
    pub min_tree_size: i32,
    /// Largest trunk height the size noise can reach.
    pub max_tree_size: i32,
    /// Ore lodes, tested in declared order; the first match wins per voxel.
    pub lodes: Vec<LodeRule>,
}

impl BiomeProfile {
    /// The compiled-in default biome: gentle grassland with coal and iron
    /// lodes and moderate tree cover.
    pub fn grassland() -> Self {
        // Unwraps here resolve names against the compiled-in registry and
        // cannot fail for canonical names.
        let coal = block_id_by_name("coal_ore").unwrap();
        let iron = block_id_by_name("iron_ore").unwrap();
        let dirt = block_id_by_name("dirt").unwrap();
        BiomeProfile {
            name: "grassland".to_string(),
            solid_ground_height: 42,
            terrain_height: 42,
            terrain_scale: 0.25,
            tree_zone_scale: 1.3,
            tree_zone_threshold: 0.6,
            tree_placement_scale: 15.0,
            tree_placement_threshold: 0.8,
            min_tree_size: 4,
            max_tree_size: 7,
            lodes: vec![
                LodeRule {
                    name: "dirt pocket".to_string(),
                    block_id: dirt,
                    min_height: 1,
                    max_height: 100,
                    scale: 0.1,
                    threshold: 0.55,
                    noise_offset: 500.0,
                },
                LodeRule {
                    name: "coal seam".to_string(),
                    block_id: coal,
                    min_height: 5,
                    max_height: 80,
                    scale: 0.12,
                    threshold: 0.56,
                    noise_offset: 0.0,
                },
                LodeRule {
                    name: "iron seam".to_string(),
                    block_id: iron,
                    min_height: 5,
                    max_height: 40,
                    scale: 0.14,
                    threshold: 0.6,
                    noise_offset: 345.0,
                },
            ],
        }
    }

    /// Loads a profile from a JSON document.
    ///
    /// # Errors
    /// [`WorldError::Config`] if the document does not parse.
    pub fn from_json(text: &str) -> Result<Self, WorldError> {
        Ok(serde_json::from_str(text)?)
    }
}
