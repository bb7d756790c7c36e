//! # Terrain Generator
//!
//! The per-voxel generation function. Given a world position it decides the
//! block id through a fixed sequence of short-circuiting passes: world
//! bounds, bedrock floor, height-map bands, ore lodes, and finally tree
//! gating. The id computation is pure; tree placement is returned as a
//! deferred edit batch rather than applied, so generation stays
//! side-effect-local to the voxel being computed.

use cgmath::Point3;

use crate::generation::biome::BiomeProfile;
use crate::generation::noise_field::NoiseField;
use crate::generation::structures;
use crate::voxels::block::{BlockId, BlockKind};
use crate::voxels::chunk::VoxelEdit;
use crate::voxels::is_voxel_in_world;

/// Noise plane offset of the tree-placement gate (the zone gate uses 0).
const TREE_PLACEMENT_NOISE_OFFSET: f32 = 100.0;

/// Deterministic terrain function for one biome and seed.
pub struct TerrainGenerator {
    noise: NoiseField,
    biome: BiomeProfile,
}

impl TerrainGenerator {
    /// Creates a generator for the given seed and biome.
    pub fn new(seed: u32, biome: BiomeProfile) -> Self {
        TerrainGenerator {
            noise: NoiseField::new(seed),
            biome,
        }
    }

    /// The biome this generator was built with.
    pub fn biome(&self) -> &BiomeProfile {
        &self.biome
    }

    /// The noise field this generator samples from.
    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    /// Height-map surface height at a world (x, z) column.
    pub fn terrain_height(&self, x: f32, z: f32) -> i32 {
        let sample = self
            .noise
            .sample_2d(x, z, 0.0, self.biome.terrain_scale);
        (self.biome.solid_ground_height as f32 + self.biome.terrain_height as f32 * sample).floor()
            as i32
    }

    /// Computes the block id at a world position.
    ///
    /// A pure function of (position, seed, biome): repeated calls with
    /// identical inputs yield identical ids. Decision order, each stage
    /// short-circuiting the ones below:
    ///
    /// 1. Outside world bounds: air.
    /// 2. `y == 0`: bedrock, the unconditional floor.
    /// 3. Height bands: stone below `height - 4`, dirt up to the surface,
    ///    grass exactly at the surface, air above.
    /// 4. Ore pass, only where the band produced stone: lodes in declared
    ///    order, first match wins.
    pub fn compute_voxel(&self, position: Point3<f32>) -> BlockId {
        let y = position.y.floor() as i32;

        // Immutable pass
        if !is_voxel_in_world(position) {
            return BlockKind::Air as BlockId;
        }
        if y == 0 {
            return BlockKind::Bedrock as BlockId;
        }

        // Basic terrain pass
        let height = self.terrain_height(position.x, position.z);
        let mut id = if y < height - 4 {
            BlockKind::Stone as BlockId
        } else if y < height {
            BlockKind::Dirt as BlockId
        } else if y == height {
            BlockKind::Grass as BlockId
        } else {
            BlockKind::Air as BlockId
        };

        // Lode pass
        if id == BlockKind::Stone as BlockId {
            for lode in &self.biome.lodes {
                if lode.min_height < y
                    && y < lode.max_height
                    && self
                        .noise
                        .sample_3d(position, lode.noise_offset, lode.scale, lode.threshold)
                {
                    id = lode.block_id;
                    break;
                }
            }
        }

        id
    }

    /// Computes the block id and, at tree sites, the deferred structure batch.
    ///
    /// Tree gating only fires exactly at the surface, and only where both the
    /// zone gate and the placement gate exceed their thresholds. The returned
    /// batch is never applied here; the caller queues it for deferred
    /// application so canopies may cross into chunks the generator does not
    /// own (or that do not exist yet).
    pub fn generate(&self, position: Point3<f32>) -> (BlockId, Option<Vec<VoxelEdit>>) {
        let id = self.compute_voxel(position);

        let y = position.y.floor() as i32;
        if !is_voxel_in_world(position) || y != self.terrain_height(position.x, position.z) {
            return (id, None);
        }

        let zone = self.noise.sample_2d(
            position.x,
            position.z,
            0.0,
            self.biome.tree_zone_scale,
        );
        if zone <= self.biome.tree_zone_threshold {
            return (id, None);
        }
        let placement = self.noise.sample_2d(
            position.x,
            position.z,
            TREE_PLACEMENT_NOISE_OFFSET,
            self.biome.tree_placement_scale,
        );
        if placement <= self.biome.tree_placement_threshold {
            return (id, None);
        }

        let batch = structures::make_tree(
            &self.noise,
            position,
            self.biome.min_tree_size,
            self.biome.max_tree_size,
        );
        (id, Some(batch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_biome() -> BiomeProfile {
        // Amplitude 0 pins the surface at solid_ground_height, which makes
        // band boundaries exact.
        BiomeProfile {
            solid_ground_height: 64,
            terrain_height: 0,
            lodes: Vec::new(),
            tree_zone_threshold: 2.0,
            ..BiomeProfile::grassland()
        }
    }

    #[test]
    fn band_boundaries_follow_the_height_rules() {
        let terrain = TerrainGenerator::new(1, flat_biome());
        let column = |y: f32| terrain.compute_voxel(Point3::new(40.0, y, 40.0));

        assert_eq!(column(0.0), BlockKind::Bedrock as BlockId);
        assert_eq!(column(59.0), BlockKind::Stone as BlockId); // 59 < 64 - 4
        assert_eq!(column(60.0), BlockKind::Dirt as BlockId); // 60 ≥ 64 - 4
        assert_eq!(column(63.0), BlockKind::Dirt as BlockId);
        assert_eq!(column(64.0), BlockKind::Grass as BlockId);
        assert_eq!(column(65.0), BlockKind::Air as BlockId);
    }

    #[test]
    fn out_of_world_positions_are_air() {
        let terrain = TerrainGenerator::new(1, BiomeProfile::grassland());
        assert_eq!(
            terrain.compute_voxel(Point3::new(-1.0, 10.0, 0.0)),
            BlockKind::Air as BlockId
        );
        assert_eq!(
            terrain.compute_voxel(Point3::new(0.0, 400.0, 0.0)),
            BlockKind::Air as BlockId
        );
    }

    #[test]
    fn compute_voxel_is_deterministic() {
        let a = TerrainGenerator::new(77, BiomeProfile::grassland());
        let b = TerrainGenerator::new(77, BiomeProfile::grassland());
        for i in 0..256 {
            let p = Point3::new((i * 3 % 100) as f32, (i % 90) as f32, (i * 7 % 100) as f32);
            assert_eq!(a.compute_voxel(p), b.compute_voxel(p));
        }
    }
}
