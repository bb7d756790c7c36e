//! # Lighting Module
//!
//! Per-voxel ambient light, recomputed for a chunk whenever it is about to
//! remesh. Light derives in two phases:
//!
//! 1. **Vertical pass**: every (x, z) column is scanned top to bottom with a
//!    running light ray starting at 1.0; a block whose transparency is lower
//!    than the ray clamps the ray down to it. Each voxel takes the ray value
//!    as its light.
//! 2. **Flood fill**: voxels still lit above the falloff threshold seed a
//!    breadth-first spread across the six face neighbors, each hop losing
//!    [`LIGHT_FALLOFF`]. A neighbor is only updated when the spread strictly
//!    improves its light, so values rise monotonically toward a fixed point
//!    and the fill terminates.
//!
//! The fill is confined to the chunk being lit: light at chunk boundaries is
//! approximate because the spread does not cross into neighbor chunks. This
//! is a documented limitation of the model, not a defect to patch around.

use std::collections::VecDeque;

use crate::voxels::block::BlockRegistry;
use crate::voxels::chunk::Chunk;
use crate::voxels::{CHUNK_HEIGHT, CHUNK_WIDTH, FACE_CHECKS};

/// Light lost per flood-fill hop between face-adjacent voxels.
pub const LIGHT_FALLOFF: f32 = 0.08;

/// Computes per-voxel light for one chunk.
pub struct LightPropagator;

impl LightPropagator {
    /// Recomputes every voxel's light level in `chunk`.
    ///
    /// Runs the vertical attenuation pass and then the in-chunk flood fill.
    /// After this call every light value is in `[0, 1]`, and light never
    /// increases with flood-fill distance from a seed.
    pub fn recompute(chunk: &mut Chunk, registry: &BlockRegistry) {
        let mut queue = Self::cast_sunlight(chunk, registry);
        Self::flood_fill(chunk, &mut queue);
    }

    /// Vertical pass: top-down column attenuation.
    ///
    /// Returns the seed queue for the flood fill: every voxel whose light
    /// survived above [`LIGHT_FALLOFF`].
    fn cast_sunlight(chunk: &mut Chunk, registry: &BlockRegistry) -> VecDeque<(i32, i32, i32)> {
        let mut seeds = VecDeque::new();

        for x in 0..CHUNK_WIDTH as usize {
            for z in 0..CHUNK_WIDTH as usize {
                let mut light_ray = 1.0_f32;

                for y in (0..CHUNK_HEIGHT as usize).rev() {
                    let voxel = chunk.voxel_local(x, y, z);
                    if voxel.id != 0 {
                        let transparency = registry.transparency(voxel.id);
                        if transparency < light_ray {
                            light_ray = transparency;
                        }
                    }
                    chunk.set_light_local(x, y, z, light_ray);

                    if light_ray > LIGHT_FALLOFF {
                        seeds.push_back((x as i32, y as i32, z as i32));
                    }
                }
            }
        }

        seeds
    }

    /// Flood-fill pass: breadth-first spread across face neighbors.
    fn flood_fill(chunk: &mut Chunk, queue: &mut VecDeque<(i32, i32, i32)>) {
        while let Some((x, y, z)) = queue.pop_front() {
            let spread = chunk.light_local(x as usize, y as usize, z as usize) - LIGHT_FALLOFF;
            if spread <= 0.0 {
                continue;
            }

            for offset in FACE_CHECKS {
                let (nx, ny, nz) = (x + offset[0], y + offset[1], z + offset[2]);
                if !Chunk::contains_local(nx, ny, nz) {
                    // Boundary approximation: the fill stays inside this chunk.
                    continue;
                }
                let (ux, uy, uz) = (nx as usize, ny as usize, nz as usize);
                if spread > chunk.light_local(ux, uy, uz) {
                    chunk.set_light_local(ux, uy, uz, spread);
                    if spread > LIGHT_FALLOFF {
                        queue.push_back((nx, ny, nz));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::{BiomeProfile, TerrainGenerator};
    use crate::voxels::chunk::ChunkCoord;

    #[test]
    fn light_levels_stay_in_unit_range() {
        let registry = BlockRegistry::with_defaults();
        let terrain = TerrainGenerator::new(5, BiomeProfile::grassland());
        let mut chunk = Chunk::new(ChunkCoord::new(8, 8));
        chunk.populate(&terrain, &registry);

        LightPropagator::recompute(&mut chunk, &registry);

        for y in 0..CHUNK_HEIGHT as usize {
            for x in 0..CHUNK_WIDTH as usize {
                for z in 0..CHUNK_WIDTH as usize {
                    let light = chunk.voxel_local(x, y, z).light;
                    assert!((0.0..=1.0).contains(&light));
                }
            }
        }
    }

    #[test]
    fn open_sky_columns_are_fully_lit() {
        let registry = BlockRegistry::with_defaults();
        let terrain = TerrainGenerator::new(5, BiomeProfile::grassland());
        let mut chunk = Chunk::new(ChunkCoord::new(8, 8));
        chunk.populate(&terrain, &registry);

        LightPropagator::recompute(&mut chunk, &registry);

        // The topmost layer is always above the terrain ceiling.
        let top = CHUNK_HEIGHT as usize - 1;
        for x in 0..CHUNK_WIDTH as usize {
            for z in 0..CHUNK_WIDTH as usize {
                assert_eq!(chunk.voxel_local(x, top, z).light, 1.0);
            }
        }
    }

    #[test]
    fn opaque_cover_attenuates_the_column_below() {
        let registry = BlockRegistry::with_defaults();
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0));
        // An opaque slab across the whole chunk, high above an empty grid.
        let terrain = TerrainGenerator::new(
            5,
            BiomeProfile {
                solid_ground_height: 0,
                terrain_height: 0,
                ..BiomeProfile::grassland()
            },
        );
        chunk.populate(&terrain, &registry);
        for x in 0..CHUNK_WIDTH as usize {
            for z in 0..CHUNK_WIDTH as usize {
                chunk.set_voxel_local(x, 100, z, 4, &registry);
            }
        }

        LightPropagator::recompute(&mut chunk, &registry);

        // Above the slab sunlight is untouched. Below it only flood-fill
        // seepage remains, strictly weaker and fading with depth until it
        // dies out entirely.
        assert_eq!(chunk.voxel_local(8, 101, 8).light, 1.0);
        let below = chunk.voxel_local(8, 99, 8).light;
        assert!(below < 1.0 - LIGHT_FALLOFF + f32::EPSILON);
        let mut previous = below;
        for y in (60..99).rev() {
            let light = chunk.voxel_local(8, y, 8).light;
            assert!(light <= previous);
            previous = light;
        }
        assert_eq!(chunk.voxel_local(8, 60, 8).light, 0.0);
    }
}
