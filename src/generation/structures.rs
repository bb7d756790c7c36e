//! # Structure Planner
//!
//! Turns an anchor position into a deferred batch of voxel writes. The
//! planner never touches chunk state: a tree is just a list of [`VoxelEdit`]s
//! for the trunk and canopy, handed back to the caller for routing through
//! the world's deferred-modification queue. That indirection is what lets a
//! canopy straddle chunk boundaries safely, including into chunks that do not
//! exist yet.

use cgmath::Point3;

use crate::generation::noise_field::NoiseField;
use crate::voxels::block::{BlockKind, BlockId};
use crate::voxels::chunk::VoxelEdit;

/// Noise plane offset reserved for trunk-height variation.
const TREE_HEIGHT_NOISE_OFFSET: f32 = 250.0;
/// Noise scale for trunk-height variation.
const TREE_HEIGHT_NOISE_SCALE: f32 = 3.0;

/// Canopy footprint half-width: leaves span `[-2, 2]` around the trunk.
const CANOPY_RADIUS: i32 = 2;
/// Canopy height in blocks, stacked upward from the trunk top.
const CANOPY_HEIGHT: i32 = 6;

/// Plans a tree anchored at a surface position.
///
/// The trunk is a vertical run of wood starting one block above the anchor;
/// its height is noise-derived within the biome's `[min_size, max_size)`
/// range so tree sizes vary deterministically across the world. The canopy is
/// a 5x5x6 volume of leaves centered on the trunk top.
///
/// # Returns
/// The edit batch in emission order (trunk bottom-up, then canopy).
pub fn make_tree(
    noise: &NoiseField,
    anchor: Point3<f32>,
    min_size: i32,
    max_size: i32,
) -> Vec<VoxelEdit> {
    let wood = BlockKind::Wood as BlockId;
    let leaves = BlockKind::Leaves as BlockId;

    let size_sample = noise.sample_2d(
        anchor.x,
        anchor.z,
        TREE_HEIGHT_NOISE_OFFSET,
        TREE_HEIGHT_NOISE_SCALE,
    );
    let height = (size_sample * (max_size - min_size) as f32) as i32 + min_size;

    let mut edits = Vec::new();
    for i in 1..height {
        edits.push(VoxelEdit::new(
            Point3::new(anchor.x, anchor.y + i as f32, anchor.z),
            wood,
        ));
    }

    for x in -CANOPY_RADIUS..=CANOPY_RADIUS {
        for y in 0..CANOPY_HEIGHT {
            for z in -CANOPY_RADIUS..=CANOPY_RADIUS {
                edits.push(VoxelEdit::new(
                    Point3::new(
                        anchor.x + x as f32,
                        anchor.y + (height + y) as f32,
                        anchor.z + z as f32,
                    ),
                    leaves,
                ));
            }
        }
    }

    edits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tree_has_trunk_and_full_canopy() {
        let noise = NoiseField::new(42);
        let edits = make_tree(&noise, Point3::new(100.0, 64.0, 100.0), 4, 7);

        let trunk = edits
            .iter()
            .filter(|e| e.id == BlockKind::Wood as BlockId)
            .count();
        let canopy = edits
            .iter()
            .filter(|e| e.id == BlockKind::Leaves as BlockId)
            .count();

        assert!((3..7).contains(&trunk), "trunk height out of range: {trunk}");
        assert_eq!(canopy, 5 * 5 * 6);
    }

    #[test]
    fn tree_batches_are_deterministic() {
        let noise = NoiseField::new(42);
        let anchor = Point3::new(33.0, 70.0, 81.0);
        assert_eq!(
            make_tree(&noise, anchor, 4, 7),
            make_tree(&noise, anchor, 4, 7)
        );
    }
}
