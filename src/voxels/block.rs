//! # Block Module
//!
//! Block type descriptors and the registry that owns them. The registry is an
//! ordered table indexed by block id, loaded once at startup (either the
//! compiled-in defaults or a JSON document) and shared read-only by every
//! stage afterwards. Id 0 is always air.

use num_derive::FromPrimitive;
use serde::Deserialize;

use crate::error::WorldError;

/// The integer type blocks are identified by in voxel storage.
pub type BlockId = u8;

/// Well-known block ids, matching the order of the default registry.
///
/// The `FromPrimitive` derive allows conversion from raw [`BlockId`] values,
/// which is how voxel storage maps back onto named kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockKind {
    /// Empty space. Non-solid, fully transparent, never rendered.
    Air = 0,
    /// The unconditional solid floor at y == 0.
    Bedrock = 1,
    /// Surface block placed exactly at terrain height.
    Grass = 2,
    /// Sub-surface band directly below the grass layer.
    Dirt = 3,
    /// Bulk terrain below the dirt band; the only host material for lodes.
    Stone = 4,
    /// Loose surface material.
    Sand = 5,
    /// Crafted stone variant.
    Cobblestone = 6,
    /// Ore lode placed into stone.
    CoalOre = 7,
    /// Ore lode placed into stone.
    IronOre = 8,
    /// Tree trunk material.
    Wood = 9,
    /// Tree canopy material. Solid but see-through.
    Leaves = 10,
    /// Fully see-through solid block.
    Glass = 11,
}

impl BlockKind {
    /// Converts a raw block id to a kind, if the id names a well-known block.
    pub fn from_id(id: BlockId) -> Option<Self> {
        num::FromPrimitive::from_u8(id)
    }
}

/// Canonical block names of the default registry, mapped to their ids.
///
/// Declarative data (biome lode tables, settings) refers to blocks by name;
/// this map resolves those names without consulting a registry instance.
pub static BLOCK_IDS_BY_NAME: phf::Map<&'static str, BlockId> = phf::phf_map! {
    "air" => 0,
    "bedrock" => 1,
    "grass" => 2,
    "dirt" => 3,
    "stone" => 4,
    "sand" => 5,
    "cobblestone" => 6,
    "coal_ore" => 7,
    "iron_ore" => 8,
    "wood" => 9,
    "leaves" => 10,
    "glass" => 11,
};

/// Resolves a canonical block name to its id.
///
/// # Errors
/// Returns [`WorldError::UnknownBlock`] if the name is not in
/// [`BLOCK_IDS_BY_NAME`].
pub fn block_id_by_name(name: &str) -> Result<BlockId, WorldError> {
    BLOCK_IDS_BY_NAME
        .get(name)
        .copied()
        .ok_or_else(|| WorldError::UnknownBlock(name.to_string()))
}

/// The six faces of a voxel, in the order geometry tables are indexed.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockFace {
    /// The upward face (+Y).
    Top = 0,
    /// The face toward +Z.
    Front = 1,
    /// The face toward +X.
    Right = 2,
    /// The face toward -Z.
    Back = 3,
    /// The face toward -X.
    Left = 4,
    /// The downward face (-Y).
    Bottom = 5,
}

impl BlockFace {
    /// All six faces in index order. Meshing iterates this fixed order so
    /// rebuilds from identical voxel data emit identical buffers.
    pub fn all() -> [BlockFace; 6] {
        [
            BlockFace::Top,
            BlockFace::Front,
            BlockFace::Right,
            BlockFace::Back,
            BlockFace::Left,
            BlockFace::Bottom,
        ]
    }

    /// The offset to the voxel this face is adjacent to. Doubles as the
    /// outward face normal.
    pub fn offset(self) -> [i32; 3] {
        super::FACE_CHECKS[self as usize]
    }
}

/// Static description of one block type.
///
/// Descriptors are read-only after registry load and shared by reference
/// across all chunks; per-voxel storage carries only the [`BlockId`].
#[derive(Clone, Debug, Deserialize)]
pub struct BlockDescriptor {
    /// Canonical lower-case name, e.g. `"coal_ore"`.
    pub name: String,
    /// Whether the block occupies its cell for meshing and collision.
    pub is_solid: bool,
    /// How much light passes through, in `[0, 1]`. 0 is fully opaque.
    #[serde(default)]
    pub transparency: f32,
    /// Whether a neighboring voxel's face against this block is still drawn.
    /// True for air and see-through solids such as leaves and glass.
    #[serde(default)]
    pub render_neighbor_faces: bool,
    /// Atlas tile index per face, in [`BlockFace`] order.
    pub face_textures: [u32; 6],
    /// Largest stack an inventory collaborator may form of this block.
    #[serde(default = "default_stack_size")]
    pub max_stack_size: u32,
    /// Icon asset name for UI collaborators.
    #[serde(default)]
    pub icon: String,
}

fn default_stack_size() -> u32 {
    64
}

impl BlockDescriptor {
    fn new(
        name: &str,
        is_solid: bool,
        transparency: f32,
        render_neighbor_faces: bool,
        face_textures: [u32; 6],
    ) -> Self {
        BlockDescriptor {
            name: name.to_string(),
            is_solid,
            transparency,
            render_neighbor_faces,
            face_textures,
            max_stack_size: default_stack_size(),
            icon: format!("icons/{name}"),
        }
    }
}

/// The ordered block type table, indexed by [`BlockId`].
///
/// At most 256 entries; id 0 must be air. Queries with an id beyond the table
/// are normalized to air rather than treated as errors, per the engine's
/// safe-default policy for anomalous data.
pub struct BlockRegistry {
    blocks: Vec<BlockDescriptor>,
}

impl BlockRegistry {
    /// Builds the compiled-in default registry.
    ///
    /// Face texture order is [`BlockFace`] order: top, front, right, back,
    /// left, bottom.
    pub fn with_defaults() -> Self {
        let blocks = vec![
            BlockDescriptor::new("air", false, 1.0, true, [0; 6]),
            BlockDescriptor::new("bedrock", true, 0.0, false, [9; 6]),
            BlockDescriptor::new("grass", true, 0.0, false, [7, 2, 2, 2, 2, 1]),
            BlockDescriptor::new("dirt", true, 0.0, false, [1; 6]),
            BlockDescriptor::new("stone", true, 0.0, false, [0; 6]),
            BlockDescriptor::new("sand", true, 0.0, false, [10; 6]),
            BlockDescriptor::new("cobblestone", true, 0.0, false, [8; 6]),
            BlockDescriptor::new("coal_ore", true, 0.0, false, [12; 6]),
            BlockDescriptor::new("iron_ore", true, 0.0, false, [13; 6]),
            BlockDescriptor::new("wood", true, 0.0, false, [5, 4, 4, 4, 4, 5]),
            BlockDescriptor::new("leaves", true, 0.8, true, [16; 6]),
            BlockDescriptor::new("glass", true, 0.9, true, [18; 6]),
        ];
        BlockRegistry { blocks }
    }

    /// Loads a registry from a JSON array of descriptors.
    ///
    /// # Errors
    /// - [`WorldError::Config`] if the document does not parse
    /// - [`WorldError::RegistryOverflow`] if it holds more than 256 entries
    /// - [`WorldError::UnknownBlock`] if entry 0 is not named `"air"`
    pub fn from_json(text: &str) -> Result<Self, WorldError> {
        let blocks: Vec<BlockDescriptor> = serde_json::from_str(text)?;
        if blocks.len() > BlockId::MAX as usize + 1 {
            return Err(WorldError::RegistryOverflow(blocks.len()));
        }
        match blocks.first() {
            Some(first) if first.name == "air" => {}
            _ => return Err(WorldError::UnknownBlock("air".to_string())),
        }
        Ok(BlockRegistry { blocks })
    }

    /// Returns the descriptor for a block id, or the air descriptor if the id
    /// is outside the table.
    pub fn get(&self, id: BlockId) -> &BlockDescriptor {
        match self.blocks.get(id as usize) {
            Some(descriptor) => descriptor,
            None => {
                log::warn!("block id {id} outside registry, treating as air");
                &self.blocks[0]
            }
        }
    }

    /// Returns whether a block id names a solid block.
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get(id).is_solid
    }

    /// Returns the transparency factor of a block id.
    pub fn transparency(&self, id: BlockId) -> f32 {
        self.get(id).transparency
    }

    /// Returns the number of registered block types.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns whether the registry is empty. Never true for a loaded registry.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
