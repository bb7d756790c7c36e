//! Mesh buffer types handed across the renderer boundary.

/// One vertex of a chunk mesh.
///
/// Positions are chunk-local; the consumer places the mesh at the chunk's
/// world origin. The layout is `#[repr(C)]` and `bytemuck::Pod` so the whole
/// vertex buffer can be uploaded to a GPU byte-for-byte.
///
/// # Memory Layout
/// - Position: `[f32; 3]` (12 bytes)
/// - Normal: `[f32; 3]` (12 bytes)
/// - Texture Coordinates: `[f32; 2]` (8 bytes)
/// - Light Color: `[f32; 4]` (16 bytes)
///
/// Total size: 48 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Chunk-local position of the vertex.
    pub position: [f32; 3],
    /// Outward face normal.
    pub normal: [f32; 3],
    /// Normalized atlas UV coordinates.
    pub uv: [f32; 2],
    /// Per-vertex light color; alpha carries the light level, RGB is unused
    /// so a shader can blend its own tint.
    pub color: [f32; 4],
}

/// The complete mesh buffers for one chunk.
///
/// Opaque and transparent faces share the vertex buffer but index it through
/// separate lists, so a renderer can draw them as two submeshes with
/// different blend states.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkMesh {
    /// Shared vertex buffer.
    pub vertices: Vec<Vertex>,
    /// Triangle indices of opaque faces.
    pub opaque_indices: Vec<u32>,
    /// Triangle indices of see-through faces.
    pub transparent_indices: Vec<u32>,
}

impl ChunkMesh {
    /// Returns whether the mesh holds no geometry at all.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertex buffer as raw bytes, ready for GPU upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
