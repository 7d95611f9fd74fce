//! Logic to turn a closed triangle mesh into the packed topology a drape solver loads.
//! The import works in several phases which build on top of each other.
//!
//! 1. `weld`
//!     Coincident vertices (UV seams, split normals) are merged so that triangles
//!     sharing an authored edge share its vertex indices.
//! 2. `face_arena`
//!     Faces are stored by index together with a vertex-to-faces table and a
//!     directed half-edge lookup.
//! 3. `one_ring`
//!     The triangle fan around each vertex is walked in winding order, producing
//!     its ordered ring of neighbours and their rest distances.
//! 4. `pack`
//!     Rest positions and rings are laid out in square, 4-channel buffers padded with
//!     `-1`, ready for any [`drape_model::Loader`].
pub mod face_arena;
pub mod input;
pub mod one_ring;
pub mod pack;
pub mod shapes;
pub mod weld;

use drape_model::{LoaderDyn, ModelSize, OutOfBounds, VertexIndex};
pub use input::{IndexedMesh, MeshInput};
pub use pack::PackedTopology;

/// Adjacency indices travel as `f32`, which is exact up to this many vertices
pub const MAX_VERTICES: u32 = 1 << 24;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ImportError {
    /// The mesh has no vertices left after welding
    #[error("the mesh has no vertices")]
    EmptyMesh,
    /// More vertices than the packed index format can address
    #[error("the mesh has {count} vertices, at most {} are supported", MAX_VERTICES)]
    TooManyVertices { count: usize },
    /// The weld tolerance must be a positive, finite distance
    #[error("weld tolerance {tolerance} is not a positive finite distance")]
    InvalidTolerance { tolerance: f32 },
    /// A vertex coordinate is NaN or infinite
    #[error("vertex {vertex} has a non-finite coordinate")]
    NonFinitePosition { vertex: VertexIndex },
    /// Face {face_index}'s vertex #{vertex_number} refers to vertex index {points_to_vertex}, but only {vertex_count} vertices are defined
    #[error("face {face_index}'s vertex #{vertex_number} refers to vertex index {points_to_vertex}, but only {vertex_count} vertices are defined")]
    IncorrectFaceIndices {
        face_index: u32,
        vertex_number: u8,
        points_to_vertex: u32,
        vertex_count: u32,
    },
    /// Two faces traverse the same edge in the same direction: their winding
    /// disagrees, or more than two faces meet at the edge
    #[error("faces {first_face} and {second_face} both contain the directed edge {from} -> {to}")]
    DuplicateHalfEdge {
        from: VertexIndex,
        to: VertexIndex,
        first_face: u32,
        second_face: u32,
    },
    /// A vertex is not used by any face
    #[error("vertex {vertex} belongs to no face")]
    IsolatedVertex { vertex: VertexIndex },
    /// The fan around `vertex` cannot be continued past `neighbour`: the edge
    /// between them lies on a boundary or is non-manifold
    #[error("the fan around vertex {vertex} is open at the edge to vertex {neighbour}")]
    OpenFan {
        vertex: VertexIndex,
        neighbour: VertexIndex,
    },
    /// The faces around `vertex` form several cycles (the vertex pinches two sheets)
    #[error("the fan around vertex {vertex} closed after {ring} of its {incident} faces")]
    SplitFan {
        vertex: VertexIndex,
        ring: u32,
        incident: u32,
    },
    /// The loader was allocated for a different topology
    #[error("loader was sized for {found:?}, the topology needs {expected:?}")]
    SizeMismatch {
        expected: ModelSize,
        found: ModelSize,
    },
    /// The loader rejected a write
    #[error("loading failed: {0}")]
    Load(#[from] OutOfBounds),
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImportConfig {
    /// Vertices closer than this on every axis are merged
    pub weld_tolerance: f32,
}

impl ImportConfig {
    pub const DEFAULT: Self = Self {
        weld_tolerance: 1e-5,
    };
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Runs every phase and returns the packed buffers.
#[tracing::instrument(skip_all, fields(vertices = input.positions().len(), triangles = input.triangles().len()))]
pub fn extract_topology<I>(input: &I, config: &ImportConfig) -> Result<PackedTopology, ImportError>
where
    I: MeshInput + ?Sized,
{
    let welded = weld::weld(input, config.weld_tolerance)?;
    if welded.positions.is_empty() {
        return Err(ImportError::EmptyMesh);
    }
    if welded.positions.len() > MAX_VERTICES as usize {
        return Err(ImportError::TooManyVertices {
            count: welded.positions.len(),
        });
    }

    let arena = face_arena::FaceArena::build(&welded.triangles, welded.positions.len() as u32)?;
    let rings = one_ring::walk_rings(&arena, &welded.positions)?;
    Ok(PackedTopology::pack(&welded.positions, &rings, welded.remap))
}

/// Extracts the topology, asks `output_factory` for a loader of the right size and fills it.
pub fn import<F, O, I>(output_factory: F, input: &I, config: &ImportConfig) -> Result<O, ImportError>
where
    F: FnOnce(ModelSize) -> O,
    O: LoaderDyn,
    I: MeshInput + ?Sized,
{
    let topology = extract_topology(input, config)?;
    let mut output = output_factory(topology.size);
    topology.load(&mut output)?;
    Ok(output)
}
