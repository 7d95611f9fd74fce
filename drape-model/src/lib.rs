#![no_std]

mod model;
pub use model::*;

mod layout;
pub use layout::*;

mod extractor;
pub use extractor::*;

mod loader;
pub use loader::*;

mod extract_flags;
pub use extract_flags::*;

/// Dimensions of every buffer a backend allocates for one mesh.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Eq, Ord)]
pub struct ModelSize {
    pub vertices: VertexIndex,
    /// Side of the square cell grid, `ceil(sqrt(vertices))`
    pub resolution: u32,
    /// Number of 4-slot adjacency layers, `ceil(max_ring / 4)`
    pub adjacency_layers: u32,
    /// Longest one-ring over all vertices
    pub max_ring: u32,
}

impl ModelSize {
    pub const fn for_topology(vertices: VertexIndex, max_ring: u32) -> Self {
        Self {
            vertices,
            resolution: resolution_for(vertices),
            adjacency_layers: layers_for(max_ring),
            max_ring,
        }
    }

    /// Cells in one position-shaped buffer
    pub const fn cells(&self) -> usize {
        (self.resolution as usize) * (self.resolution as usize)
    }

    /// Texels in one adjacency-shaped buffer (all layers)
    pub const fn adjacency_cells(&self) -> usize {
        self.cells() * (self.adjacency_layers as usize)
    }
}

#[cfg(feature = "bytemuck")]
mod texel_sa {
    use static_assertions as sa;

    sa::assert_eq_size!(crate::Texel, [f32; 4]);
    sa::assert_impl_all!(crate::Texel: bytemuck::Pod);
    sa::assert_impl_all!(crate::Vector3F: bytemuck::Pod);
}
