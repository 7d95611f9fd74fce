use drape_model::{adjacency_slot, LoaderDyn, ModelSize, Texel, VertexIndex, CHANNELS, VALID};
use itertools::izip;

use crate::input::Vector3F;
use crate::one_ring::Rings;
use crate::ImportError;

/// Rest positions and one-rings laid out as square, channel-packed buffers
#[derive(Debug, Clone, PartialEq)]
pub struct PackedTopology {
    pub size: ModelSize,
    pub rest_position: Vec<Texel>,
    pub adjacent_indices: Vec<Texel>,
    pub adjacent_distances: Vec<Texel>,
    /// Authored vertex index to packed vertex index
    pub remap: Vec<VertexIndex>,
}

impl PackedTopology {
    pub fn pack(positions: &[Vector3F], rings: &Rings, remap: Vec<VertexIndex>) -> Self {
        let size = ModelSize::for_topology(positions.len() as u32, rings.max_len());
        let cells = size.cells();

        let mut rest_position = vec![Texel::SENTINEL; cells];
        for (texel, position) in rest_position.iter_mut().zip(positions) {
            *texel = Texel::from_xyz(*position, VALID);
        }

        let mut adjacent_indices = vec![Texel::SENTINEL; size.adjacency_cells()];
        let mut adjacent_distances = vec![Texel::SENTINEL; size.adjacency_cells()];
        for vertex in 0..positions.len() {
            let v = vertex as VertexIndex;
            for (slot, &neighbour, &distance) in
                izip!(0.., rings.neighbours(v), rings.distances(v))
            {
                let (texel, channel) = adjacency_slot(vertex, slot, cells);
                // Exact while the vertex count stays below 2^24
                adjacent_indices[texel].0[channel] = neighbour as f32;
                adjacent_distances[texel].0[channel] = distance;
            }
        }

        Self {
            size,
            rest_position,
            adjacent_indices,
            adjacent_distances,
            remap,
        }
    }

    /// Reads back the ring of `vertex` from the packed buffers, stopping at the first sentinel.
    pub fn ring(&self, vertex: VertexIndex) -> impl Iterator<Item = (VertexIndex, f32)> + '_ {
        let cells = self.size.cells();
        let slots = (self.size.adjacency_layers * CHANNELS) as usize;
        (0..slots)
            .map(move |slot| {
                let (texel, channel) = adjacency_slot(vertex as usize, slot, cells);
                (
                    self.adjacent_indices[texel].0[channel],
                    self.adjacent_distances[texel].0[channel],
                )
            })
            .take_while(|(index, _)| *index >= 0.0)
            .map(|(index, distance)| (index as VertexIndex, distance))
    }

    pub fn rest_position(&self, vertex: VertexIndex) -> Option<Vector3F> {
        self.rest_position
            .get(vertex as usize)
            .filter(|texel| texel.is_valid())
            .map(Texel::xyz)
    }

    pub fn load<L>(&self, loader: &mut L) -> Result<(), ImportError>
    where
        L: LoaderDyn + ?Sized,
    {
        let target = loader.model();
        if target != self.size {
            return Err(ImportError::SizeMismatch {
                expected: self.size,
                found: target,
            });
        }

        loader.copy_rest_position(&self.rest_position, 0)?;
        loader.copy_adjacent_indices(&self.adjacent_indices, 0)?;
        loader.copy_adjacent_distances(&self.adjacent_distances, 0)?;
        Ok(())
    }
}
