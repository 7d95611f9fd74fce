use drape_model::{ModelSize, SliceWriteAccess, Texel};

/// Loader that keeps whatever the importer writes, for inspection
#[derive(Debug, Clone)]
pub struct Store {
    pub model_size: ModelSize,
    pub rest_position: Vec<Texel>,
    pub adjacent_indices: Vec<Texel>,
    pub adjacent_distances: Vec<Texel>,
}

impl Store {
    pub fn with_size(model_size: ModelSize) -> Self {
        Self {
            model_size,
            rest_position: vec![Texel([f32::NAN; 4]); model_size.cells()],
            adjacent_indices: vec![Texel([f32::NAN; 4]); model_size.adjacency_cells()],
            adjacent_distances: vec![Texel([f32::NAN; 4]); model_size.adjacency_cells()],
        }
    }
}

impl drape_model::Loader for Store {
    fn model(&self) -> ModelSize {
        self.model_size
    }

    type RestPositionAccess<'a> = SliceWriteAccess<'a, Texel>;
    fn access_rest_position(&mut self) -> Self::RestPositionAccess<'_> {
        SliceWriteAccess(&mut self.rest_position)
    }

    type AdjacentIndicesAccess<'a> = SliceWriteAccess<'a, Texel>;
    fn access_adjacent_indices(&mut self) -> Self::AdjacentIndicesAccess<'_> {
        SliceWriteAccess(&mut self.adjacent_indices)
    }

    type AdjacentDistancesAccess<'a> = SliceWriteAccess<'a, Texel>;
    fn access_adjacent_distances(&mut self) -> Self::AdjacentDistancesAccess<'_> {
        SliceWriteAccess(&mut self.adjacent_distances)
    }
}
