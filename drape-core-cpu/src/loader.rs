use drape_model::{ModelSize, SliceWriteAccess, Texel};

use crate::{FrameState, Runner};

/// Loading replaces the topology, so any simulated state is dropped.
impl drape_model::Loader for Runner {
    fn model(&self) -> ModelSize {
        self.state.size
    }

    type RestPositionAccess<'a> = SliceWriteAccess<'a, Texel>;
    fn access_rest_position(&mut self) -> Self::RestPositionAccess<'_> {
        self.frame_state = FrameState::First;
        SliceWriteAccess(&mut self.state.rest_position)
    }

    type AdjacentIndicesAccess<'a> = SliceWriteAccess<'a, Texel>;
    fn access_adjacent_indices(&mut self) -> Self::AdjacentIndicesAccess<'_> {
        self.frame_state = FrameState::First;
        SliceWriteAccess(&mut self.state.adjacent_indices)
    }

    type AdjacentDistancesAccess<'a> = SliceWriteAccess<'a, Texel>;
    fn access_adjacent_distances(&mut self) -> Self::AdjacentDistancesAccess<'_> {
        self.frame_state = FrameState::First;
        SliceWriteAccess(&mut self.state.adjacent_distances)
    }
}
