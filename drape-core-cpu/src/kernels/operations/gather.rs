use drape_model::{adjacency_slot, CHANNELS};

use crate::model::{Adjacency, PositionPair, SplitVec3};

/// `(neighbour cell, rest distance)` for every used slot of `cell`, in ring order
pub fn ring<'a>(adjacency: &'a Adjacency<'a>, cell: usize) -> impl Iterator<Item = (usize, f32)> + Clone + 'a {
    (0..adjacency.layers * CHANNELS as usize)
        .map(move |slot| {
            let (texel, channel) = adjacency_slot(cell, slot, adjacency.cells);
            (
                adjacency.indices[texel].0[channel],
                adjacency.distances[texel].0[channel],
            )
        })
        .take_while(|(index, _)| *index >= 0.0)
        .map(|(index, distance)| (index as usize, distance))
}

/// Like [`ring`], with each neighbour's position; neighbours in empty cells are skipped
pub fn ring_positions<'a>(
    adjacency: &'a Adjacency<'a>,
    positions: &'a PositionPair,
    cell: usize,
) -> impl Iterator<Item = (usize, SplitVec3, f32)> + Clone + 'a {
    ring(adjacency, cell)
        .filter_map(|(neighbour, rest)| Some((neighbour, positions.get(neighbour)?, rest)))
}
