use rayon::prelude::*;

use super::gather;
use crate::model::{Adjacency, PositionPair};

pub struct ConstraintErrorInput<'backer> {
    pub positions: &'backer PositionPair,
    pub adjacency: Adjacency<'backer>,
}

/// Worst relative deviation from rest length over each vertex's ring, 0 for empty cells.
pub fn constraint_error<'a>(
    inputs: &'a ConstraintErrorInput<'a>,
) -> impl IndexedParallelIterator<Item = f32> + 'a {
    (0..inputs.positions.cells())
        .into_par_iter()
        .map(move |cell| {
            let Some(position) = inputs.positions.get(cell) else {
                return 0.0;
            };

            gather::ring_positions(&inputs.adjacency, inputs.positions, cell)
                .filter(|(_, _, rest)| *rest > 0.0)
                .map(|(_, neighbour, rest)| {
                    (neighbour.difference(&position).norm() / rest - 1.0).abs()
                })
                .fold(0.0, f32::max)
        })
}
