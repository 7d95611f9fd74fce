use nalgebra::Vector3;
use rayon::prelude::*;

use super::gather;
use crate::model::{Adjacency, PositionPair, SplitVec3};

/// Share of an edge's correction taken by each end
pub const EDGE_SHARE: f32 = 0.5;

pub struct SolveInput<'backer> {
    pub positions: &'backer PositionPair,
    pub adjacency: Adjacency<'backer>,
    /// Grabbed vertex, passed through unchanged
    pub pinned: Option<usize>,
}

/// One Jacobi relaxation iteration over every rest-distance constraint.
///
/// Each vertex moves by the mean of the corrections its ring asks for, computed
/// from `positions` alone, so the output never depends on cell order.
pub fn relax<'a>(
    inputs: &'a SolveInput<'a>,
) -> impl IndexedParallelIterator<Item = Option<SplitVec3>> + 'a {
    (0..inputs.positions.cells())
        .into_par_iter()
        .map(move |cell| {
            let position = inputs.positions.get(cell)?;
            if inputs.pinned == Some(cell) {
                return Some(position);
            }

            let (sum, count) = gather::ring_positions(&inputs.adjacency, inputs.positions, cell)
                .filter_map(|(_, neighbour_position, rest)| {
                    let delta = neighbour_position.difference(&position);
                    let length = delta.norm();
                    if length <= f32::EPSILON {
                        return None;
                    }
                    Some(delta * ((1.0 - rest / length) * EDGE_SHARE))
                })
                .fold((Vector3::zeros(), 0u32), |(sum, count), correction| {
                    (sum + correction, count + 1)
                });

            if count == 0 {
                return Some(position);
            }
            Some(position.add(&(sum / count as f32)))
        })
}
