use drape_model::{Texel, VALID};
use itertools::Itertools;
use nalgebra::Vector3;
use rayon::prelude::*;
use smallvec::SmallVec;

use super::gather;
use crate::model::{Adjacency, PositionPair};

pub struct NormalInput<'backer> {
    pub positions: &'backer PositionPair,
    pub adjacency: Adjacency<'backer>,
}

/// Area-weighted vertex normal from the fan of consecutive ring neighbours.
pub fn compute_normals<'a>(
    inputs: &'a NormalInput<'a>,
) -> impl IndexedParallelIterator<Item = Texel> + 'a {
    (0..inputs.positions.cells())
        .into_par_iter()
        .map(move |cell| {
            let Some(position) = inputs.positions.get(cell) else {
                return Texel::SENTINEL;
            };

            let spokes: SmallVec<[Vector3<f32>; 8]> =
                gather::ring_positions(&inputs.adjacency, inputs.positions, cell)
                    .map(|(_, neighbour, _)| neighbour.difference(&position))
                    .collect();

            let sum: Vector3<f32> = spokes
                .iter()
                .circular_tuple_windows()
                .map(|(a, b)| a.cross(b))
                .sum();
            let normal = sum.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
            Texel::from_xyz(normal.into(), VALID)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::a_initialize::{initialize, InitializeInput};
    use approx::assert_relative_eq;
    use drape_mesh_importer::{extract_topology, shapes, ImportConfig};

    #[test]
    fn sphere_normals_point_outward() {
        let topology = extract_topology(&shapes::icosphere(2, 2.0), &ImportConfig::DEFAULT).unwrap();
        let mut positions = PositionPair::with_cells(topology.size.cells());
        positions.write(initialize(&InitializeInput {
            rest_position: &topology.rest_position,
        }));

        let inputs = NormalInput {
            positions: &positions,
            adjacency: Adjacency::new(
                &topology.adjacent_indices,
                &topology.adjacent_distances,
                &topology.size,
            ),
        };
        let normals: Vec<_> = compute_normals(&inputs).collect();

        for (cell, normal) in normals.iter().enumerate() {
            let Some(position) = positions.get(cell) else {
                assert_eq!(*normal, Texel::SENTINEL);
                continue;
            };
            let normal = Vector3::from(normal.xyz());
            assert_relative_eq!(normal.norm(), 1.0, epsilon = 1e-5);
            assert!(normal.dot(&position.value().normalize()) > 0.99);
        }
    }
}
