use drape_model::Texel;
use nalgebra::Vector3;
use rayon::prelude::*;

use crate::model::{PositionPair, SplitVec3};
use crate::Grab;

pub struct ExternalForceInput<'backer> {
    pub rest_position: &'backer [Texel],
    pub positions: &'backer PositionPair,
    /// Vertex already checked to hold a position
    pub grab: Option<Grab>,
    pub cursor_size: f32,
}

/// Brush weight at `t = rest distance / cursor size`: 1 at the grabbed vertex,
/// easing to 0 at the brush edge and staying 0 beyond it.
pub fn falloff(t: f32) -> f32 {
    if t >= 1.0 {
        return 0.0;
    }
    let t = t.max(0.0);
    1.0 - t * t * (3.0 - 2.0 * t)
}

/// Moves the grabbed vertex onto its target and drags its rest-space
/// neighbourhood along by the same displacement, weighted by [`falloff`].
pub fn apply_external_force<'a>(
    inputs: &'a ExternalForceInput<'a>,
) -> impl IndexedParallelIterator<Item = Option<SplitVec3>> + 'a {
    let brush = inputs.grab.and_then(|grab| {
        let cell = grab.vertex as usize;
        let rest = inputs.rest_position.get(cell).filter(|t| t.is_valid())?;
        let displacement = inputs.positions.get(cell)?.offset_to(&grab.target);
        Some((cell, Vector3::from(rest.xyz()), displacement, grab.target))
    });

    (0..inputs.positions.cells())
        .into_par_iter()
        .map(move |cell| {
            let position = inputs.positions.get(cell)?;
            let Some((grabbed, grabbed_rest, displacement, target)) = brush else {
                return Some(position);
            };

            if cell == grabbed {
                return Some(SplitVec3::from_f32(target));
            }
            if inputs.cursor_size <= 0.0 {
                return Some(position);
            }

            let rest = Vector3::from(inputs.rest_position[cell].xyz());
            let t = (rest - grabbed_rest).norm() / inputs.cursor_size;
            if t >= 1.0 {
                return Some(position);
            }
            Some(position.add(&(displacement * falloff(t))))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use drape_model::VALID;

    fn line() -> (Vec<Texel>, PositionPair) {
        let xs = [0.0, 0.05, 0.1, 0.2];
        let rest: Vec<_> = xs
            .iter()
            .map(|x| Texel::from_xyz([*x, 0.0, 0.0], VALID))
            .collect();
        let mut positions = PositionPair::with_cells(rest.len());
        positions.write(
            rest.par_iter()
                .map(|t| Some(SplitVec3::from_f32(Vector3::from(t.xyz())))),
        );
        (rest, positions)
    }

    #[test]
    fn falloff_contract() {
        assert_eq!(falloff(0.0), 1.0);
        assert_eq!(falloff(1.0), 0.0);
        assert_eq!(falloff(3.0), 0.0);
        assert!(falloff(0.25) > falloff(0.5) && falloff(0.5) > falloff(0.75));
    }

    #[test]
    fn brush_is_local() {
        let (rest, positions) = line();
        let inputs = ExternalForceInput {
            rest_position: &rest,
            positions: &positions,
            grab: Some(Grab {
                vertex: 0,
                target: Vector3::new(0.0, 0.0, 1.0),
            }),
            cursor_size: 0.15,
        };

        let out: Vec<_> = apply_external_force(&inputs).map(Option::unwrap).collect();
        assert_eq!(out[0].value(), Vector3::new(0.0, 0.0, 1.0));

        let near = out[1].value() - positions.get(1).unwrap().value();
        let far = out[2].value() - positions.get(2).unwrap().value();
        assert!(near.z > far.z && far.z > 0.0);
        assert_eq!(near.x, 0.0);

        // 0.2 away, outside the brush
        assert_eq!(out[3], positions.get(3).unwrap());
    }

    #[test]
    fn no_grab_is_a_copy() {
        let (rest, positions) = line();
        let inputs = ExternalForceInput {
            rest_position: &rest,
            positions: &positions,
            grab: None,
            cursor_size: 0.15,
        };

        let out: Vec<_> = apply_external_force(&inputs).collect();
        for (cell, position) in out.into_iter().enumerate() {
            assert_eq!(position, positions.get(cell));
        }
    }
}
