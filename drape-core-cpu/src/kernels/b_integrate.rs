use drape_model::Texel;
use nalgebra::{Isometry3, Point3, Vector3};
use rayon::prelude::*;

use crate::model::{PositionPair, SplitVec3};
use crate::parameters::IntegrateUniforms;

pub struct IntegrateInput<'backer> {
    pub rest_position: &'backer [Texel],
    /// State at the start of the previous frame
    pub previous: &'backer PositionPair,
    /// State at the end of the previous frame
    pub current: &'backer PositionPair,
    /// Maps the rest pose into the frame the surface should settle in
    pub transform: Isometry3<f32>,
    pub uniforms: IntegrateUniforms,
    /// Already clamped
    pub dt: f32,
}

/// One Verlet step of a damped spring pulling each vertex to its transformed rest position.
///
/// With `X` the current and `P` the previous position, `v = (X - P) / dt` and
/// `a = (tension·(target - X) - damping·v) / mass`:
/// `X' = X + (X - P) + a·dt²`.
pub fn integrate<'a>(
    inputs: &'a IntegrateInput<'a>,
) -> impl IndexedParallelIterator<Item = Option<SplitVec3>> + 'a {
    let IntegrateUniforms {
        tension,
        damping,
        mass,
    } = inputs.uniforms;
    let dt = inputs.dt;
    let carry = 1.0 - damping * dt / mass;
    let pull = tension / mass * dt * dt;

    (0..inputs.rest_position.len())
        .into_par_iter()
        .map(move |cell| {
            let current = inputs.current.get(cell)?;
            if dt <= 0.0 {
                return Some(current);
            }
            let previous = inputs.previous.get(cell).unwrap_or(current);

            let rest = Point3::from(inputs.rest_position[cell].xyz());
            let target: Vector3<f32> = inputs.transform.transform_point(&rest).coords;

            let step = current.difference(&previous) * carry + current.offset_to(&target) * pull;
            Some(current.add(&step))
        })
}
