use drape_model::Texel;
use nalgebra::Vector3;
use rayon::prelude::*;

use crate::model::SplitVec3;

pub struct InitializeInput<'backer> {
    pub rest_position: &'backer [Texel],
}

/// Seeds a position pair with the rest pose: coarse = rest, residual = 0.
pub fn initialize<'a>(
    inputs: &'a InitializeInput<'a>,
) -> impl IndexedParallelIterator<Item = Option<SplitVec3>> + 'a {
    inputs.rest_position.par_iter().map(|rest| {
        rest.is_valid()
            .then(|| SplitVec3::from_f32(Vector3::from(rest.xyz())))
    })
}
