use rayon::prelude::*;

use crate::model::{PositionPair, SplitVec3};

pub fn snapshot(
    positions: &PositionPair,
) -> impl IndexedParallelIterator<Item = Option<SplitVec3>> + '_ {
    (0..positions.cells())
        .into_par_iter()
        .map(|cell| positions.get(cell))
}
