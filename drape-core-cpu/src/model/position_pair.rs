use drape_model::{Texel, TexelPair};
use rayon::prelude::*;

use super::SplitVec3;

/// Coarse ("integer") and residual ("fractional") texels of every cell.
///
/// Both buffers always have the same length and are written together; a
/// cell whose integer flag is not positive holds no vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionPair {
    pub integer: Vec<Texel>,
    pub fractional: Vec<Texel>,
}

impl PositionPair {
    pub fn with_cells(cells: usize) -> Self {
        Self {
            integer: vec![Texel::SENTINEL; cells],
            fractional: vec![Texel::SENTINEL; cells],
        }
    }

    pub fn cells(&self) -> usize {
        self.integer.len()
    }

    pub fn get(&self, cell: usize) -> Option<SplitVec3> {
        let integer = self.integer.get(cell).filter(|t| t.is_valid())?;
        let fractional = self.fractional.get(cell)?;
        Some(SplitVec3::from_texels(integer, fractional))
    }

    pub fn texels(&self, cell: usize) -> TexelPair {
        TexelPair {
            integer: self.integer[cell],
            fractional: self.fractional[cell],
        }
    }

    /// Raw native-endian bytes of both buffers, in upload order
    pub fn as_bytes(&self) -> [&[u8]; 2] {
        [
            bytemuck::cast_slice(&self.integer),
            bytemuck::cast_slice(&self.fractional),
        ]
    }

    /// Stores one kernel output per cell; `None` becomes a sentinel.
    pub fn write<I>(&mut self, outputs: I)
    where
        I: IndexedParallelIterator<Item = Option<SplitVec3>>,
    {
        let cells = outputs.len();
        self.integer.resize(cells, Texel::SENTINEL);
        self.fractional.resize(cells, Texel::SENTINEL);

        self.integer
            .par_iter_mut()
            .zip(self.fractional.par_iter_mut())
            .zip(outputs)
            .for_each(|((integer, fractional), output)| {
                (*integer, *fractional) = match output {
                    Some(position) => position.to_texels(),
                    None => (Texel::SENTINEL, Texel::SENTINEL),
                };
            });
    }
}
