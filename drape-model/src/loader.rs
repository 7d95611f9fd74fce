use crate::model::*;

/// A write past the end of a backend buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    pub offset: usize,
    pub len: usize,
    pub capacity: usize,
}

impl core::fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "cannot write {} elements at offset {} into a buffer of capacity {}",
            self.len, self.offset, self.capacity
        )
    }
}

impl core::error::Error for OutOfBounds {}

/// Not object safe
pub trait WriteAccess<T> {
    fn capacity(&self) -> usize;
    fn copy_in(&mut self, from: &[T], offset: u32) -> Result<(), OutOfBounds>;

    fn set(&mut self, index: u32, value: T) -> Result<(), OutOfBounds> {
        self.copy_in(&[value], index)
    }
}

/// Backend-side receiver of a packed topology.
///
/// Rest positions are position-shaped (`ModelSize::cells` texels), adjacency
/// indices and distances are adjacency-shaped (`ModelSize::adjacency_cells`).
pub trait Loader {
    fn model(&self) -> crate::ModelSize;

    type RestPositionAccess<'a>: WriteAccess<Texel> + 'a
    where
        Self: 'a;
    fn access_rest_position(&mut self) -> Self::RestPositionAccess<'_>;

    type AdjacentIndicesAccess<'a>: WriteAccess<Texel> + 'a
    where
        Self: 'a;
    fn access_adjacent_indices(&mut self) -> Self::AdjacentIndicesAccess<'_>;

    type AdjacentDistancesAccess<'a>: WriteAccess<Texel> + 'a
    where
        Self: 'a;
    fn access_adjacent_distances(&mut self) -> Self::AdjacentDistancesAccess<'_>;
}

pub trait LoaderDyn {
    fn model(&self) -> crate::ModelSize;
    fn copy_rest_position(&mut self, from: &[Texel], offset: u32) -> Result<(), OutOfBounds>;
    fn copy_adjacent_indices(&mut self, from: &[Texel], offset: u32) -> Result<(), OutOfBounds>;
    fn copy_adjacent_distances(&mut self, from: &[Texel], offset: u32)
        -> Result<(), OutOfBounds>;
}

static_assertions::assert_obj_safe!(LoaderDyn);

impl<Container> LoaderDyn for Container
where
    Container: Loader,
{
    fn model(&self) -> crate::ModelSize {
        Loader::model(self)
    }

    fn copy_rest_position(&mut self, from: &[Texel], offset: u32) -> Result<(), OutOfBounds> {
        Loader::access_rest_position(self).copy_in(from, offset)
    }

    fn copy_adjacent_indices(&mut self, from: &[Texel], offset: u32) -> Result<(), OutOfBounds> {
        Loader::access_adjacent_indices(self).copy_in(from, offset)
    }

    fn copy_adjacent_distances(
        &mut self,
        from: &[Texel],
        offset: u32,
    ) -> Result<(), OutOfBounds> {
        Loader::access_adjacent_distances(self).copy_in(from, offset)
    }
}

/// [`WriteAccess`] over a plain slice, enough for any backend that keeps its
/// buffers in host memory.
pub struct SliceWriteAccess<'a, T>(pub &'a mut [T]);

impl<T: Copy> WriteAccess<T> for SliceWriteAccess<'_, T> {
    fn capacity(&self) -> usize {
        self.0.len()
    }

    fn copy_in(&mut self, from: &[T], offset: u32) -> Result<(), OutOfBounds> {
        let offset = offset as usize;
        let capacity = self.0.len();
        let error = OutOfBounds {
            offset,
            len: from.len(),
            capacity,
        };
        let end = offset.checked_add(from.len()).ok_or(error)?;
        self.0
            .get_mut(offset..end)
            .ok_or(error)?
            .copy_from_slice(from);
        Ok(())
    }
}
