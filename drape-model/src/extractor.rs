use crate::model::*;

pub trait ReadAccess<T> {
    fn get(&self, index: u32) -> T;

    fn count(&self) -> usize;

    /// Copies `out.len()` elements starting at `offset`, clamped to `count()`.
    /// Returns how many were written.
    fn copy_out(&self, out: &mut [T], offset: usize) -> usize {
        let available = self.count().saturating_sub(offset);
        let written = available.min(out.len());
        for (i, slot) in out.iter_mut().take(written).enumerate() {
            *slot = self.get((offset + i) as u32);
        }
        written
    }
}

/// Raw coarse and residual texels of one vertex
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexelPair {
    pub integer: Texel,
    pub fractional: Texel,
}

impl Default for TexelPair {
    fn default() -> Self {
        Self {
            integer: Texel::SENTINEL,
            fractional: Texel::SENTINEL,
        }
    }
}

/// Read side of a backend. Each accessor is `None` when the matching
/// [`crate::ExtractFlags`] bit was not requested.
pub trait Extractor {
    fn count_vertices(&self) -> usize;

    type PositionAccess<'a>: ReadAccess<Vector3F>
    where
        Self: 'a;
    fn access_position(&self) -> Option<Self::PositionAccess<'_>>;

    type PositionPairAccess<'a>: ReadAccess<TexelPair>
    where
        Self: 'a;
    fn access_position_pair(&self) -> Option<Self::PositionPairAccess<'_>>;

    type NormalAccess<'a>: ReadAccess<Vector3F>
    where
        Self: 'a;
    fn access_normal(&self) -> Option<Self::NormalAccess<'_>>;

    type ErrorAccess<'a>: ReadAccess<f32>
    where
        Self: 'a;
    fn access_error(&self) -> Option<Self::ErrorAccess<'_>>;
}

/// Object-safe [`Extractor`]; each copy returns `false` when the output was not requested.
pub trait ExtractorDyn {
    fn count_vertices(&self) -> usize;
    fn copy_position(&self, to: &mut [Vector3F], from: VertexIndex) -> bool;
    fn copy_position_pair(&self, to: &mut [TexelPair], from: VertexIndex) -> bool;
    fn copy_normal(&self, to: &mut [Vector3F], from: VertexIndex) -> bool;
    fn copy_error(&self, to: &mut [f32], from: VertexIndex) -> bool;
}

static_assertions::assert_obj_safe!(ExtractorDyn);

impl<Container> ExtractorDyn for Container
where
    Container: Extractor,
{
    fn count_vertices(&self) -> usize {
        Extractor::count_vertices(self)
    }

    fn copy_position(&self, to: &mut [Vector3F], from: VertexIndex) -> bool {
        self.access_position()
            .map(|a| a.copy_out(to, from as usize))
            .is_some()
    }

    fn copy_position_pair(&self, to: &mut [TexelPair], from: VertexIndex) -> bool {
        self.access_position_pair()
            .map(|a| a.copy_out(to, from as usize))
            .is_some()
    }

    fn copy_normal(&self, to: &mut [Vector3F], from: VertexIndex) -> bool {
        self.access_normal()
            .map(|a| a.copy_out(to, from as usize))
            .is_some()
    }

    fn copy_error(&self, to: &mut [f32], from: VertexIndex) -> bool {
        self.access_error()
            .map(|a| a.copy_out(to, from as usize))
            .is_some()
    }
}
