use drape_model::{ExtractFlags, ModelSize, ReadAccess, Texel, TexelPair, Vector3F};
use rayon::prelude::*;

use crate::kernels::g_constraint_error;
use crate::model::{Adjacency, PositionPair};

/// Read view over the latest frame, limited to the requested outputs
pub struct Extractor<'a> {
    flags: ExtractFlags,
    vertices: usize,
    positions: &'a PositionPair,
    normals: &'a [Texel],
    /// Filled at creation when [`ExtractFlags::ERROR`] is requested
    errors: Vec<f32>,
}

impl<'a> Extractor<'a> {
    pub(crate) fn new(
        flags: ExtractFlags,
        size: ModelSize,
        positions: &'a PositionPair,
        normals: &'a [Texel],
        adjacency: Adjacency<'a>,
    ) -> Self {
        let vertices = size.vertices as usize;
        let errors = if flags.contains(ExtractFlags::ERROR) {
            let inputs = g_constraint_error::ConstraintErrorInput {
                positions,
                adjacency,
            };
            let mut errors: Vec<f32> = g_constraint_error::constraint_error(&inputs).collect();
            errors.truncate(vertices);
            errors
        } else {
            Vec::new()
        };

        Self {
            flags,
            vertices,
            positions,
            normals,
            errors,
        }
    }

    /// Largest per-vertex constraint error, if errors were requested
    pub fn max_error(&self) -> Option<f32> {
        self.flags
            .contains(ExtractFlags::ERROR)
            .then(|| self.errors.iter().copied().fold(0.0, f32::max))
    }

    /// The underlying buffer pair, for handing straight to a renderer, if requested
    pub fn position_pair(&self) -> Option<&'a PositionPair> {
        self.flags
            .contains(ExtractFlags::POSITION_PAIR)
            .then_some(self.positions)
    }
}

pub struct PositionReader<'a> {
    positions: &'a PositionPair,
    count: usize,
}

impl ReadAccess<Vector3F> for PositionReader<'_> {
    fn get(&self, index: u32) -> Vector3F {
        self.positions
            .get(index as usize)
            .map(|p| Vector3F(p.value().into()))
            .unwrap_or_default()
    }

    fn count(&self) -> usize {
        self.count
    }
}

pub struct PositionPairReader<'a> {
    positions: &'a PositionPair,
    count: usize,
}

impl ReadAccess<TexelPair> for PositionPairReader<'_> {
    fn get(&self, index: u32) -> TexelPair {
        self.positions.texels(index as usize)
    }

    fn count(&self) -> usize {
        self.count
    }
}

pub struct NormalReader<'a>(&'a [Texel]);

impl ReadAccess<Vector3F> for NormalReader<'_> {
    fn get(&self, index: u32) -> Vector3F {
        Vector3F(self.0[index as usize].xyz())
    }

    fn count(&self) -> usize {
        self.0.len()
    }
}

pub struct ErrorReader<'a>(&'a [f32]);

impl ReadAccess<f32> for ErrorReader<'_> {
    fn get(&self, index: u32) -> f32 {
        self.0[index as usize]
    }

    fn count(&self) -> usize {
        self.0.len()
    }

    fn copy_out(&self, out: &mut [f32], offset: usize) -> usize {
        let source = self.0.get(offset..).unwrap_or_default();
        let written = source.len().min(out.len());
        out[..written].copy_from_slice(&source[..written]);
        written
    }
}

impl<'a> drape_model::Extractor for Extractor<'a> {
    fn count_vertices(&self) -> usize {
        self.vertices
    }

    type PositionAccess<'b> = PositionReader<'b> where Self: 'b;
    fn access_position(&self) -> Option<Self::PositionAccess<'_>> {
        self.flags
            .contains(ExtractFlags::POSITION)
            .then_some(PositionReader {
                positions: self.positions,
                count: self.vertices,
            })
    }

    type PositionPairAccess<'b> = PositionPairReader<'b> where Self: 'b;
    fn access_position_pair(&self) -> Option<Self::PositionPairAccess<'_>> {
        self.flags
            .contains(ExtractFlags::POSITION_PAIR)
            .then_some(PositionPairReader {
                positions: self.positions,
                count: self.vertices,
            })
    }

    type NormalAccess<'b> = NormalReader<'b> where Self: 'b;
    fn access_normal(&self) -> Option<Self::NormalAccess<'_>> {
        self.flags
            .contains(ExtractFlags::NORMAL)
            .then(|| NormalReader(&self.normals[..self.vertices.min(self.normals.len())]))
    }

    type ErrorAccess<'b> = ErrorReader<'b> where Self: 'b;
    fn access_error(&self) -> Option<Self::ErrorAccess<'_>> {
        self.flags
            .contains(ExtractFlags::ERROR)
            .then(|| ErrorReader(&self.errors))
    }
}
