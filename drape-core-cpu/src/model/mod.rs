use core::ops::{Deref, DerefMut};

use drape_model::{ModelSize, Texel};

mod arena;
pub use arena::*;

mod position_pair;
pub use position_pair::*;

mod split;
pub use split::*;

use crate::parameters::{SimulationParameters, Uniforms};

/// Geometry Data: loaded once, read by every frame
#[derive(Debug, Default)]
#[repr(transparent)]
pub struct GeometryData<T>(pub Vec<T>);

impl<T> Deref for GeometryData<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for GeometryData<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Parameter Data: can be marked as dirty
#[derive(Debug, Default)]
pub struct ParameterData<T> {
    pub data: T,
    pub dirty: bool,
}

impl<T> Deref for ParameterData<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// Scratch Data: rewritten every frame, never carried over
#[derive(Debug, Default)]
#[repr(transparent)]
pub struct ScratchData<T>(pub Vec<T>);

impl<T> Deref for ScratchData<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for ScratchData<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Adjacency-shaped buffers, seen through the layer/channel addressing
#[derive(Debug, Clone, Copy)]
pub struct Adjacency<'backer> {
    pub indices: &'backer [Texel],
    pub distances: &'backer [Texel],
    pub layers: usize,
    pub cells: usize,
}

impl<'backer> Adjacency<'backer> {
    pub fn new(indices: &'backer [Texel], distances: &'backer [Texel], size: &ModelSize) -> Self {
        Self {
            indices,
            distances,
            layers: size.adjacency_layers as usize,
            cells: size.cells(),
        }
    }
}

#[derive(Debug)]
pub struct State {
    pub size: ModelSize,

    /* Per-cell: RO geometry */
    pub rest_position: GeometryData<Texel>,

    /* Per-slot: RO geometry */
    pub adjacent_indices: GeometryData<Texel>,
    pub adjacent_distances: GeometryData<Texel>,

    pub parameters: ParameterData<SimulationParameters>,
    pub uniforms: Uniforms,

    /* Per-cell: scratch */
    pub normals: ScratchData<Texel>,
}

impl State {
    pub fn with_size(size: ModelSize) -> Self {
        let parameters = SimulationParameters::DEFAULT;
        Self {
            size,
            rest_position: GeometryData(vec![Texel::SENTINEL; size.cells()]),
            adjacent_indices: GeometryData(vec![Texel::SENTINEL; size.adjacency_cells()]),
            adjacent_distances: GeometryData(vec![Texel::SENTINEL; size.adjacency_cells()]),
            uniforms: Uniforms::from(&parameters),
            parameters: ParameterData {
                data: parameters,
                dirty: false,
            },
            normals: ScratchData(vec![Texel::SENTINEL; size.cells()]),
        }
    }

    /// Re-derives the uniforms if the parameters changed since the last frame.
    pub fn refresh_uniforms(&mut self) {
        if !self.parameters.dirty {
            return;
        }

        self.uniforms = Uniforms::from(&self.parameters.data);
        self.parameters.dirty = false;
        tracing::event!(
            tracing::Level::DEBUG,
            damping = self.uniforms.integrate.damping,
            iterations = self.uniforms.iteration_count,
            "re-derived uniforms"
        );
    }
}
