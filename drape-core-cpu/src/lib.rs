//! CPU backend: every pass runs over all cells with rayon, between passes the
//! position pairs live in a [`model::PairArena`].
use drape_model::{ExtractFlags, ModelSize, VertexIndex};
use nalgebra::{Isometry3, Vector3};

mod extractor;
mod kernels;
mod loader;
pub mod model;
pub mod parameters;
mod process;

pub use extractor::*;
pub use parameters::{ParameterError, SimulationParameters};
pub use process::{clamp_dt, MAX_DT};

use model::{ArenaError, PairArena, PositionPair, State};
use process::Carried;

/// A vertex held by the user, and where it is being dragged
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grab {
    pub vertex: VertexIndex,
    pub target: Vector3<f32>,
}

/// Everything a frame consumes besides the loaded topology and the parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Seconds since the previous frame, clamped to [`MAX_DT`]
    pub dt: f32,
    pub grab: Option<Grab>,
    pub transform: Isometry3<f32>,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            dt: 0.0,
            grab: None,
            transform: Isometry3::identity(),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// 1 for the first frame
    pub frame: u64,
    /// Integrated time step, after clamping
    pub dt: f32,
    pub iterations: u32,
    pub grabbed: Option<VertexIndex>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameState {
    First,
    Steady(Carried),
}

#[derive(Debug)]
pub struct Runner {
    state: State,
    arena: PairArena,
    frame_state: FrameState,
    frames: u64,
}

impl Runner {
    pub fn with_size(size: ModelSize) -> Self {
        Self {
            state: State::with_size(size),
            arena: PairArena::with_cells(size.cells()),
            frame_state: FrameState::First,
            frames: 0,
        }
    }

    pub fn model_size(&self) -> ModelSize {
        self.state.size
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.state.parameters
    }

    /// Takes effect at the start of the next frame.
    pub fn set_parameters(&mut self, parameters: SimulationParameters) -> Result<(), ParameterError> {
        parameters.validate()?;
        if parameters != self.state.parameters.data {
            self.state.parameters.data = parameters;
            self.state.parameters.dirty = true;
        }
        Ok(())
    }

    pub fn rest_position(&self, vertex: VertexIndex) -> Option<Vector3<f32>> {
        if vertex >= self.state.size.vertices {
            return None;
        }
        self.state
            .rest_position
            .get(vertex as usize)
            .filter(|texel| texel.is_valid())
            .map(|texel| Vector3::from(texel.xyz()))
    }

    /// Drops the simulated state; the next frame starts from the rest pose again.
    pub fn reset(&mut self) {
        self.frame_state = FrameState::First;
        self.frames = 0;
    }

    fn checked_grab(&self, grab: Option<Grab>) -> Option<Grab> {
        let grab = grab?;
        if self.rest_position(grab.vertex).is_none() {
            tracing::event!(
                tracing::Level::WARN,
                vertex = grab.vertex,
                vertices = self.state.size.vertices,
                "ignoring grab of a vertex outside the mesh"
            );
            return None;
        }
        if grab.target.iter().any(|c| !c.is_finite()) {
            tracing::event!(
                tracing::Level::WARN,
                vertex = grab.vertex,
                "ignoring grab with a non-finite target"
            );
            return None;
        }
        Some(grab)
    }

    pub fn step(&mut self, input: &FrameInput) -> Result<FrameStats, ArenaError> {
        self.state.refresh_uniforms();

        let dt = clamp_dt(input.dt);
        let grab = self.checked_grab(input.grab);
        let read_only = process::ReadOnlyInput {
            rest_position: &self.state.rest_position,
            adjacency: model::Adjacency::new(
                &self.state.adjacent_indices,
                &self.state.adjacent_distances,
                &self.state.size,
            ),
            uniforms: self.state.uniforms,
            dt,
            grab,
            transform: input.transform,
        };
        let mut scratch = process::ScratchInput {
            normals: &mut self.state.normals,
        };

        let carried = match self.frame_state {
            FrameState::First => None,
            FrameState::Steady(carried) => Some(carried),
        };
        let carried = process::process(&read_only, &mut scratch, &mut self.arena, carried)?;

        self.frame_state = FrameState::Steady(carried);
        self.frames += 1;
        Ok(FrameStats {
            frame: self.frames,
            dt,
            iterations: self.state.uniforms.iteration_count,
            grabbed: grab.map(|g| g.vertex),
        })
    }

    /// The latest solved position pair, `None` before the first frame
    pub fn output(&self) -> Option<&PositionPair> {
        match self.frame_state {
            FrameState::First => None,
            FrameState::Steady(carried) => self.arena.get(carried.solved).ok(),
        }
    }

    /// `None` before the first frame
    pub fn extract(&self, flags: ExtractFlags) -> Option<Extractor<'_>> {
        let positions = self.output()?;
        Some(Extractor::new(
            flags,
            self.state.size,
            positions,
            &self.state.normals,
            model::Adjacency::new(
                &self.state.adjacent_indices,
                &self.state.adjacent_distances,
                &self.state.size,
            ),
        ))
    }
}
