use drape_core_cpu::{
    model::ArenaError, FrameInput, FrameStats, ParameterError, Runner, SimulationParameters,
};
use drape_mesh_importer::{ImportConfig, ImportError, MeshInput, PackedTopology};
use drape_model::{ExtractFlags, ModelSize, TexelPair, Vector3F, VertexIndex};
use nalgebra::Vector3;

use crate::interaction::InteractionSource;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum LoadError {
    /// The mesh could not be turned into a packed topology
    #[error("import failed: {0}")]
    Import(#[from] ImportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    /// No mesh was loaded
    #[error("no mesh is loaded")]
    NotLoaded,
    /// Buffer bookkeeping went wrong inside the pipeline
    #[error("pipeline failed: {0}")]
    Pipeline(#[from] ArenaError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// No mesh was loaded
    #[error("no mesh is loaded")]
    NotLoaded,
    /// A mesh is loaded but no frame has been stepped since
    #[error("no frame has been computed yet")]
    NotReady,
}

/// Cloth solver over a single closed mesh
#[derive(Debug, Default)]
pub struct Solver {
    runner: Option<Runner>,
    parameters: SimulationParameters,
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded(&self) -> bool {
        self.runner.is_some()
    }

    /// Extracts the topology of `mesh` and replaces whatever was loaded.
    #[tracing::instrument(skip_all)]
    pub fn load_mesh<I>(&mut self, mesh: &I, config: &ImportConfig) -> Result<ModelSize, LoadError>
    where
        I: MeshInput + ?Sized,
    {
        let runner = drape_mesh_importer::import(Runner::with_size, mesh, config)?;
        Ok(self.install(runner))
    }

    /// Loads a topology extracted earlier with [`drape_mesh_importer::extract_topology`].
    pub fn load_topology(&mut self, topology: &PackedTopology) -> Result<ModelSize, LoadError> {
        let mut runner = Runner::with_size(topology.size);
        topology.load(&mut runner)?;
        Ok(self.install(runner))
    }

    fn install(&mut self, mut runner: Runner) -> ModelSize {
        // Already validated by `set_parameters`
        if let Err(error) = runner.set_parameters(self.parameters) {
            tracing::event!(tracing::Level::ERROR, %error, "kept default parameters");
        }

        let size = runner.model_size();
        tracing::event!(
            tracing::Level::INFO,
            vertices = size.vertices,
            resolution = size.resolution,
            max_ring = size.max_ring,
            "loaded mesh"
        );
        self.runner = Some(runner);
        size
    }

    pub fn unload(&mut self) {
        self.runner = None;
    }

    /// Frames stepped since the last load or reset
    pub fn frames(&self) -> u64 {
        self.runner.as_ref().map_or(0, Runner::frames)
    }

    pub fn model_size(&self) -> Option<ModelSize> {
        self.runner.as_ref().map(Runner::model_size)
    }

    pub fn rest_position(&self, vertex: VertexIndex) -> Option<Vector3<f32>> {
        self.runner.as_ref()?.rest_position(vertex)
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.parameters
    }

    /// Validated now, applied from the next frame on.
    pub fn set_parameters(&mut self, parameters: SimulationParameters) -> Result<(), ParameterError> {
        parameters.validate()?;
        self.parameters = parameters;
        if let Some(runner) = self.runner.as_mut() {
            runner.set_parameters(parameters)?;
        }
        Ok(())
    }

    /// Advances one frame of `dt` seconds (clamped to [`crate::MAX_DT`]).
    pub fn step<S>(&mut self, dt: f32, interaction: &S) -> Result<FrameStats, StepError>
    where
        S: InteractionSource + ?Sized,
    {
        let runner = self.runner.as_mut().ok_or(StepError::NotLoaded)?;
        let input = FrameInput {
            dt,
            grab: interaction.grab(),
            transform: interaction.transform(),
        };
        Ok(runner.step(&input)?)
    }

    /// Returns the surface to its rest pose; the next frame runs as a first frame.
    pub fn reset(&mut self) -> Result<(), StepError> {
        self.runner
            .as_mut()
            .ok_or(StepError::NotLoaded)
            .map(Runner::reset)
    }

    pub fn extract(&self, extract_flags: ExtractFlags) -> Result<Extractor<'_>, ExtractError> {
        let runner = self.runner.as_ref().ok_or(ExtractError::NotLoaded)?;
        runner
            .extract(extract_flags)
            .map(Extractor::CPU)
            .ok_or(ExtractError::NotReady)
    }
}

pub enum Extractor<'borrow> {
    CPU(drape_core_cpu::Extractor<'borrow>),
}

impl Extractor<'_> {
    /// Worst relative edge-length error, when [`ExtractFlags::ERROR`] was requested
    pub fn max_error(&self) -> Option<f32> {
        match self {
            Self::CPU(inner) => inner.max_error(),
        }
    }

    /// Raw bytes of the coarse and residual buffers, when [`ExtractFlags::POSITION_PAIR`] was requested
    pub fn position_pair_bytes(&self) -> Option<[&[u8]; 2]> {
        match self {
            Self::CPU(inner) => inner.position_pair().map(|pair| pair.as_bytes()),
        }
    }
}

impl drape_model::ExtractorDyn for Extractor<'_> {
    fn count_vertices(&self) -> usize {
        match self {
            Self::CPU(inner) => drape_model::Extractor::count_vertices(inner),
        }
    }

    fn copy_position(&self, to: &mut [Vector3F], from: VertexIndex) -> bool {
        match self {
            Self::CPU(inner) => drape_model::ExtractorDyn::copy_position(inner, to, from),
        }
    }

    fn copy_position_pair(&self, to: &mut [TexelPair], from: VertexIndex) -> bool {
        match self {
            Self::CPU(inner) => drape_model::ExtractorDyn::copy_position_pair(inner, to, from),
        }
    }

    fn copy_normal(&self, to: &mut [Vector3F], from: VertexIndex) -> bool {
        match self {
            Self::CPU(inner) => drape_model::ExtractorDyn::copy_normal(inner, to, from),
        }
    }

    fn copy_error(&self, to: &mut [f32], from: VertexIndex) -> bool {
        match self {
            Self::CPU(inner) => drape_model::ExtractorDyn::copy_error(inner, to, from),
        }
    }
}
