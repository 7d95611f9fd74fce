pub mod interaction;
pub mod solver;

pub use drape_core_cpu::{FrameStats, Grab, ParameterError, SimulationParameters, MAX_DT};
pub use drape_mesh_importer as mesh_importer;
pub use drape_model as model;

pub use interaction::{DragInteraction, FrameInteraction, InteractionSource};
pub use solver::{ExtractError, Extractor, LoadError, Solver, StepError};
