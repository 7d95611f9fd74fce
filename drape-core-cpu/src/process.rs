use drape_model::Texel;
use nalgebra::Isometry3;
use rayon::prelude::*;

use crate::kernels::{
    a_initialize, b_integrate, c_snapshot, d_external_force, e_solve_constraints, f_normals,
};
use crate::model::{Adjacency, ArenaError, PairArena, PairHandle, Slot};
use crate::parameters::Uniforms;
use crate::Grab;

/// Longest step a single frame may integrate, in seconds
pub const MAX_DT: f32 = 1.0 / 30.0;

/// Clamps into `[0, MAX_DT]`; NaN and infinities count as no time passing.
pub fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, MAX_DT)
    } else {
        0.0
    }
}

#[derive(Debug)]
pub struct ReadOnlyInput<'backer> {
    /* Per-cell: RO geometry */
    pub rest_position: &'backer [Texel],
    /* Per-slot: RO geometry */
    pub adjacency: Adjacency<'backer>,

    pub uniforms: Uniforms,
    pub dt: f32,
    pub grab: Option<Grab>,
    pub transform: Isometry3<f32>,
}

#[derive(Debug)]
pub struct ScratchInput<'backer> {
    pub normals: &'backer mut [Texel],
}

/// Handles a frame leaves behind for the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carried {
    /// Integrate's "previous"
    pub snapshot: PairHandle,
    /// Integrate's "current", and the frame's output
    pub solved: PairHandle,
}

/// Runs every pass of one frame, in order.
///
/// Without `carried` (first frame) the rest pose is used as both previous and current state.
#[tracing::instrument(level = "trace", skip_all, fields(first = carried.is_none()))]
pub fn process(
    input: &ReadOnlyInput,
    scratch: &mut ScratchInput,
    arena: &mut PairArena,
    carried: Option<Carried>,
) -> Result<Carried, ArenaError> {
    let (previous, current) = match carried {
        Some(Carried { snapshot, solved }) => (snapshot, solved),
        None => {
            let seeded = arena.produce(Slot::RelaxFront, [], |[], out| {
                let inputs = a_initialize::InitializeInput {
                    rest_position: input.rest_position,
                };
                out.write(a_initialize::initialize(&inputs));
            })?;
            (seeded, seeded)
        }
    };

    let integrated = arena.produce(
        Slot::Integrated,
        [previous, current],
        |[previous, current], out| {
            let inputs = b_integrate::IntegrateInput {
                rest_position: input.rest_position,
                previous,
                current,
                transform: input.transform,
                uniforms: input.uniforms.integrate,
                dt: input.dt,
            };
            out.write(b_integrate::integrate(&inputs));
        },
    )?;

    let snapshot = arena.produce(Slot::Snapshot, [current], |[current], out| {
        out.write(c_snapshot::snapshot(current));
    })?;

    let forced = arena.produce(Slot::Forced, [integrated], |[positions], out| {
        let inputs = d_external_force::ExternalForceInput {
            rest_position: input.rest_position,
            positions,
            grab: input.grab,
            cursor_size: input.uniforms.cursor_size,
        };
        out.write(d_external_force::apply_external_force(&inputs));
    })?;

    let pinned = input.grab.map(|grab| grab.vertex as usize);
    let mut solved = forced;
    for iteration in 0..input.uniforms.iteration_count {
        let target = if iteration % 2 == 0 {
            Slot::RelaxFront
        } else {
            Slot::RelaxBack
        };
        solved = arena.produce(target, [solved], |[positions], out| {
            let inputs = e_solve_constraints::SolveInput {
                positions,
                adjacency: input.adjacency,
                pinned,
            };
            out.write(e_solve_constraints::relax(&inputs));
        })?;
    }

    let inputs = f_normals::NormalInput {
        positions: arena.get(solved)?,
        adjacency: input.adjacency,
    };
    scratch
        .normals
        .par_iter_mut()
        .zip(f_normals::compute_normals(&inputs))
        .for_each(|(normal, computed)| *normal = computed);

    Ok(Carried { snapshot, solved })
}
