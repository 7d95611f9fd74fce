use approx::assert_relative_eq;
use drape_core::mesh_importer::{shapes, ImportConfig, ImportError, IndexedMesh};
use drape_core::model::{ExtractFlags, ExtractorDyn, Vector3F};
use drape_core::{
    ExtractError, FrameInteraction, Grab, LoadError, SimulationParameters, Solver, StepError,
};
use nalgebra::Vector3;
use rstest::rstest;

const DT: f32 = 1.0 / 60.0;

static INIT: std::sync::Once = std::sync::Once::new();
fn initialize_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt::init();
    });
}

fn loaded(mesh: &IndexedMesh, parameters: SimulationParameters) -> Solver {
    initialize_tracing();
    let mut solver = Solver::new();
    solver.set_parameters(parameters).unwrap();
    solver.load_mesh(mesh, &ImportConfig::DEFAULT).unwrap();
    solver
}

fn positions(solver: &Solver) -> Vec<Vector3<f32>> {
    let extractor = solver.extract(ExtractFlags::POSITION).unwrap();
    let mut out = vec![Vector3F::default(); extractor.count_vertices()];
    assert!(extractor.copy_position(&mut out, 0));
    out.into_iter().map(|p| Vector3::from(p.0)).collect()
}

fn max_error(solver: &Solver) -> f32 {
    solver
        .extract(ExtractFlags::ERROR)
        .unwrap()
        .max_error()
        .unwrap()
}

fn max_shift(a: &[Vector3<f32>], b: &[Vector3<f32>]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(a, b)| (a - b).amax())
        .fold(0.0, f32::max)
}

fn rest_target(solver: &Solver, vertex: u32, offset: Vector3<f32>) -> FrameInteraction {
    FrameInteraction {
        grab: Some(Grab {
            vertex,
            target: solver.rest_position(vertex).unwrap() + offset,
        }),
        ..Default::default()
    }
}

#[test]
fn resting_tetrahedron_stays_put() {
    let mut solver = loaded(&shapes::tetrahedron(1.0), SimulationParameters::DEFAULT);

    let idle = FrameInteraction::default();
    for frame in 1..=120 {
        let stats = solver.step(DT, &idle).unwrap();
        assert_eq!(stats.frame, frame);
        assert_eq!(stats.iterations, 40);
    }
    let previous = positions(&solver);
    solver.step(DT, &idle).unwrap();

    assert!(max_error(&solver) < 1e-3);
    assert!(max_shift(&previous, &positions(&solver)) < 1e-4);
}

#[test]
fn tetrahedron_settles_after_release() {
    let mut solver = loaded(&shapes::tetrahedron(1.0), SimulationParameters::DEFAULT);

    let pull = rest_target(&solver, 0, Vector3::new(0.0, 0.0, 0.5));
    for _ in 0..10 {
        solver.step(DT, &pull).unwrap();
    }
    let rest: Vec<_> = (0..4).map(|v| solver.rest_position(v).unwrap()).collect();
    assert!(max_shift(&rest, &positions(&solver)) > 0.1);

    let idle = FrameInteraction::default();
    for _ in 0..600 {
        solver.step(DT, &idle).unwrap();
    }
    let previous = positions(&solver);
    solver.step(DT, &idle).unwrap();
    let last = positions(&solver);

    assert!(max_error(&solver) < 1e-3);
    assert!(max_shift(&previous, &last) < 1e-4);
    for (vertex, position) in last.iter().enumerate() {
        let rest = solver.rest_position(vertex as u32).unwrap();
        assert_relative_eq!(*position, rest, epsilon = 1e-3);
    }
}

#[rstest]
#[case::tetrahedron(shapes::tetrahedron(1.0))]
#[case::icosphere(shapes::icosphere(1, 1.0))]
fn grabbed_vertex_reaches_target(#[case] mesh: IndexedMesh) {
    let mut solver = loaded(&mesh, SimulationParameters::DEFAULT);

    let pull = rest_target(&solver, 0, Vector3::new(0.0, 0.0, 1.0));
    let target = pull.grab.unwrap().target;
    for _ in 0..120 {
        let stats = solver.step(DT, &pull).unwrap();
        assert_eq!(stats.grabbed, Some(0));
    }

    assert_relative_eq!(positions(&solver)[0], target, epsilon = 1e-6);
    // the rest of the surface follows through the constraints
    let followed = positions(&solver)
        .iter()
        .enumerate()
        .skip(1)
        .any(|(vertex, p)| p.z > solver.rest_position(vertex as u32).unwrap().z + 0.1);
    assert!(followed);
}

#[test]
fn brush_leaves_distant_vertices_alone() {
    let parameters = SimulationParameters {
        cursor_size: 0.8,
        iteration_count: 0,
        ..SimulationParameters::DEFAULT
    };
    let mut solver = loaded(&shapes::icosphere(1, 1.0), parameters);
    let size = solver.model_size().unwrap();

    let pull = rest_target(&solver, 0, Vector3::new(0.0, 0.0, 0.3));
    solver.step(DT, &pull).unwrap();

    let grabbed_rest = solver.rest_position(0).unwrap();
    let out = positions(&solver);
    let mut touched = 0;
    for vertex in 1..size.vertices {
        let rest = solver.rest_position(vertex).unwrap();
        let position = out[vertex as usize];
        if (rest - grabbed_rest).norm() >= parameters.cursor_size {
            assert_eq!(position, rest, "vertex {vertex} moved outside the brush");
        } else if position != rest {
            touched += 1;
            assert!(position.z > rest.z);
        }
    }
    assert!(touched > 0);
}

#[test]
fn dt_zero_at_equilibrium_changes_nothing() {
    let mut solver = loaded(&shapes::icosphere(1, 1.0), SimulationParameters::DEFAULT);

    let pull = rest_target(&solver, 3, Vector3::new(0.2, 0.0, 0.0));
    for _ in 0..5 {
        solver.step(DT, &pull).unwrap();
    }
    let idle = FrameInteraction::default();
    for _ in 0..600 {
        solver.step(DT, &idle).unwrap();
    }

    let settled = positions(&solver);
    let stats = solver.step(0.0, &idle).unwrap();
    assert_eq!(stats.dt, 0.0);
    assert!(max_shift(&settled, &positions(&solver)) < 1e-5);
}

#[test]
fn large_dt_is_clamped() {
    let mut solver = loaded(&shapes::tetrahedron(1.0), SimulationParameters::DEFAULT);
    let stats = solver.step(0.5, &FrameInteraction::default()).unwrap();
    assert_eq!(stats.dt, drape_core::MAX_DT);

    let stats = solver.step(f32::NAN, &FrameInteraction::default()).unwrap();
    assert_eq!(stats.dt, 0.0);
}

#[test]
fn usage_order_errors() {
    initialize_tracing();
    let mut solver = Solver::new();
    assert_eq!(
        solver.step(DT, &FrameInteraction::default()).unwrap_err(),
        StepError::NotLoaded
    );
    assert_eq!(
        solver.extract(ExtractFlags::ALL).err(),
        Some(ExtractError::NotLoaded)
    );
    assert_eq!(solver.reset(), Err(StepError::NotLoaded));

    solver
        .load_mesh(&shapes::icosahedron(1.0), &ImportConfig::DEFAULT)
        .unwrap();
    assert_eq!(
        solver.extract(ExtractFlags::ALL).err(),
        Some(ExtractError::NotReady)
    );

    solver.step(DT, &FrameInteraction::default()).unwrap();
    assert!(solver.extract(ExtractFlags::ALL).is_ok());
    assert_eq!(solver.frames(), 1);

    solver.reset().unwrap();
    assert_eq!(solver.frames(), 0);
    assert_eq!(
        solver.extract(ExtractFlags::ALL).err(),
        Some(ExtractError::NotReady)
    );

    solver.unload();
    assert!(!solver.loaded());
}

#[test]
fn open_mesh_is_rejected() {
    initialize_tracing();
    let open = IndexedMesh::new(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        vec![[0, 1, 2]],
    );

    let mut solver = Solver::new();
    let error = solver.load_mesh(&open, &ImportConfig::DEFAULT).unwrap_err();
    assert!(matches!(
        error,
        LoadError::Import(ImportError::OpenFan { .. })
    ));
    assert!(!solver.loaded());
}

#[test]
fn parameters_survive_reload() {
    initialize_tracing();
    let mut solver = Solver::new();
    let parameters = SimulationParameters {
        iteration_count: 7,
        ..SimulationParameters::DEFAULT
    };
    solver.set_parameters(parameters).unwrap();
    solver
        .load_mesh(&shapes::tetrahedron(1.0), &ImportConfig::DEFAULT)
        .unwrap();

    let stats = solver.step(DT, &FrameInteraction::default()).unwrap();
    assert_eq!(stats.iterations, 7);

    let rejected = SimulationParameters {
        mass: 0.0,
        ..parameters
    };
    assert!(solver.set_parameters(rejected).is_err());
    assert_eq!(*solver.parameters(), parameters);
}

#[test]
fn position_pair_bytes_follow_the_flags() {
    let mut solver = loaded(&shapes::icosahedron(1.0), SimulationParameters::DEFAULT);
    solver.step(DT, &FrameInteraction::default()).unwrap();
    let cells = solver.model_size().unwrap().cells();

    let extractor = solver.extract(ExtractFlags::POSITION).unwrap();
    assert!(extractor.position_pair_bytes().is_none());

    let extractor = solver.extract(ExtractFlags::POSITION_PAIR).unwrap();
    let [coarse, residual] = extractor.position_pair_bytes().unwrap();
    assert_eq!(coarse.len(), cells * 16);
    assert_eq!(residual.len(), cells * 16);

    // first cell holds vertex 0 at rest, flagged valid
    let x = f32::from_ne_bytes(coarse[0..4].try_into().unwrap());
    let flag = f32::from_ne_bytes(coarse[12..16].try_into().unwrap());
    assert_eq!(x, solver.rest_position(0).unwrap().x);
    assert_eq!(flag, 1.0);
}
