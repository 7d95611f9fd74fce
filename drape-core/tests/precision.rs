//! Long runs far from the origin, checked against a double precision rendition
//! of the same frame.
use drape_core::mesh_importer::{extract_topology, shapes, ImportConfig, PackedTopology};
use drape_core::model::{ExtractFlags, ExtractorDyn, TexelPair};
use drape_core::{FrameInteraction, Grab, SimulationParameters, Solver, MAX_DT};
use nalgebra::Vector3;

const OFFSET: [f32; 3] = [1000.0, -250.0, 3.0];

static INIT: std::sync::Once = std::sync::Once::new();
fn initialize_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt::init();
    });
}

struct Reference {
    rest: Vec<Vector3<f64>>,
    rings: Vec<Vec<(usize, f64)>>,
    previous: Vec<Vector3<f64>>,
    current: Vec<Vector3<f64>>,
}

impl Reference {
    fn new(topology: &PackedTopology) -> Self {
        let vertices = topology.size.vertices;
        let rest: Vec<Vector3<f64>> = (0..vertices)
            .map(|v| Vector3::from(topology.rest_position(v).unwrap()).cast())
            .collect();
        let rings = (0..vertices)
            .map(|v| {
                topology
                    .ring(v)
                    .map(|(n, d)| (n as usize, f64::from(d)))
                    .collect()
            })
            .collect();
        Self {
            previous: rest.clone(),
            current: rest.clone(),
            rest,
            rings,
        }
    }

    fn step(&mut self, dt: f32, grab: Option<Grab>, parameters: &SimulationParameters) {
        let dt = f64::from(dt.clamp(0.0, MAX_DT));
        let tension = f64::from(parameters.tension);
        let mass = f64::from(parameters.mass);
        let damping = 2.0 * (tension * mass).sqrt() * f64::from(parameters.damping_ratio);
        let carry = 1.0 - damping * dt / mass;
        let pull = tension / mass * dt * dt;

        let mut positions: Vec<Vector3<f64>> = if dt > 0.0 {
            (0..self.rest.len())
                .map(|v| {
                    let x = self.current[v];
                    x + (x - self.previous[v]) * carry + (self.rest[v] - x) * pull
                })
                .collect()
        } else {
            self.current.clone()
        };
        let snapshot = self.current.clone();

        let pinned = grab.map(|grab| {
            positions[grab.vertex as usize] = grab.target.cast();
            grab.vertex as usize
        });

        for _ in 0..parameters.iteration_count {
            positions = (0..positions.len())
                .map(|v| {
                    let x = positions[v];
                    if pinned == Some(v) {
                        return x;
                    }
                    let corrections: Vec<Vector3<f64>> = self.rings[v]
                        .iter()
                        .map(|&(n, rest)| {
                            let delta = positions[n] - x;
                            delta * ((1.0 - rest / delta.norm()) * 0.5)
                        })
                        .collect();
                    x + corrections.iter().sum::<Vector3<f64>>() / corrections.len() as f64
                })
                .collect();
        }

        self.previous = snapshot;
        self.current = positions;
    }
}

fn solver_positions(solver: &Solver) -> Vec<Vector3<f64>> {
    let extractor = solver.extract(ExtractFlags::POSITION_PAIR).unwrap();
    let mut pairs = vec![TexelPair::default(); extractor.count_vertices()];
    assert!(extractor.copy_position_pair(&mut pairs, 0));
    pairs
        .iter()
        .map(|pair| {
            Vector3::from(pair.integer.xyz()).cast::<f64>()
                + Vector3::from(pair.fractional.xyz()).cast::<f64>()
        })
        .collect()
}

fn deviation(a: &[Vector3<f64>], b: &[Vector3<f64>]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(a, b)| (a - b).amax())
        .fold(0.0, f64::max)
}

#[test]
fn split_positions_track_double_precision() {
    initialize_tracing();

    let mut mesh = shapes::icosphere(1, 1.0);
    for position in mesh.positions.iter_mut() {
        let shifted = Vector3::from(*position) + Vector3::from(OFFSET);
        *position = shifted.into();
    }
    let topology = extract_topology(&mesh, &ImportConfig::DEFAULT).unwrap();
    let vertices = topology.size.vertices;

    let parameters = SimulationParameters {
        cursor_size: 0.0,
        ..SimulationParameters::DEFAULT
    };
    let mut solver = Solver::new();
    solver.set_parameters(parameters).unwrap();
    solver.load_topology(&topology).unwrap();
    let mut reference = Reference::new(&topology);

    let mut worst = 0.0f64;
    for frame in 0..10_000u32 {
        // an occasional stall, clamped on both sides
        let dt = if frame % 997 == 0 { 0.2 } else { 1.0 / 60.0 };
        let grab = (frame % 400 < 120).then(|| {
            let vertex = (frame / 400) % vertices;
            let wobble = Vector3::new((frame as f32 * 0.05).sin() * 0.2, 0.1, 0.3);
            Grab {
                vertex,
                target: Vector3::from(topology.rest_position(vertex).unwrap()) + wobble,
            }
        });

        let interaction = FrameInteraction {
            grab,
            ..Default::default()
        };
        solver.step(dt, &interaction).unwrap();
        reference.step(dt, grab, &parameters);

        let error = deviation(&solver_positions(&solver), &reference.current);
        worst = worst.max(error);
        assert!(error < 5e-4, "frame {frame}: drifted by {error}");
    }

    let error = deviation(&solver_positions(&solver), &reference.current);
    assert!(error < 1e-4, "ended {error} away, worst was {worst}");
}
