//! Runs a scripted drag over a procedural mesh and prints a JSON report.
//!
//!     drape [tetrahedron|icosahedron|icosphere[:N]|cylinder] [FRAMES] [--params FILE] [--dump FILE]
//!
//! `--params` reads a JSON object overriding any subset of the simulation
//! parameters (`tension`, `mass`, `dampingRatio`, `cursorSize`, `iterationCount`).
//! `--dump` writes the final position pair as raw native-endian texels:
//! every coarse texel, then every residual texel.
//! Logging is controlled through `RUST_LOG`.
use std::{env, fs, io::Write};

use drape_core::mesh_importer::{shapes, ImportConfig, IndexedMesh};
use drape_core::model::{cell_coordinates, ExtractFlags};
use drape_core::{DragInteraction, InteractionSource, SimulationParameters, Solver};
use nalgebra::Vector3;
use tracing_subscriber::EnvFilter;

const DT: f32 = 1.0 / 60.0;
/// Frame at which the scripted drag starts
const DRAG_START: u32 = 10;

struct Arguments {
    shape: String,
    frames: u32,
    params: Option<String>,
    dump: Option<String>,
}

fn parse_arguments() -> Result<Arguments, Box<dyn std::error::Error>> {
    let mut arguments = Arguments {
        shape: "icosphere".to_string(),
        frames: 240,
        params: None,
        dump: None,
    };

    let mut positional = 0;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--params" => arguments.params = Some(args.next().ok_or("--params needs a file")?),
            "--dump" => arguments.dump = Some(args.next().ok_or("--dump needs a file")?),
            _ if positional == 0 => {
                arguments.shape = arg;
                positional += 1;
            }
            _ if positional == 1 => {
                arguments.frames = arg.parse()?;
                positional += 1;
            }
            _ => return Err(format!("unexpected argument {arg:?}").into()),
        }
    }
    Ok(arguments)
}

fn build_shape(name: &str) -> Result<IndexedMesh, Box<dyn std::error::Error>> {
    let (kind, detail) = match name.split_once(':') {
        Some((kind, detail)) => (kind, Some(detail.parse::<u32>()?)),
        None => (name, None),
    };

    match kind {
        "tetrahedron" => Ok(shapes::tetrahedron(1.0)),
        "icosahedron" => Ok(shapes::icosahedron(1.0)),
        "icosphere" => Ok(shapes::icosphere(detail.unwrap_or(3), 1.0)),
        "cylinder" => Ok(shapes::capped_cylinder(detail.unwrap_or(24), 8, 0.5, 1.5)),
        _ => Err(format!("unknown shape {kind:?}").into()),
    }
}

fn read_parameters(path: &str) -> Result<SimulationParameters, Box<dyn std::error::Error>> {
    let source = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&source)?)
}

/// Frame at which the scripted drag is released, two thirds into the run
fn drag_end(frames: u32) -> u32 {
    DRAG_START.saturating_add(frames / 3 * 2)
}

/// Where the drag point sits `t` seconds after the drag began
fn drag_point(rest: Vector3<f32>, t: f32) -> Vector3<f32> {
    // Out along the normal first, then swinging inward across the surface
    let outward = rest.normalize();
    let sideways = outward.cross(&Vector3::z()).try_normalize(f32::EPSILON).unwrap_or(Vector3::x());
    rest + outward * (0.4 * (t * 2.0).sin()) + sideways * (0.3 * t.sin())
}

fn dump(path: &str, buffers: [&[u8]; 2]) -> std::io::Result<()> {
    let mut file = std::io::BufWriter::new(fs::File::create(path)?);
    for buffer in buffers {
        file.write_all(buffer)?;
    }
    file.flush()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let arguments = parse_arguments()?;
    let mesh = build_shape(&arguments.shape)?;

    let mut solver = Solver::new();
    if let Some(path) = &arguments.params {
        solver.set_parameters(read_parameters(path)?)?;
    }
    let size = solver.load_mesh(&mesh, &ImportConfig::DEFAULT)?;
    let grabbed = 0;
    let rest = solver
        .rest_position(grabbed)
        .ok_or("mesh has no vertex to drag")?;

    let drag_end = drag_end(arguments.frames);
    let mut drag = DragInteraction::new();
    for frame in 0..arguments.frames {
        if frame == DRAG_START {
            drag.begin(grabbed, rest, rest);
        } else if frame == drag_end {
            drag.end();
        } else if drag.is_dragging() {
            drag.drag_to(drag_point(rest, (frame - DRAG_START) as f32 * DT));
        }
        drag.update();

        let stats = solver.step(DT, &drag)?;
        if stats.frame % 30 == 0 {
            let error = solver.extract(ExtractFlags::ERROR)?.max_error();
            tracing::event!(
                tracing::Level::INFO,
                frame = stats.frame,
                grabbed = ?stats.grabbed,
                rotation = drag.rotation().angle(),
                max_error = ?error,
                "stepped"
            );
        }
    }

    let extractor = solver.extract(ExtractFlags::ALL)?;
    let max_error = extractor.max_error();
    if let Some(path) = &arguments.dump {
        let buffers = extractor
            .position_pair_bytes()
            .ok_or("position pair was not extracted")?;
        dump(path, buffers)?;
        tracing::event!(tracing::Level::INFO, path = path.as_str(), cells = size.cells(), "dumped position pair");
    }

    let transform = drag.transform();
    let report = serde_json::json!({
        "shape": arguments.shape,
        "vertices": size.vertices,
        "resolution": size.resolution,
        "adjacencyLayers": size.adjacency_layers,
        "maxRing": size.max_ring,
        "grabbedCell": cell_coordinates(grabbed, size.resolution),
        "frames": solver.frames(),
        "parameters": solver.parameters(),
        "damping": solver.parameters().damping(),
        "maxError": max_error,
        "rotationAngle": transform.rotation.angle(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_release_never_overflows() {
        assert_eq!(drag_end(240), DRAG_START + 160);
        assert_eq!(drag_end(0), DRAG_START);
        assert_eq!(drag_end(u32::MAX), u32::MAX / 3 * 2 + DRAG_START);
    }
}
