use std::collections::HashMap;

use drape_model::VertexIndex;

use crate::input::{MeshInput, Vector3F, Vector3U};
use crate::ImportError;

/// Deduplicated vertex set, with triangles re-indexed into it
#[derive(Debug, Clone, PartialEq)]
pub struct Welded {
    pub positions: Vec<Vector3F>,
    pub triangles: Vec<Vector3U>,
    /// Authored vertex index to welded vertex index
    pub remap: Vec<VertexIndex>,
}

fn quantize(position: Vector3F, tolerance: f64) -> [i64; 3] {
    position.map(|c| (f64::from(c) / tolerance).round() as i64)
}

/// Merges vertices that quantize to the same `tolerance` grid point.
///
/// The first vertex to reach a grid point keeps its position, and welded vertices
/// are numbered in order of first appearance. Triangles that collapse (two corners
/// welded together) are dropped.
pub fn weld<I>(input: &I, tolerance: f32) -> Result<Welded, ImportError>
where
    I: MeshInput + ?Sized,
{
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(ImportError::InvalidTolerance { tolerance });
    }
    let tolerance = f64::from(tolerance);

    let authored = input.positions();
    let mut grid: HashMap<[i64; 3], VertexIndex> = HashMap::with_capacity(authored.len());
    let mut positions = Vec::with_capacity(authored.len());
    let mut remap = Vec::with_capacity(authored.len());

    for (vertex, position) in authored.iter().enumerate() {
        if position.iter().any(|c| !c.is_finite()) {
            return Err(ImportError::NonFinitePosition {
                vertex: vertex as VertexIndex,
            });
        }

        let welded = *grid.entry(quantize(*position, tolerance)).or_insert_with(|| {
            positions.push(*position);
            (positions.len() - 1) as VertexIndex
        });
        remap.push(welded);
    }

    let vertex_count = authored.len() as u32;
    let mut triangles = Vec::with_capacity(input.triangles().len());
    let mut collapsed = 0usize;
    for (face_index, triangle) in input.triangles().iter().enumerate() {
        let mut mapped = [0; 3];
        for (vertex_number, (&points_to_vertex, slot)) in
            triangle.iter().zip(mapped.iter_mut()).enumerate()
        {
            *slot = *remap
                .get(points_to_vertex as usize)
                .ok_or(ImportError::IncorrectFaceIndices {
                    face_index: face_index as u32,
                    vertex_number: vertex_number as u8,
                    points_to_vertex,
                    vertex_count,
                })?;
        }

        let [a, b, c] = mapped;
        if a == b || b == c || c == a {
            collapsed += 1;
            continue;
        }
        triangles.push(mapped);
    }

    if collapsed > 0 {
        tracing::event!(
            tracing::Level::WARN,
            collapsed,
            "dropped triangles collapsed by welding"
        );
    }
    tracing::event!(
        tracing::Level::DEBUG,
        authored = authored.len(),
        welded = positions.len(),
        "welded vertices"
    );

    Ok(Welded {
        positions,
        triangles,
        remap,
    })
}
