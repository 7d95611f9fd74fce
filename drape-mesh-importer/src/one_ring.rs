use drape_model::VertexIndex;

use crate::face_arena::FaceArena;
use crate::input::Vector3F;
use crate::ImportError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RingPointer {
    pub offset: u32,
    pub count: u32,
}

/// Ordered one-ring of every vertex, each neighbour paired with its rest distance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rings {
    pointers: Vec<RingPointer>,
    neighbours: Vec<VertexIndex>,
    distances: Vec<f32>,
}

impl Rings {
    pub fn vertex_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn neighbours(&self, vertex: VertexIndex) -> &[VertexIndex] {
        let RingPointer { offset, count } = self.pointers[vertex as usize];
        &self.neighbours[offset as usize..(offset + count) as usize]
    }

    pub fn distances(&self, vertex: VertexIndex) -> &[f32] {
        let RingPointer { offset, count } = self.pointers[vertex as usize];
        &self.distances[offset as usize..(offset + count) as usize]
    }

    pub fn max_len(&self) -> u32 {
        self.pointers.iter().map(|p| p.count).max().unwrap_or(0)
    }

    pub fn min_len(&self) -> u32 {
        self.pointers.iter().map(|p| p.count).min().unwrap_or(0)
    }
}

/// The corner preceding `vertex` in the face's winding
fn preceding([a, b, c]: [VertexIndex; 3], vertex: VertexIndex) -> VertexIndex {
    if vertex == a {
        c
    } else if vertex == b {
        a
    } else {
        b
    }
}

fn walk(arena: &FaceArena, vertex: VertexIndex, out: &mut Vec<VertexIndex>) -> Result<(), ImportError> {
    let incident = arena.incident_faces(vertex);
    let &start = incident
        .first()
        .ok_or(ImportError::IsolatedVertex { vertex })?;

    let ring_start = out.len();
    let mut face = start;
    loop {
        let neighbour = preceding(arena.face(face), vertex);
        out.push(neighbour);

        // The face across edge (vertex, neighbour) holds it in our winding direction
        face = arena
            .face_with_half_edge(vertex, neighbour)
            .ok_or(ImportError::OpenFan { vertex, neighbour })?;
        if face == start {
            break;
        }
    }

    let ring = (out.len() - ring_start) as u32;
    if ring as usize != incident.len() {
        return Err(ImportError::SplitFan {
            vertex,
            ring,
            incident: incident.len() as u32,
        });
    }
    Ok(())
}

fn distance(a: Vector3F, b: Vector3F) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(a, b)| {
            let d = f64::from(*a) - f64::from(*b);
            d * d
        })
        .sum::<f64>()
        .sqrt() as f32
}

/// Walks the triangle fan around every vertex.
///
/// The mesh must be closed and manifold: every fan must be a single cycle.
#[tracing::instrument(skip_all, fields(vertices = positions.len(), faces = arena.face_count()))]
pub fn walk_rings(arena: &FaceArena, positions: &[Vector3F]) -> Result<Rings, ImportError> {
    let mut pointers = Vec::with_capacity(positions.len());
    let mut neighbours = Vec::with_capacity(arena.face_count() * 3);

    for vertex in 0..positions.len() as VertexIndex {
        let offset = neighbours.len() as u32;
        walk(arena, vertex, &mut neighbours)?;
        pointers.push(RingPointer {
            offset,
            count: neighbours.len() as u32 - offset,
        });
    }

    let distances = pointers
        .iter()
        .enumerate()
        .flat_map(|(vertex, pointer)| {
            let origin = positions[vertex];
            neighbours[pointer.offset as usize..(pointer.offset + pointer.count) as usize]
                .iter()
                .map(move |&n| distance(origin, positions[n as usize]))
        })
        .collect();

    let rings = Rings {
        pointers,
        neighbours,
        distances,
    };
    tracing::event!(
        tracing::Level::DEBUG,
        min_ring = rings.min_len(),
        max_ring = rings.max_len(),
        "walked one-rings"
    );
    Ok(rings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes;

    #[test]
    fn tetrahedron_rings_follow_winding() {
        let mesh = shapes::tetrahedron(1.0);
        let arena = FaceArena::build(&mesh.triangles, 4).unwrap();
        let rings = walk_rings(&arena, &mesh.positions).unwrap();

        // Faces [0,1,2], [0,3,1], [0,2,3], [1,3,2]
        assert_eq!(rings.neighbours(0), &[2, 3, 1]);
        assert_eq!(rings.neighbours(1), &[0, 3, 2]);
        assert_eq!(rings.max_len(), 3);
        for vertex in 0..4 {
            for d in rings.distances(vertex) {
                approx::assert_relative_eq!(*d, 1.0, max_relative = 1e-6);
            }
        }
    }

    #[test]
    fn open_surface_is_rejected() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let arena = FaceArena::build(&[[0, 1, 2]], 3).unwrap();
        assert_eq!(
            walk_rings(&arena, &positions),
            Err(ImportError::OpenFan {
                vertex: 0,
                neighbour: 2
            })
        );
    }

    #[test]
    fn bow_tie_vertex_is_rejected() {
        // Two tetrahedra sharing only vertex 0
        let mut mesh = shapes::tetrahedron(1.0);
        let offset = mesh.positions.len() as u32;
        let mirrored: Vec<_> = mesh
            .positions
            .iter()
            .skip(1)
            .map(|p| [-p[0], -p[1], -p[2] + 2.0])
            .collect();
        mesh.positions.extend(mirrored);
        let shifted: Vec<_> = mesh
            .triangles
            .iter()
            .map(|t| t.map(|v| if v == 0 { 0 } else { v - 1 + offset }))
            .collect();
        mesh.triangles.extend(shifted);

        let arena = FaceArena::build(&mesh.triangles, mesh.positions.len() as u32).unwrap();
        assert_eq!(
            walk_rings(&arena, &mesh.positions),
            Err(ImportError::SplitFan {
                vertex: 0,
                ring: 3,
                incident: 6
            })
        );
    }
}
