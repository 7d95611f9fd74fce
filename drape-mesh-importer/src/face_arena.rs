use std::collections::HashMap;

use drape_model::VertexIndex;

use crate::input::Vector3U;
use crate::ImportError;

pub type FaceIndex = u32;

/// Range of `FaceArena::incident` owned by one vertex
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IncidencePointer {
    pub offset: u32,
    pub count: u32,
}

/// Faces addressed by index, with the two lookups the one-ring walk needs:
/// the faces around a vertex and the face owning a directed edge.
#[derive(Debug, Clone)]
pub struct FaceArena {
    faces: Vec<Vector3U>,
    pointers: Vec<IncidencePointer>,
    incident: Vec<FaceIndex>,
    half_edges: HashMap<(VertexIndex, VertexIndex), FaceIndex>,
}

impl FaceArena {
    pub fn build(triangles: &[Vector3U], vertex_count: u32) -> Result<Self, ImportError> {
        let mut pointers = vec![IncidencePointer::default(); vertex_count as usize];
        for triangle in triangles {
            for &vertex in triangle {
                pointers[vertex as usize].count += 1;
            }
        }

        let mut offset = 0;
        for pointer in pointers.iter_mut() {
            pointer.offset = offset;
            offset += pointer.count;
        }

        let mut incident = vec![0; offset as usize];
        let mut filled = vec![0u32; vertex_count as usize];
        let mut half_edges = HashMap::with_capacity(triangles.len() * 3);
        for (face, &[a, b, c]) in triangles.iter().enumerate() {
            let face = face as FaceIndex;
            for vertex in [a, b, c] {
                let pointer = pointers[vertex as usize];
                let cursor = &mut filled[vertex as usize];
                incident[(pointer.offset + *cursor) as usize] = face;
                *cursor += 1;
            }

            for (from, to) in [(a, b), (b, c), (c, a)] {
                if let Some(first_face) = half_edges.insert((from, to), face) {
                    return Err(ImportError::DuplicateHalfEdge {
                        from,
                        to,
                        first_face,
                        second_face: face,
                    });
                }
            }
        }

        Ok(Self {
            faces: triangles.to_vec(),
            pointers,
            incident,
            half_edges,
        })
    }

    pub fn face(&self, face: FaceIndex) -> Vector3U {
        self.faces[face as usize]
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn incident_faces(&self, vertex: VertexIndex) -> &[FaceIndex] {
        let IncidencePointer { offset, count } = self.pointers[vertex as usize];
        &self.incident[offset as usize..(offset + count) as usize]
    }

    pub fn face_with_half_edge(&self, from: VertexIndex, to: VertexIndex) -> Option<FaceIndex> {
        self.half_edges.get(&(from, to)).copied()
    }
}
