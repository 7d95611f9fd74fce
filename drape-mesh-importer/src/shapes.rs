//! Closed, consistently wound meshes built in code.

use std::collections::HashMap;

use crate::input::{IndexedMesh, Vector3F, Vector3U};

/// Regular tetrahedron centred on the origin, wound outward.
pub fn tetrahedron(edge: f32) -> IndexedMesh {
    let s = edge / (2.0 * core::f32::consts::SQRT_2);
    IndexedMesh::new(
        vec![[s, s, s], [s, -s, -s], [-s, s, -s], [-s, -s, s]],
        vec![[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]],
    )
}

const ICOSAHEDRON_FACES: [Vector3U; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

fn scale_to(v: [f64; 3], radius: f64) -> Vector3F {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    v.map(|c| (c / len * radius) as f32)
}

/// Icosahedron inscribed in a sphere of `radius`.
pub fn icosahedron(radius: f32) -> IndexedMesh {
    let phi = (1.0 + 5.0_f64.sqrt()) * 0.5;
    let corners = [
        [-1.0, phi, 0.0],
        [1.0, phi, 0.0],
        [-1.0, -phi, 0.0],
        [1.0, -phi, 0.0],
        [0.0, -1.0, phi],
        [0.0, 1.0, phi],
        [0.0, -1.0, -phi],
        [0.0, 1.0, -phi],
        [phi, 0.0, -1.0],
        [phi, 0.0, 1.0],
        [-phi, 0.0, -1.0],
        [-phi, 0.0, 1.0],
    ];

    IndexedMesh::new(
        corners
            .iter()
            .map(|c| scale_to(*c, f64::from(radius)))
            .collect(),
        ICOSAHEDRON_FACES.to_vec(),
    )
}

/// Icosahedron with every face split `subdivisions` times, vertices pushed onto the sphere.
pub fn icosphere(subdivisions: u32, radius: f32) -> IndexedMesh {
    let mut mesh = icosahedron(radius);
    let radius = f64::from(radius);

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut triangles = Vec::with_capacity(mesh.triangles.len() * 4);
        let positions = &mut mesh.positions;

        let mut midpoint = |a: u32, b: u32| -> u32 {
            *midpoints.entry((a.min(b), a.max(b))).or_insert_with(|| {
                let (pa, pb) = (positions[a as usize], positions[b as usize]);
                let m = [0, 1, 2].map(|i| (f64::from(pa[i]) + f64::from(pb[i])) * 0.5);
                positions.push(scale_to(m, radius));
                (positions.len() - 1) as u32
            })
        };

        for &[a, b, c] in &mesh.triangles {
            let (ab, bc, ca) = (midpoint(a, b), midpoint(b, c), midpoint(c, a));
            triangles.extend([[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]);
        }
        mesh.triangles = triangles;
    }

    mesh
}

/// Capped cylinder along z, wound outward.
///
/// Every ring repeats its first vertex at the end, the way UV-unwrapped assets
/// duplicate seam vertices; welding has to merge them back.
pub fn capped_cylinder(segments: u32, rings: u32, radius: f32, height: f32) -> IndexedMesh {
    let segments = segments.max(3);
    let rings = rings.max(1);
    let row = segments + 1;
    let index = |i: u32, j: u32| j * row + i;

    let mut positions = Vec::with_capacity(((rings + 1) * row + 2) as usize);
    for j in 0..=rings {
        let z = -height * 0.5 + height * j as f32 / rings as f32;
        for i in 0..=segments {
            let theta = core::f32::consts::TAU * (i % segments) as f32 / segments as f32;
            positions.push([radius * theta.cos(), radius * theta.sin(), z]);
        }
    }
    let bottom = positions.len() as u32;
    positions.push([0.0, 0.0, -height * 0.5]);
    let top = positions.len() as u32;
    positions.push([0.0, 0.0, height * 0.5]);

    let mut triangles = Vec::with_capacity((segments * (rings * 2 + 2)) as usize);
    for j in 0..rings {
        for i in 0..segments {
            let (a, b) = (index(i, j), index(i + 1, j));
            let (c, d) = (index(i + 1, j + 1), index(i, j + 1));
            triangles.extend([[a, b, c], [a, c, d]]);
        }
    }
    for i in 0..segments {
        triangles.push([bottom, index(i + 1, 0), index(i, 0)]);
        triangles.push([top, index(i, rings), index(i + 1, rings)]);
    }

    IndexedMesh::new(positions, triangles)
}
