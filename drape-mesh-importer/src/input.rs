pub type Vector3F = [f32; 3];
pub type Vector3U = [u32; 3];

/// An indexed triangle mesh, as handed over by whatever loaded the asset.
pub trait MeshInput {
    fn positions(&self) -> &[Vector3F];
    fn triangles(&self) -> &[Vector3U];
}

impl<T> MeshInput for &T
where
    T: MeshInput + ?Sized,
{
    fn positions(&self) -> &[Vector3F] {
        (**self).positions()
    }

    fn triangles(&self) -> &[Vector3U] {
        (**self).triangles()
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    pub positions: Vec<Vector3F>,
    pub triangles: Vec<Vector3U>,
}

impl IndexedMesh {
    pub fn new(positions: Vec<Vector3F>, triangles: Vec<Vector3U>) -> Self {
        Self {
            positions,
            triangles,
        }
    }
}

impl MeshInput for IndexedMesh {
    fn positions(&self) -> &[Vector3F] {
        &self.positions
    }

    fn triangles(&self) -> &[Vector3U] {
        &self.triangles
    }
}
