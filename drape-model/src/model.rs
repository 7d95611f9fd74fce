pub type VertexIndex = u32;

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::Pod, bytemuck::Zeroable))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(transparent)]
pub struct Vector3F(pub [f32; 3]);

#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::Pod, bytemuck::Zeroable))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[repr(transparent)]
pub struct Vector3U(pub [u32; 3]);

/// One 4-channel cell of a packed buffer.
///
/// Position-shaped buffers use the channels as `x, y, z, flag`, where a positive
/// flag marks a cell that holds a vertex. Adjacency-shaped buffers use all four
/// channels as slots. Unused cells and slots hold [`Texel::SENTINEL`].
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[cfg_attr(feature = "bytemuck", derive(bytemuck::Pod, bytemuck::Zeroable))]
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(transparent)]
pub struct Texel(pub [f32; 4]);

pub const SENTINEL: f32 = -1.0;
pub const VALID: f32 = 1.0;

impl Texel {
    pub const SENTINEL: Self = Self([SENTINEL; 4]);

    pub const fn from_xyz(xyz: [f32; 3], flag: f32) -> Self {
        Self([xyz[0], xyz[1], xyz[2], flag])
    }

    pub const fn xyz(&self) -> [f32; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    pub const fn flag(&self) -> f32 {
        self.0[3]
    }

    pub fn is_valid(&self) -> bool {
        self.0[3] > 0.0
    }
}

impl Default for Texel {
    fn default() -> Self {
        Self::SENTINEL
    }
}

impl From<Vector3F> for Texel {
    fn from(value: Vector3F) -> Self {
        Self::from_xyz(value.0, VALID)
    }
}
