use drape_model::{Texel, VALID};
use nalgebra::Vector3;

/// Error-free addition: `s + e == a + b` exactly, with `s == fl(a + b)`
#[inline]
pub fn two_sum(a: f32, b: f32) -> (f32, f32) {
    let s = a + b;
    let b_virtual = s - a;
    let a_virtual = s - b_virtual;
    (s, (a - a_virtual) + (b - b_virtual))
}

/// A position carried as an unevaluated sum `coarse + residual`.
///
/// Every constructor and every write leaves the pair normalized: `residual` is
/// below half an ulp of `coarse`, so `coarse + residual == coarse` in `f32`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SplitVec3 {
    pub coarse: Vector3<f32>,
    pub residual: Vector3<f32>,
}

impl SplitVec3 {
    pub fn from_f32(value: Vector3<f32>) -> Self {
        Self {
            coarse: value,
            residual: Vector3::zeros(),
        }
    }

    pub fn from_f64(value: Vector3<f64>) -> Self {
        let coarse = value.map(|c| c as f32);
        let residual = (value - coarse.cast::<f64>()).map(|c| c as f32);
        Self { coarse, residual }.rebased()
    }

    pub fn from_texels(integer: &Texel, fractional: &Texel) -> Self {
        Self {
            coarse: Vector3::from(integer.xyz()),
            residual: Vector3::from(fractional.xyz()),
        }
    }

    pub fn to_texels(&self) -> (Texel, Texel) {
        (
            Texel::from_xyz(self.coarse.into(), VALID),
            Texel::from_xyz(self.residual.into(), VALID),
        )
    }

    /// Carries whatever part of `residual` is representable into `coarse`.
    pub fn rebased(self) -> Self {
        let mut out = self;
        for i in 0..3 {
            let (c, r) = two_sum(self.coarse[i], self.residual[i]);
            out.coarse[i] = c;
            out.residual[i] = r;
        }
        out
    }

    /// `self + delta`, renormalized
    pub fn add(&self, delta: &Vector3<f32>) -> Self {
        let mut out = *self;
        for i in 0..3 {
            let (s, e) = two_sum(self.coarse[i], delta[i]);
            // `e + residual` may exceed `s` after cancellation, so no fast path here
            let (c, r) = two_sum(s, e + self.residual[i]);
            out.coarse[i] = c;
            out.residual[i] = r;
        }
        out
    }

    /// `self - other`; exact in the coarse terms when the two are close
    pub fn difference(&self, other: &SplitVec3) -> Vector3<f32> {
        (self.coarse - other.coarse) + (self.residual - other.residual)
    }

    /// `target - self`
    pub fn offset_to(&self, target: &Vector3<f32>) -> Vector3<f32> {
        (target - self.coarse) - self.residual
    }

    pub fn value(&self) -> Vector3<f32> {
        self.coarse + self.residual
    }

    pub fn value_f64(&self) -> Vector3<f64> {
        self.coarse.cast::<f64>() + self.residual.cast::<f64>()
    }
}
