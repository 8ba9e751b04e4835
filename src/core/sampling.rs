use crate::core::geometry::point::Point2f;
use crate::core::geometry::vector::Vector3f;
use hexf::{hexf32, hexf64};
use crate::core::pbrt::{Float, PI};

pub const ONE_MINUS_EPSILON: Float = hexf32!("0x1.fffffep-1");

/// Van der Corput radical inverse in base 2.
pub fn radical_inverse_vdc(mut bits: u32) -> Float {
    bits = (bits << 16) | (bits >> 16);
    bits = ((bits & 0x5555_5555) << 1) | ((bits & 0xAAAA_AAAA) >> 1);
    bits = ((bits & 0x3333_3333) << 2) | ((bits & 0xCCCC_CCCC) >> 2);
    bits = ((bits & 0x0F0F_0F0F) << 4) | ((bits & 0xF0F0_F0F0) >> 4);
    bits = ((bits & 0x00FF_00FF) << 8) | ((bits & 0xFF00_FF00) >> 8);

    ((bits as f64 * hexf64!("0x1.0p-32")) as Float).min(ONE_MINUS_EPSILON)
}

/// The `i`th of `n` points of the Hammersley set, in [0, 1)^2.
pub fn hammersley(i: u32, n: u32) -> Point2f {
    Point2f::new(i as Float / n as Float, radical_inverse_vdc(i))
}

/// GGX half vector around +z for a uniform sample `xi`.
pub fn importance_sample_ggx(xi: &Point2f, alpha: Float) -> Vector3f {
    let a2 = alpha * alpha;
    let phi = 2.0 * PI * xi[0];
    let cos_theta = ((1.0 - xi[1]) / (1.0 + (a2 - 1.0) * xi[1])).max(0.0).sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    Vector3f::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
}
