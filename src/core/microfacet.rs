use crate::core::pbrt::{Float, PI, clamp};
use crate::core::spectrum::Spectrum;

#[inline(always)]
pub fn roughness_to_alpha(roughness: Float) -> Float {
    let r = clamp(roughness, 0.0, 1.0);

    r * r
}

/// GGX / Trowbridge-Reitz normal distribution.
pub fn ggx_d(n_dot_h: Float, alpha: Float) -> Float {
    let a2 = alpha * alpha;
    let d = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;

    if d <= 0.0 { return 0.0; }

    a2 / (PI * d * d)
}

/// Schlick-Smith masking for image based lighting, `k = alpha / 2`.
pub fn smith_g1_ibl(n_dot_v: Float, alpha: Float) -> Float {
    let k = alpha / 2.0;

    n_dot_v / (n_dot_v * (1.0 - k) + k)
}

pub fn smith_g_ibl(n_dot_v: Float, n_dot_l: Float, alpha: Float) -> Float {
    smith_g1_ibl(n_dot_v, alpha) * smith_g1_ibl(n_dot_l, alpha)
}

/// Height correlated Smith visibility, `G / (4 n.v n.l)`.
pub fn visibility_smith_correlated(n_dot_v: Float, n_dot_l: Float, alpha: Float) -> Float {
    let a2 = alpha * alpha;
    let ggxv = n_dot_l * (n_dot_v * n_dot_v * (1.0 - a2) + a2).sqrt();
    let ggxl = n_dot_v * (n_dot_l * n_dot_l * (1.0 - a2) + a2).sqrt();
    let denom = ggxv + ggxl;

    if denom <= 0.0 { 0.0 } else { 0.5 / denom }
}

pub fn fresnel_schlick(f0: &Spectrum, cos_theta: Float) -> Spectrum {
    let m = clamp(1.0 - cos_theta, 0.0, 1.0);
    let m5 = m * m * m * m * m;

    *f0 + (Spectrum::new(1.0) - *f0) * m5
}

/// Schlick Fresnel with the grazing term attenuated by roughness.
pub fn fresnel_schlick_roughness(f0: &Spectrum, cos_theta: Float, roughness: Float) -> Spectrum {
    let m = clamp(1.0 - cos_theta, 0.0, 1.0);
    let m5 = m * m * m * m * m;
    let grazing = Spectrum::new(1.0 - roughness).map_max(f0);

    *f0 + (grazing - *f0) * m5
}

/// Normal incidence reflectance of a dielectric with the given index.
pub fn f0_from_ior(ior: Float) -> Float {
    let r = (ior - 1.0) / (ior + 1.0);

    r * r
}
