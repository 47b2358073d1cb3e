//! Microfacet scattering model.
//!
//! Isotropic GGX (Trowbridge-Reitz) reflectance and transmittance after
//! Walter et al., "Microfacet Models for Refraction through Rough
//! Surfaces" (2007): Schlick Fresnel, GGX normal distribution, Smith
//! shadow-masking, importance sampling of the microfacet normal, and the
//! matching probability densities for both scattering branches.
//!
//! Direction conventions: `l` points from the surface toward the light,
//! `v` from the surface toward the eye, `n` is the oriented macro-normal,
//! `m` the sampled microfacet normal. All unit length.

use glam::Vec3;
use rand::RngCore;

use crate::rng::gen_f32;

/// Floor for the microfacet alpha so perfectly smooth surfaces keep a
/// well-defined distribution and density. The square of the floor must
/// survive the NDF denominator's `nm^2 (a^2 - 1) + 1` in f32: anything
/// below ~1e-3 rounds the bracket to zero at nm = 1.
const MIN_ALPHA: f32 = 1e-3;

#[inline]
fn alpha_from(roughness: f32) -> f32 {
    (roughness * roughness).max(MIN_ALPHA)
}

/// Base reflectance at normal incidence from the two refractive indices.
#[inline]
pub fn f0(n1: f32, n2: f32) -> f32 {
    let f = (n1 - n2) / (n1 + n2);
    f * f
}

/// Schlick's approximation of the Fresnel reflectance.
#[inline]
pub fn fresnel_schlick(f0: f32, cos_theta: f32) -> f32 {
    f0 + (1.0 - f0) * (1.0 - cos_theta).clamp(0.0, 1.0).powi(5)
}

/// GGX normal distribution term.
#[inline]
pub fn ndf_ggx(n: Vec3, m: Vec3, alpha: f32) -> f32 {
    let a2 = alpha * alpha;
    let nm = n.dot(m);
    let denominator = nm * nm * (a2 - 1.0) + 1.0;
    a2 / (std::f32::consts::PI * denominator * denominator)
}

#[inline]
fn smith_g1(n_dot: f32, alpha: f32) -> f32 {
    let k = alpha * 0.5;
    n_dot / (n_dot * (1.0 - k) + k)
}

/// Smith shadow-masking term, separable per direction.
#[inline]
pub fn smith_g(n: Vec3, l: Vec3, v: Vec3, alpha: f32) -> f32 {
    smith_g1(n.dot(l).abs(), alpha) * smith_g1(n.dot(v).abs(), alpha)
}

/// Reflect `v` about the normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the incident direction `i` (pointing into the surface) through
/// a surface with normal `n`, from index `n1` into `n2`.
///
/// Returns `None` on total internal reflection.
#[inline]
pub fn refract(i: Vec3, n: Vec3, n1: f32, n2: f32) -> Option<Vec3> {
    let eta = n1 / n2;
    let cos_i = (-i).dot(n).min(1.0);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        return None;
    }
    Some(eta * i + (eta * cos_i - k.sqrt()) * n)
}

/// Microfacet BRDF: Fresnel x masking x distribution over the standard
/// 4 |n.l| |n.v| denominator, plus a Lambertian diffuse term.
pub fn brdf(
    l: Vec3,
    v: Vec3,
    n: Vec3,
    m: Vec3,
    albedo: Vec3,
    roughness: f32,
    n1: f32,
    n2: f32,
) -> Vec3 {
    let alpha = alpha_from(roughness);

    let f = fresnel_schlick(f0(n1, n2), l.dot(m).max(0.0));
    let d = ndf_ggx(n, m, alpha);
    let g = smith_g(n, l, v, alpha);

    let denominator = 4.0 * n.dot(l).abs() * n.dot(v).abs();
    let specular = if denominator > 1e-8 {
        f * g * d / denominator
    } else {
        0.0
    };

    let diffuse = albedo / std::f32::consts::PI;

    Vec3::splat(specular) + diffuse
}

/// Density of [`sample_bsdf`]'s reflection branch with respect to the
/// outgoing solid angle (branch probability not included).
pub fn pdf_brdf(v: Vec3, n: Vec3, m: Vec3, alpha: f32) -> f32 {
    let nm = n.dot(m).abs();
    let vm = v.dot(m).abs();
    if vm < 1e-8 {
        return 0.0;
    }
    ndf_ggx(n, m, alpha) * nm / (4.0 * vm)
}

/// Microfacet BTDF, the refraction-weighted analogue of [`brdf`].
///
/// Evaluates to zero when the configuration cannot refract (total internal
/// reflection).
pub fn btdf(l: Vec3, v: Vec3, n: Vec3, m: Vec3, roughness: f32, n1: f32, n2: f32) -> Vec3 {
    if refract(-v, m, n1, n2).is_none() {
        return Vec3::ZERO;
    }

    let alpha = alpha_from(roughness);

    let lm = l.dot(m);
    let vm = v.dot(m);
    let nl = n.dot(l).abs();
    let nv = n.dot(v).abs();
    if nl < 1e-8 || nv < 1e-8 {
        return Vec3::ZERO;
    }

    let f = fresnel_schlick(f0(n1, n2), vm.abs());
    let d = ndf_ggx(n, m, alpha);
    let g = smith_g(n, l, v, alpha);

    let coef = (lm.abs() * vm.abs()) / (nl * nv);
    let denominator = n1 * lm + n2 * vm;
    if denominator.abs() < 1e-8 {
        return Vec3::ZERO;
    }

    Vec3::splat(coef * n2 * n2 * (1.0 - f) * g * d / (denominator * denominator))
}

/// Density of [`sample_bsdf`]'s transmission branch with respect to the
/// outgoing solid angle (branch probability not included).
pub fn pdf_btdf(l: Vec3, v: Vec3, n: Vec3, m: Vec3, alpha: f32, n1: f32, n2: f32) -> f32 {
    let d = ndf_ggx(n, m, alpha);

    let lm = l.dot(m).abs();
    let vm = v.dot(m).abs();

    let denominator = (n1 / n2) * vm + (n2 / n1) * lm;
    if denominator.abs() < 1e-8 {
        return 0.0;
    }
    d * lm * vm / (denominator * denominator)
}

/// Draw a microfacet normal from the GGX distribution about `n`.
///
/// Two uniform draws map through the GGX inverse CDF to spherical angles,
/// then into world space via an orthonormal frame around `n`.
pub fn sample_ggx(n: Vec3, roughness: f32, rng: &mut dyn RngCore) -> Vec3 {
    let alpha = alpha_from(roughness);
    let alpha2 = alpha * alpha;

    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);

    let phi = 2.0 * std::f32::consts::PI * r1;
    let cos_theta = ((1.0 - r2) / (1.0 + (alpha2 - 1.0) * r2)).sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

    let h = Vec3::new(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta);

    let up = if n.y.abs() < 0.99 { Vec3::Y } else { Vec3::X };
    let t = up.cross(n).normalize();
    let b = n.cross(t);

    (t * h.x + b * h.y + n * h.z).normalize()
}

/// One importance-sampled scattering event.
#[derive(Debug, Clone, Copy)]
pub struct BsdfSample {
    /// Outgoing direction (unit length, surface toward light)
    pub direction: Vec3,
    /// BSDF value for that direction
    pub value: Vec3,
    /// Density of the draw, branch selection probability included
    pub pdf: f32,
}

/// Importance-sample the full BSDF.
///
/// Draws a GGX microfacet normal, then picks reflection or transmission
/// stochastically in proportion to the Fresnel reflectance at that normal.
/// A degenerate refraction (total internal reflection) takes the reflection
/// branch explicitly with branch probability 1, since no draw could have
/// produced a transmitted direction; the returned direction is always valid.
///
/// `incident` points into the surface; `n` is oriented against it.
/// `n2 == 0` marks an opaque surface: its Fresnel base reflectance is 1,
/// so the transmission branch is never taken.
pub fn sample_bsdf(
    incident: Vec3,
    n: Vec3,
    albedo: Vec3,
    roughness: f32,
    n1: f32,
    n2: f32,
    rng: &mut dyn RngCore,
) -> BsdfSample {
    let alpha = alpha_from(roughness);
    let m = sample_ggx(n, roughness, rng);
    let v = -incident;

    let reflectance = fresnel_schlick(f0(n1, n2), v.dot(m).max(0.0));

    let reflect_sample = |branch_probability: f32| {
        let l = reflect(incident, m).normalize();
        BsdfSample {
            direction: l,
            value: brdf(l, v, n, m, albedo, roughness, n1, n2),
            pdf: pdf_brdf(v, n, m, alpha) * branch_probability,
        }
    };

    // Under total internal reflection both branches would produce the same
    // reflected direction, so it is realized with probability 1 and the
    // stochastic branch draw is skipped.
    let Some(transmitted) = refract(incident, m, n1, n2) else {
        return reflect_sample(1.0);
    };

    if gen_f32(rng) < reflectance {
        reflect_sample(reflectance)
    } else {
        let l = transmitted.normalize();
        BsdfSample {
            direction: l,
            value: btdf(l, v, n, m, roughness, n1, n2),
            pdf: pdf_btdf(l, v, n, m, alpha, n1, n2) * (1.0 - reflectance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Xoshiro256pp;

    #[test]
    fn test_f0_air_glass() {
        let f = f0(1.0, 1.5);
        assert!((f - 0.04).abs() < 1e-3);
    }

    #[test]
    fn test_fresnel_limits() {
        let base = f0(1.0, 1.5);
        // Normal incidence returns the base reflectance
        assert!((fresnel_schlick(base, 1.0) - base).abs() < 1e-6);
        // Grazing incidence approaches full reflection
        assert!((fresnel_schlick(base, 0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_opaque_ior_reflects_everything() {
        // ior 0 encodes opaque: base reflectance 1 regardless of angle
        let base = f0(1.0, 0.0);
        assert!((base - 1.0).abs() < 1e-6);
        assert!((fresnel_schlick(base, 0.3) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ndf_peaks_at_normal() {
        let n = Vec3::Y;
        let tilted = Vec3::new(0.3, 1.0, 0.0).normalize();
        for alpha in [0.04, 0.25, 1.0] {
            assert!(ndf_ggx(n, n, alpha) > ndf_ggx(n, tilted, alpha));
        }
        // Smaller alpha concentrates the lobe
        assert!(ndf_ggx(n, n, 0.04) > ndf_ggx(n, n, 0.5));
    }

    #[test]
    fn test_smith_g_range() {
        let n = Vec3::Y;
        let l = Vec3::new(0.3, 0.8, 0.1).normalize();
        let v = Vec3::new(-0.5, 0.6, 0.2).normalize();
        for alpha in [0.01, 0.2, 1.0] {
            let g = smith_g(n, l, v, alpha);
            assert!(g > 0.0 && g <= 1.0, "alpha {alpha}: g = {g}");
        }
    }

    #[test]
    fn test_reflect_mirror() {
        let i = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = reflect(i, Vec3::Y);
        assert!((r - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_refract_snell_and_tir() {
        let n = Vec3::Y;
        let i = Vec3::new(1.0, -1.0, 0.0).normalize();

        // Into denser medium: bends toward the normal
        let t = refract(i, n, 1.0, 1.5).unwrap();
        assert!((t.length() - 1.0).abs() < 1e-5);
        let sin_in = i.x;
        let sin_out = t.x;
        assert!((sin_out - sin_in / 1.5).abs() < 1e-5);

        // Shallow exit from a dense medium: total internal reflection
        let grazing = Vec3::new(0.9, -0.1, 0.0).normalize();
        assert!(refract(grazing, n, 1.5, 1.0).is_none());
    }

    #[test]
    fn test_sample_ggx_concentrates_with_low_roughness() {
        let mut rng = Xoshiro256pp::new(21);
        let n = Vec3::new(0.2, 0.9, -0.1).normalize();

        // GGX is heavy-tailed, so count rather than demand every draw
        let mut tight = 0;
        for _ in 0..500 {
            let m = sample_ggx(n, 0.05, &mut rng);
            assert!((m.length() - 1.0).abs() < 1e-5);
            if m.dot(n) > 0.99 {
                tight += 1;
            }
        }
        assert!(tight > 450, "only {tight}/500 draws near the normal");
    }

    #[test]
    fn test_sample_ggx_spreads_with_high_roughness() {
        let mut rng = Xoshiro256pp::new(22);
        let n = Vec3::Y;

        let mut min_cos = 1.0f32;
        for _ in 0..500 {
            let m = sample_ggx(n, 1.0, &mut rng);
            min_cos = min_cos.min(m.dot(n));
        }
        assert!(min_cos < 0.7);
    }

    #[test]
    fn test_sample_bsdf_opaque_reflects_upward() {
        let mut rng = Xoshiro256pp::new(23);
        let n = Vec3::Y;
        let incident = Vec3::new(0.5, -0.8, 0.0).normalize();

        for _ in 0..500 {
            let s = sample_bsdf(incident, n, Vec3::splat(0.8), 0.1, 1.0, 0.0, &mut rng);
            assert!((s.direction.length() - 1.0).abs() < 1e-4);
            assert!(s.pdf > 0.0);
            assert!(s.value.x >= 0.0 && s.value.y >= 0.0 && s.value.z >= 0.0);
        }
    }

    #[test]
    fn test_sample_bsdf_mirror_direction() {
        let mut rng = Xoshiro256pp::new(24);
        let n = Vec3::Y;
        let incident = Vec3::new(1.0, -1.0, 0.0).normalize();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();

        // Roughness 0 collapses the lobe onto the macro-normal; averaging
        // irons out the clamped distribution's residual spread
        let mut avg = Vec3::ZERO;
        for _ in 0..200 {
            let s = sample_bsdf(incident, n, Vec3::ONE, 0.0, 1.0, 0.0, &mut rng);
            avg += s.direction;
        }
        assert!((avg.normalize() - expected).length() < 0.02);
    }

    #[test]
    fn test_sample_bsdf_finite_at_zero_roughness() {
        // The alpha floor must keep the NDF denominator representable, so
        // perfectly smooth surfaces yield usable weights instead of
        // infinities that the integrator would discard
        let mut rng = Xoshiro256pp::new(26);
        let n = Vec3::Y;
        let incident = Vec3::new(0.4, -0.7, 0.2).normalize();

        for _ in 0..10_000 {
            let s = sample_bsdf(incident, n, Vec3::splat(0.9), 0.0, 1.0, 0.0, &mut rng);
            assert!(s.value.is_finite(), "value {:?}", s.value);
            assert!(s.pdf.is_finite() && s.pdf > 0.0, "pdf {}", s.pdf);
        }
    }

    #[test]
    fn test_sample_bsdf_tir_uses_full_branch_probability() {
        // Grazing exit from glass: most microfacet draws hit total internal
        // reflection. The realized direction is then the mirror reflection
        // about m with density pdf_brdf and no branch factor, and no branch
        // draw is consumed. A lockstep generator replays the m draw.
        let n = Vec3::Y;
        let incident = Vec3::new(0.9, -f32::sqrt(1.0 - 0.81), 0.0).normalize();
        let v = -incident;
        let roughness = 0.3;
        let alpha = roughness * roughness;

        let mut a = Xoshiro256pp::new(27);
        let mut b = Xoshiro256pp::new(27);

        let mut tir_seen = 0;
        for _ in 0..2000 {
            let m = sample_ggx(n, roughness, &mut b);
            let s = sample_bsdf(incident, n, Vec3::ONE, roughness, 1.5, 1.0, &mut a);

            if refract(incident, m, 1.5, 1.0).is_none() {
                tir_seen += 1;
                let expected_dir = reflect(incident, m).normalize();
                assert!((s.direction - expected_dir).length() < 1e-5);

                let expected_pdf = pdf_brdf(v, n, m, alpha);
                assert!(
                    (s.pdf - expected_pdf).abs() <= 1e-4 * expected_pdf.abs(),
                    "pdf {} expected {expected_pdf}",
                    s.pdf
                );
            } else {
                // Keep the generators in lockstep over the branch draw
                let _ = gen_f32(&mut b);
            }
        }
        assert!(tir_seen > 500, "only {tir_seen} total internal reflections");
    }

    #[test]
    fn test_sample_bsdf_transmissive_produces_both_branches() {
        let mut rng = Xoshiro256pp::new(25);
        let n = Vec3::Y;
        let incident = Vec3::new(0.3, -0.9, 0.0).normalize();

        let mut reflected = 0;
        let mut transmitted = 0;
        for _ in 0..2000 {
            let s = sample_bsdf(incident, n, Vec3::ONE, 0.2, 1.0, 1.5, &mut rng);
            assert!((s.direction.length() - 1.0).abs() < 1e-4);
            if s.direction.y > 0.0 {
                reflected += 1;
            } else {
                transmitted += 1;
            }
        }
        assert!(reflected > 0);
        // Near-normal incidence on glass mostly transmits
        assert!(transmitted > reflected);
    }
}
