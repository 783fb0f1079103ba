//! Curve sampler
//!
//! Turns a curve kind plus control positions into `sample_count` world-space
//! points. Sample `i` sits at parameter `t = i / (N - 1)`; the first and last
//! samples are pinned to the start and end positions for every kind.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::basis::{OrthogonalBasis, random_orthogonal};
use super::kind::{CurlFamily, CurveKind};
use crate::consts::*;

/// Shape parameters shared by all curve kinds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveParams {
    /// Number of samples (N >= 2)
    pub sample_count: usize,
    /// Max random displacement of interior samples (0 = off)
    pub noise: f32,
    /// Number of half-oscillations for wave/curl kinds
    pub amplitude: u32,
    /// Wave height, reused as curl radius
    pub wave_power: f32,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            noise: 0.0,
            amplitude: DEFAULT_AMPLITUDE,
            wave_power: DEFAULT_WAVE_POWER,
        }
    }
}

impl CurveParams {
    /// Clamp out-of-range values (N < 2, negative, non-finite or huge noise/power)
    pub fn sanitized(&self) -> Self {
        if self.sample_count < MIN_SAMPLE_COUNT {
            log::warn!(
                "Sample count {} below minimum, clamping to {}",
                self.sample_count,
                MIN_SAMPLE_COUNT
            );
        }
        Self {
            sample_count: self.sample_count.max(MIN_SAMPLE_COUNT),
            noise: clamp_magnitude("noise", self.noise),
            amplitude: self.amplitude,
            wave_power: clamp_magnitude("wave power", self.wave_power),
        }
    }
}

/// Map a displacement magnitude into `[0, MAX_DISPLACEMENT]`
fn clamp_magnitude(name: &str, value: f32) -> f32 {
    if !value.is_finite() {
        log::warn!("Non-finite {} {}, using 0", name, value);
        return 0.0;
    }
    if value > MAX_DISPLACEMENT {
        log::warn!("{} {} too large, clamping to {}", name, value, MAX_DISPLACEMENT);
        return MAX_DISPLACEMENT;
    }
    value.max(0.0)
}

/// Resolved world-space control positions
///
/// All four are always present; the curve kind decides which are read.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlPositions {
    pub start: Vec3,
    pub end: Vec3,
    pub control1: Vec3,
    pub control2: Vec3,
}

impl ControlPositions {
    /// Positions for a two-point kind (controls collapse onto the endpoints)
    pub fn line(start: Vec3, end: Vec3) -> Self {
        Self {
            start,
            end,
            control1: start,
            control2: end,
        }
    }

    pub fn quadratic(start: Vec3, control: Vec3, end: Vec3) -> Self {
        Self {
            start,
            end,
            control1: control,
            control2: control,
        }
    }

    pub fn cubic(start: Vec3, control1: Vec3, control2: Vec3, end: Vec3) -> Self {
        Self {
            start,
            end,
            control1,
            control2,
        }
    }

    /// Unnormalized start→end vector
    #[inline]
    pub fn axis(&self) -> Vec3 {
        self.end - self.start
    }
}

/// Point on the straight line at parameter `t`
#[inline]
pub fn linear_point(t: f32, start: Vec3, end: Vec3) -> Vec3 {
    (1.0 - t) * start + t * end
}

/// Quadratic Bézier: (1-t)²·P0 + 2t(1-t)·C + t²·P1
#[inline]
pub fn quadratic_bezier_point(t: f32, start: Vec3, control: Vec3, end: Vec3) -> Vec3 {
    let u = 1.0 - t;
    u * u * start + 2.0 * t * u * control + t * t * end
}

/// Cubic Bézier: (1-t)³·P0 + 3t(1-t)²·C1 + 3t²(1-t)·C2 + t³·P1
#[inline]
pub fn cubic_bezier_point(t: f32, start: Vec3, control1: Vec3, control2: Vec3, end: Vec3) -> Vec3 {
    let u = 1.0 - t;
    u * u * u * start + 3.0 * t * u * u * control1 + 3.0 * t * t * u * control2 + t * t * t * end
}

/// Curl radius at sample `index` of `sample_count`
///
/// - Spiral: constant `radius`
/// - Spring: linear 0 → `radius` over the first half, back to 0 over the second
/// - Cone: linear 0 → `radius` over the whole line
///
/// Always within `[0, radius]`.
pub fn curl_radius(family: CurlFamily, index: usize, sample_count: usize, radius: f32) -> f32 {
    let radius = radius.max(0.0);
    let last = (sample_count.max(MIN_SAMPLE_COUNT) - 1) as f32;
    let t = (index as f32 / last).min(1.0);

    let r = match family {
        CurlFamily::Spiral => radius,
        CurlFamily::Spring => radius * (1.0 - (2.0 * t - 1.0).abs()),
        CurlFamily::Cone => radius * t,
    };
    r.max(0.0).min(radius)
}

/// Curve generator with its own seeded RNG
///
/// The RNG feeds basis re-rolls and noise; seeding it makes output reproducible.
#[derive(Debug, Clone)]
pub struct CurveSampler {
    seed: u64,
    rng: Pcg32,
}

impl Default for CurveSampler {
    fn default() -> Self {
        Self::new(0)
    }
}

impl CurveSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Refresh `basis` for the travel direction `axis`, returning true if re-rolled
    pub fn refresh_basis(&mut self, basis: &mut OrthogonalBasis, axis: Vec3) -> bool {
        basis.update(axis, &mut self.rng)
    }

    /// Generate the curve into `out`, replacing its contents
    ///
    /// `out` keeps its allocation; it only grows when `sample_count` exceeds
    /// its capacity. `basis` is read (and refreshed if the direction changed)
    /// by the wave and curl kinds only.
    pub fn generate(
        &mut self,
        kind: CurveKind,
        points: &ControlPositions,
        params: &CurveParams,
        basis: &mut OrthogonalBasis,
        out: &mut Vec<Vec3>,
    ) {
        let params = params.sanitized();
        let n = params.sample_count;
        let ControlPositions {
            start,
            end,
            control1,
            control2,
        } = *points;

        out.clear();
        out.reserve(n);

        let axis = points.axis();
        let direction = axis.normalize_or_zero();
        let step = axis.length() / (n - 1) as f32;
        // A zero-length line has nothing to wave or curl around
        let orthogonal = if kind.uses_basis() && axis.length_squared() > ZERO_LENGTH_SQ {
            self.refresh_basis(basis, axis);
            basis.vector()
        } else {
            Vec3::ZERO
        };

        match kind.curl() {
            Some((family, handedness)) => {
                let binormal = direction.cross(orthogonal);
                let cos_sign = handedness.cos_sign();
                let phase_scale = params.amplitude as f32 * PI;

                fill(out, n, |i, t| {
                    let phase = phase_scale * t;
                    let offset = orthogonal * phase.sin() + binormal * (cos_sign * phase.cos());
                    let radius = curl_radius(family, i, n, params.wave_power);
                    start + direction * (step * i as f32) + offset * radius
                })
            }
            None => match kind {
                CurveKind::QuadraticBezier => {
                    fill(out, n, |_, t| quadratic_bezier_point(t, start, control1, end))
                }
                CurveKind::CubicBezier => fill(out, n, |_, t| {
                    cubic_bezier_point(t, start, control1, control2, end)
                }),
                CurveKind::SineWave => {
                    let phase_scale = params.amplitude as f32 * PI;

                    fill(out, n, |i, t| {
                        start
                            + direction * (step * i as f32)
                            + orthogonal * ((phase_scale * t).sin() * params.wave_power)
                    })
                }
                _ => fill(out, n, |_, t| linear_point(t, start, end)),
            },
        }

        out[0] = start;
        out[n - 1] = end;

        if params.noise > 0.0 {
            self.add_noise(out, axis, params.noise);
        }
    }

    /// Jitter interior samples perpendicular to `axis` by up to `magnitude`
    ///
    /// Uses a fresh random frame each call; endpoints are untouched.
    pub fn add_noise(&mut self, points: &mut [Vec3], axis: Vec3, magnitude: f32) {
        if points.len() <= 2 || !magnitude.is_finite() || magnitude <= 0.0 {
            return;
        }

        let first = random_orthogonal(axis, &mut self.rng);
        let mut second = axis.normalize_or_zero().cross(first).normalize_or_zero();
        if second.length_squared() <= ZERO_LENGTH_SQ {
            second = first.any_orthonormal_vector();
        }

        let last = points.len() - 1;
        for point in &mut points[1..last] {
            *point += first * (self.rng.random_range(-1.0f32..=1.0) * magnitude);
            *point += second * (self.rng.random_range(-1.0f32..=1.0) * magnitude);
        }
    }
}

/// Push `n` samples produced by `sample(index, t)`
fn fill(out: &mut Vec<Vec3>, n: usize, mut sample: impl FnMut(usize, f32) -> Vec3) {
    let last = (n - 1) as f32;
    out.extend((0..n).map(|i| sample(i, i as f32 / last)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::kind::Handedness;
    use proptest::prelude::*;

    const EPS: f32 = 1e-4;

    fn params(n: usize) -> CurveParams {
        CurveParams {
            sample_count: n,
            ..Default::default()
        }
    }

    fn generate(kind: CurveKind, points: &ControlPositions, params: &CurveParams) -> Vec<Vec3> {
        let mut sampler = CurveSampler::new(1234);
        let mut basis = OrthogonalBasis::default();
        let mut out = Vec::new();
        sampler.generate(kind, points, params, &mut basis, &mut out);
        out
    }

    /// Distance from `p` to the infinite line through `a` and `b`
    fn distance_to_axis(p: Vec3, a: Vec3, b: Vec3) -> f32 {
        let dir = (b - a).normalize();
        let rel = p - a;
        (rel - dir * rel.dot(dir)).length()
    }

    #[test]
    fn test_linear_midpoint() {
        let points = ControlPositions::line(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0));
        let out = generate(CurveKind::Linear, &points, &params(3));
        assert_eq!(out.len(), 3);
        assert!(out[1].abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), EPS));
    }

    #[test]
    fn test_quadratic_midpoint() {
        let points = ControlPositions::quadratic(
            Vec3::ZERO,
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 2.0),
        );
        let out = generate(CurveKind::QuadraticBezier, &points, &params(3));
        assert!(out[1].abs_diff_eq(Vec3::new(0.5, 0.0, 1.0), EPS));
    }

    #[test]
    fn test_cubic_with_midpoint_controls_is_straight() {
        let start = Vec3::new(-1.0, 2.0, 0.5);
        let end = Vec3::new(3.0, -2.0, 4.5);
        let mid = (start + end) * 0.5;
        let points = ControlPositions::cubic(start, mid, mid, end);
        let out = generate(CurveKind::CubicBezier, &points, &params(21));

        for p in &out {
            assert!(distance_to_axis(*p, start, end) < EPS);
        }
    }

    #[test]
    fn test_two_samples_are_the_endpoints() {
        let start = Vec3::new(1.0, 1.0, 1.0);
        let end = Vec3::new(4.0, 5.0, 6.0);
        for kind in CurveKind::ALL {
            let out = generate(kind, &ControlPositions::line(start, end), &params(2));
            assert_eq!(out, vec![start, end], "{}", kind.as_str());
        }
    }

    #[test]
    fn test_sample_count_clamped() {
        let points = ControlPositions::line(Vec3::ZERO, Vec3::X);
        let out = generate(CurveKind::Linear, &points, &params(0));
        assert_eq!(out, vec![Vec3::ZERO, Vec3::X]);
    }

    #[test]
    fn test_sine_wave_peak() {
        let start = Vec3::ZERO;
        let end = Vec3::new(2.0, 0.0, 0.0);
        let p = CurveParams {
            sample_count: 3,
            amplitude: 1,
            wave_power: 1.5,
            noise: 0.0,
        };
        let out = generate(CurveKind::SineWave, &ControlPositions::line(start, end), &p);
        // sin(π/2) = 1 at the middle sample
        assert!((distance_to_axis(out[1], start, end) - 1.5).abs() < EPS);
        assert!(((out[1] - start).dot(Vec3::X) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_spiral_keeps_constant_radius() {
        let start = Vec3::new(0.0, 1.0, 0.0);
        let end = Vec3::new(0.0, 1.0, 10.0);
        let p = CurveParams {
            sample_count: 40,
            amplitude: 6,
            wave_power: 0.75,
            noise: 0.0,
        };
        for kind in [CurveKind::SpiralRight, CurveKind::SpiralLeft] {
            let out = generate(kind, &ControlPositions::line(start, end), &p);
            for point in &out[1..out.len() - 1] {
                assert!((distance_to_axis(*point, start, end) - 0.75).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_right_and_left_mirror_cos_term() {
        let start = Vec3::ZERO;
        let end = Vec3::new(0.0, 0.0, 4.0);
        let points = ControlPositions::line(start, end);
        let p = CurveParams {
            sample_count: 9,
            amplitude: 3,
            wave_power: 1.0,
            noise: 0.0,
        };

        let mut sampler = CurveSampler::new(9);
        let mut basis = OrthogonalBasis::default();
        let mut right = Vec::new();
        let mut left = Vec::new();
        sampler.generate(CurveKind::SpiralRight, &points, &p, &mut basis, &mut right);
        sampler.generate(CurveKind::SpiralLeft, &points, &p, &mut basis, &mut left);

        let binormal = Vec3::Z.cross(basis.vector());
        for i in 1..8 {
            let t = i as f32 / 8.0;
            let cos = (3.0 * PI * t).cos();
            let expected = binormal * (2.0 * cos * Handedness::Right.cos_sign());
            assert!((right[i] - left[i]).abs_diff_eq(expected, EPS));
        }
    }

    #[test]
    fn test_spring_radius_envelope() {
        let n = 11;
        let radii: Vec<f32> = (0..n)
            .map(|i| curl_radius(CurlFamily::Spring, i, n, 1.0))
            .collect();

        assert_eq!(radii[0], 0.0);
        for i in 1..=5 {
            assert!(radii[i] > radii[i - 1], "rising at {i}");
        }
        for i in 6..n {
            assert!(radii[i] < radii[i - 1], "falling at {i}");
        }
        assert!((radii[5] - 1.0).abs() < EPS);
        assert!(radii[n - 1].abs() < EPS);
        assert!(radii.iter().all(|r| (0.0..=1.0).contains(r)));
    }

    #[test]
    fn test_cone_radius_reaches_target() {
        let n = 16;
        let radii: Vec<f32> = (0..n)
            .map(|i| curl_radius(CurlFamily::Cone, i, n, 2.5))
            .collect();
        assert_eq!(radii[0], 0.0);
        assert!(radii.windows(2).all(|w| w[1] >= w[0]));
        assert!((radii[n - 1] - 2.5).abs() < EPS);
    }

    #[test]
    fn test_spiral_radius_constant() {
        for i in 0..5 {
            assert_eq!(curl_radius(CurlFamily::Spiral, i, 5, 3.0), 3.0);
        }
        assert_eq!(curl_radius(CurlFamily::Spiral, 0, 5, -1.0), 0.0);
    }

    #[test]
    fn test_basis_reused_between_calls() {
        let points = ControlPositions::line(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
        let p = CurveParams {
            sample_count: 12,
            ..Default::default()
        };
        let mut sampler = CurveSampler::new(77);
        let mut basis = OrthogonalBasis::default();
        let mut first = Vec::new();
        let mut second = Vec::new();

        sampler.generate(CurveKind::SpringLeft, &points, &p, &mut basis, &mut first);
        let vector = basis.vector();
        sampler.generate(CurveKind::SpringLeft, &points, &p, &mut basis, &mut second);

        assert_eq!(basis.vector(), vector);
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_noise_matches_closed_form() {
        let start = Vec3::new(1.0, 0.0, 0.0);
        let end = Vec3::new(1.0, 8.0, 0.0);
        let out = generate(CurveKind::Linear, &ControlPositions::line(start, end), &params(9));
        for (i, p) in out.iter().enumerate() {
            assert!(p.abs_diff_eq(linear_point(i as f32 / 8.0, start, end), EPS));
        }
    }

    #[test]
    fn test_noise_displaces_interior_only() {
        let start = Vec3::ZERO;
        let end = Vec3::new(10.0, 0.0, 0.0);
        let p = CurveParams {
            sample_count: 30,
            noise: 0.5,
            ..Default::default()
        };
        let out = generate(CurveKind::Linear, &ControlPositions::line(start, end), &p);

        assert_eq!(out[0], start);
        assert_eq!(out[29], end);
        let mut moved = 0;
        for (i, point) in out.iter().enumerate().take(29).skip(1) {
            let d = distance_to_axis(*point, start, end);
            // Two perpendicular offsets of at most 0.5 each
            assert!(d <= 0.5 * 2f32.sqrt() + EPS);
            // Noise is perpendicular, progress along the axis is kept
            assert!((point.x - i as f32 * 10.0 / 29.0).abs() < EPS);
            if d > EPS {
                moved += 1;
            }
        }
        assert!(moved > 0);
    }

    #[test]
    fn test_degenerate_axis_stays_finite() {
        let p = Vec3::new(2.0, 2.0, 2.0);
        let params = CurveParams {
            sample_count: 10,
            noise: 0.3,
            amplitude: 4,
            wave_power: 1.0,
        };
        for kind in CurveKind::ALL {
            let out = generate(kind, &ControlPositions::line(p, p), &params);
            assert!(out.iter().all(|v| v.is_finite()), "{}", kind.as_str());
            assert_eq!(out[0], p);
            assert_eq!(out[9], p);
        }
    }

    #[test]
    fn test_degenerate_axis_collapses_curls() {
        let p = Vec3::new(3.0, 3.0, 3.0);
        let params = CurveParams {
            sample_count: 12,
            wave_power: 2.0,
            ..Default::default()
        };
        for kind in [CurveKind::SpiralRight, CurveKind::ConeLeft, CurveKind::SineWave] {
            let mut sampler = CurveSampler::new(3);
            let mut basis = OrthogonalBasis::default();
            let mut out = Vec::new();
            sampler.generate(kind, &ControlPositions::line(p, p), &params, &mut basis, &mut out);

            assert!(out.iter().all(|v| v.abs_diff_eq(p, EPS)), "{}", kind.as_str());
            assert!(!basis.is_set());
        }
    }

    #[test]
    fn test_huge_noise_stays_finite() {
        let points = ControlPositions::line(Vec3::ZERO, Vec3::X);
        for noise in [2.0e38, f32::MAX, f32::INFINITY, f32::NAN] {
            let p = CurveParams {
                sample_count: 5,
                noise,
                ..Default::default()
            };
            let out = generate(CurveKind::Linear, &points, &p);
            assert!(out.iter().all(|v| v.is_finite()), "noise {}", noise);
            assert_eq!(out[0], Vec3::ZERO);
            assert_eq!(out[4], Vec3::X);
        }
    }

    #[test]
    fn test_non_finite_params_sanitized() {
        let p = CurveParams {
            noise: f32::INFINITY,
            wave_power: f32::INFINITY,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(p.noise, 0.0);
        assert_eq!(p.wave_power, 0.0);

        let p = CurveParams {
            noise: f32::MAX,
            wave_power: f32::NAN,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(p.noise, MAX_DISPLACEMENT);
        assert_eq!(p.wave_power, 0.0);

        let points = ControlPositions::line(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0));
        let wild = CurveParams {
            wave_power: f32::INFINITY,
            ..Default::default()
        };
        for kind in [CurveKind::SineWave, CurveKind::SpringRight] {
            let out = generate(kind, &points, &wild);
            assert!(out.iter().all(|v| v.is_finite()), "{}", kind.as_str());
        }
    }

    #[test]
    fn test_add_noise_ignores_non_finite_magnitude() {
        let mut sampler = CurveSampler::new(9);
        let mut points = vec![Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        sampler.add_noise(&mut points, Vec3::X, f32::INFINITY);
        assert_eq!(points, vec![Vec3::ZERO, Vec3::X, Vec3::X * 2.0]);
    }

    #[test]
    fn test_output_buffer_reused() {
        let points = ControlPositions::line(Vec3::ZERO, Vec3::ONE);
        let mut sampler = CurveSampler::new(0);
        let mut basis = OrthogonalBasis::default();
        let mut out = Vec::with_capacity(32);
        let ptr = out.as_ptr();

        sampler.generate(CurveKind::Linear, &points, &params(32), &mut basis, &mut out);
        sampler.generate(CurveKind::ConeRight, &points, &params(20), &mut basis, &mut out);

        assert_eq!(out.len(), 20);
        assert_eq!(out.as_ptr(), ptr);
    }

    #[test]
    fn test_same_seed_same_noise() {
        let points = ControlPositions::line(Vec3::ZERO, Vec3::new(0.0, 5.0, 0.0));
        let p = CurveParams {
            sample_count: 15,
            noise: 1.0,
            ..Default::default()
        };
        let a = generate(CurveKind::SpiralRight, &points, &p);
        let b = generate(CurveKind::SpiralRight, &points, &p);
        assert_eq!(a, b);
    }

    fn any_kind() -> impl Strategy<Value = CurveKind> {
        prop::sample::select(CurveKind::ALL.to_vec())
    }

    fn any_point() -> impl Strategy<Value = Vec3> {
        (-50.0f32..50.0, -50.0f32..50.0, -50.0f32..50.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    proptest! {
        #[test]
        fn prop_endpoints_are_exact(
            kind in any_kind(),
            start in any_point(),
            end in any_point(),
            c1 in any_point(),
            c2 in any_point(),
            n in 2usize..64,
            noise in 0.0f32..2.0,
            amplitude in 0u32..12,
            wave_power in 0.0f32..5.0,
            seed in any::<u64>(),
        ) {
            let mut sampler = CurveSampler::new(seed);
            let mut basis = OrthogonalBasis::default();
            let mut out = Vec::new();
            let params = CurveParams { sample_count: n, noise, amplitude, wave_power };
            sampler.generate(kind, &ControlPositions::cubic(start, c1, c2, end), &params, &mut basis, &mut out);

            prop_assert_eq!(out.len(), n);
            prop_assert_eq!(out[0], start);
            prop_assert_eq!(out[n - 1], end);
            prop_assert!(out.iter().all(|p| p.is_finite()));
        }

        #[test]
        fn prop_curl_radius_within_bounds(
            index in 0usize..100,
            n in 2usize..100,
            radius in 0.0f32..10.0,
        ) {
            let index = index.min(n - 1);
            for family in [CurlFamily::Spiral, CurlFamily::Spring, CurlFamily::Cone] {
                let r = curl_radius(family, index, n, radius);
                prop_assert!(r >= 0.0 && r <= radius);
            }
        }
    }
}
