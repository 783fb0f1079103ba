//! Curve kinds and their control-point requirements

use serde::{Deserialize, Serialize};

/// Shape of a generated line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurveKind {
    #[default]
    Linear,
    QuadraticBezier,
    CubicBezier,
    SineWave,
    SpiralRight,
    SpiralLeft,
    SpringRight,
    SpringLeft,
    ConeRight,
    ConeLeft,
}

/// Radius envelope used by the curl kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurlFamily {
    /// Constant radius
    Spiral,
    /// 0 → radius → 0, peaking mid-line
    Spring,
    /// 0 → radius, growing along the line
    Cone,
}

/// Winding direction of a curl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handedness {
    Right,
    Left,
}

impl Handedness {
    /// Sign applied to the cosine term of the curl
    #[inline]
    pub fn cos_sign(&self) -> f32 {
        match self {
            Handedness::Right => 1.0,
            Handedness::Left => -1.0,
        }
    }
}

impl CurveKind {
    pub const ALL: [CurveKind; 10] = [
        CurveKind::Linear,
        CurveKind::QuadraticBezier,
        CurveKind::CubicBezier,
        CurveKind::SineWave,
        CurveKind::SpiralRight,
        CurveKind::SpiralLeft,
        CurveKind::SpringRight,
        CurveKind::SpringLeft,
        CurveKind::ConeRight,
        CurveKind::ConeLeft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurveKind::Linear => "linear",
            CurveKind::QuadraticBezier => "quadratic",
            CurveKind::CubicBezier => "cubic",
            CurveKind::SineWave => "sine",
            CurveKind::SpiralRight => "spiral-right",
            CurveKind::SpiralLeft => "spiral-left",
            CurveKind::SpringRight => "spring-right",
            CurveKind::SpringLeft => "spring-left",
            CurveKind::ConeRight => "cone-right",
            CurveKind::ConeLeft => "cone-left",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "linear" | "line" => Some(CurveKind::Linear),
            "quadratic" | "quadratic-bezier" => Some(CurveKind::QuadraticBezier),
            "cubic" | "cubic-bezier" => Some(CurveKind::CubicBezier),
            "sine" | "sine-wave" => Some(CurveKind::SineWave),
            "spiral-right" => Some(CurveKind::SpiralRight),
            "spiral-left" => Some(CurveKind::SpiralLeft),
            "spring-right" => Some(CurveKind::SpringRight),
            "spring-left" => Some(CurveKind::SpringLeft),
            "cone-right" => Some(CurveKind::ConeRight),
            "cone-left" => Some(CurveKind::ConeLeft),
            _ => None,
        }
    }

    /// Number of control points the kind reads (start and end included)
    pub fn control_point_count(&self) -> usize {
        match self {
            CurveKind::QuadraticBezier => 3,
            CurveKind::CubicBezier => 4,
            _ => 2,
        }
    }

    /// Whether the kind displaces samples along the persisted basis
    pub fn uses_basis(&self) -> bool {
        matches!(self, CurveKind::SineWave) || self.curl().is_some()
    }

    /// Curl family and winding for spiral/spring/cone kinds
    pub fn curl(&self) -> Option<(CurlFamily, Handedness)> {
        match self {
            CurveKind::SpiralRight => Some((CurlFamily::Spiral, Handedness::Right)),
            CurveKind::SpiralLeft => Some((CurlFamily::Spiral, Handedness::Left)),
            CurveKind::SpringRight => Some((CurlFamily::Spring, Handedness::Right)),
            CurveKind::SpringLeft => Some((CurlFamily::Spring, Handedness::Left)),
            CurveKind::ConeRight => Some((CurlFamily::Cone, Handedness::Right)),
            CurveKind::ConeLeft => Some((CurlFamily::Cone, Handedness::Left)),
            _ => None,
        }
    }
}
