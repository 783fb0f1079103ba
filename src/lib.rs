//! Curve Lines - real-time parametric line generator
//!
//! Core modules:
//! - `curve`: Pure curve sampling (Bézier, sine, spiral/spring/cone curls, noise)
//! - `line`: Stateful line builder (control points, cutting, rebuild scheduling)
//! - `settings`: Data-driven line parameters

pub mod curve;
pub mod line;
pub mod settings;

pub use curve::{ControlPositions, CurveKind, CurveParams, CurveSampler, OrthogonalBasis};
pub use line::{
    AnchorId, AnchorSet, AnchorSource, ControlPoint, CutState, Frame, HitPoint, LayerMask,
    LineBuilder, LineHost, LineOfSight, ObstacleField, PointSink, PointSlot, TriggerPolicy,
    UpdateOutcome,
};
pub use settings::{CutSettings, LineSettings};

use glam::Vec3;

/// Line configuration constants
pub mod consts {
    /// Smallest usable sample count (a single segment)
    pub const MIN_SAMPLE_COUNT: usize = 2;
    /// Default number of samples per line
    pub const DEFAULT_SAMPLE_COUNT: usize = 15;

    /// Default number of oscillations for wave/curl kinds
    pub const DEFAULT_AMPLITUDE: u32 = 2;
    /// Default wave power (also the curl radius)
    pub const DEFAULT_WAVE_POWER: f32 = 2.0;

    /// Upper bound for noise and wave power
    pub const MAX_DISPLACEMENT: f32 = 1.0e6;

    /// Default auto-rebuild interval (seconds)
    pub const DEFAULT_REBUILD_INTERVAL: f32 = 0.1;

    /// Tolerance for "cosine similarity is 1" when comparing directions
    pub const DIRECTION_TOLERANCE: f32 = 1e-5;
    /// Squared length under which a vector counts as zero
    pub const ZERO_LENGTH_SQ: f32 = 1e-12;
    /// Position change under which a control point counts as unmoved
    pub const MOVE_EPSILON: f32 = 1e-6;
}

/// Sum of consecutive segment lengths of a polyline
pub fn polyline_length(points: &[Vec3]) -> f32 {
    points.windows(2).map(|w| (w[1] - w[0]).length()).sum()
}

/// True when two unit directions point the same way (cosine similarity ≈ 1)
#[inline]
pub fn same_direction(a: Vec3, b: Vec3) -> bool {
    (a.dot(b) - 1.0).abs() <= consts::DIRECTION_TOLERANCE
}
