//! Curve sampling module
//!
//! Pure math that turns control points into an ordered point sequence.
//! The only state carried between calls is the RNG and the persisted
//! orthogonal basis that keeps curl orientation stable.

pub mod basis;
pub mod kind;
pub mod sampler;

pub use basis::{OrthogonalBasis, random_orthogonal};
pub use kind::{CurlFamily, CurveKind, Handedness};
pub use sampler::{ControlPositions, CurveParams, CurveSampler, curl_radius};
