//! Orthogonal frames around the start→end axis
//!
//! Curl and wave kinds displace samples perpendicular to the travel
//! direction. The perpendicular is random, so it is persisted and only
//! re-rolled when the direction actually changes.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::ZERO_LENGTH_SQ;
use crate::same_direction;

/// Attempts at rejection-sampling a perpendicular before the fixed fallback
const ORTHOGONAL_ATTEMPTS: usize = 8;

/// Pseudo-random unit vector perpendicular to `direction`
///
/// `direction` does not need to be normalized. A zero-length direction has
/// no perpendicular plane, so `Vec3::X` is returned instead of NaN.
pub fn random_orthogonal<R: Rng>(direction: Vec3, rng: &mut R) -> Vec3 {
    let dir = direction.normalize_or_zero();
    if dir.length_squared() <= ZERO_LENGTH_SQ {
        return Vec3::X;
    }

    for _ in 0..ORTHOGONAL_ATTEMPTS {
        let candidate = Vec3::new(
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
            rng.random_range(-1.0..=1.0),
        );
        // Project out the direction component
        let perpendicular = candidate - dir * candidate.dot(dir);
        if perpendicular.length_squared() > 1e-6 {
            return perpendicular.normalize();
        }
    }

    dir.any_orthonormal_vector()
}

/// Persisted perpendicular for curl/wave kinds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrthogonalBasis {
    /// Unit perpendicular (zero until first use)
    vector: Vec3,
    /// Travel direction the perpendicular was built for
    direction: Vec3,
}

impl OrthogonalBasis {
    /// Current perpendicular (zero if never computed)
    #[inline]
    pub fn vector(&self) -> Vec3 {
        self.vector
    }

    /// Direction the basis was last built for
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn is_set(&self) -> bool {
        self.vector.length_squared() > ZERO_LENGTH_SQ
    }

    /// Forget the basis so the next update re-rolls it
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Keep the basis if `direction` is unchanged, otherwise re-roll it
    ///
    /// Returns true when a new perpendicular was generated.
    pub fn update<R: Rng>(&mut self, direction: Vec3, rng: &mut R) -> bool {
        let dir = direction.normalize_or_zero();
        if self.is_set() && same_direction(self.direction, dir) {
            return false;
        }

        self.vector = random_orthogonal(dir, rng);
        self.direction = dir;
        log::debug!("Orthogonal basis refreshed: {:?} for direction {:?}", self.vector, dir);
        true
    }
}
