//! Sphere obstacle field
//!
//! Reference `LineOfSight` backend: analytic segment/sphere intersection
//! with layer and trigger filtering. Good enough for demos and tests; real
//! hosts plug in their physics engine instead.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::host::{HitPoint, LayerMask, LineOfSight, TriggerPolicy};

/// Signed distance to a sphere
#[inline]
pub fn sd_sphere(p: Vec3, center: Vec3, radius: f32) -> f32 {
    (p - center).length() - radius
}

/// A spherical collider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereObstacle {
    pub center: Vec3,
    pub radius: f32,
    /// Collision layer (0..32)
    #[serde(default)]
    pub layer: u8,
    /// Trigger volumes only block when the query asks for it
    #[serde(default)]
    pub is_trigger: bool,
}

impl SphereObstacle {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            center,
            radius,
            layer: 0,
            is_trigger: false,
        }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        sd_sphere(p, self.center, self.radius) < 0.0
    }

    /// Entry point of the segment into the sphere
    ///
    /// Returns the fraction along the segment and the hit. Segments that
    /// start inside the sphere do not hit it (only entering surfaces count).
    pub fn segment_hit(&self, start: Vec3, end: Vec3) -> Option<(f32, HitPoint)> {
        let d = end - start;
        let len_sq = d.length_squared();
        if len_sq < 1e-12 {
            return None; // Degenerate segment
        }

        if self.contains(start) {
            return None;
        }

        let m = start - self.center;
        let b = m.dot(d);
        let c = m.length_squared() - self.radius * self.radius;

        let disc = b * b - len_sq * c;
        if disc < 0.0 {
            return None;
        }

        let t = (-b - disc.sqrt()) / len_sq;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }

        let point = start + d * t;
        let normal = (point - self.center).normalize_or_zero();
        Some((t, HitPoint { point, normal }))
    }
}

/// Collection of sphere obstacles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObstacleField {
    pub obstacles: Vec<SphereObstacle>,
    /// What `TriggerPolicy::UseGlobal` resolves to
    #[serde(default)]
    pub triggers_block_by_default: bool,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an obstacle, returning its index
    pub fn add(&mut self, obstacle: SphereObstacle) -> usize {
        self.obstacles.push(obstacle);
        self.obstacles.len() - 1
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut SphereObstacle> {
        self.obstacles.get_mut(index)
    }

    fn blocks(&self, obstacle: &SphereObstacle, mask: LayerMask, triggers: TriggerPolicy) -> bool {
        if !mask.contains(obstacle.layer) {
            return false;
        }
        if !obstacle.is_trigger {
            return true;
        }
        match triggers {
            TriggerPolicy::Collide => true,
            TriggerPolicy::Ignore => false,
            TriggerPolicy::UseGlobal => self.triggers_block_by_default,
        }
    }
}

impl LineOfSight for ObstacleField {
    fn query_hit(
        &self,
        start: Vec3,
        end: Vec3,
        mask: LayerMask,
        triggers: TriggerPolicy,
    ) -> Option<HitPoint> {
        self.obstacles
            .iter()
            .filter(|o| self.blocks(o, mask, triggers))
            .filter_map(|o| o.segment_hit(start, end))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, hit)| hit)
    }
}
