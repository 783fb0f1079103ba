//! Host collaborators
//!
//! The line builder never owns the scene. Everything it reads or writes
//! outside itself goes through these traits, bundled per call in `LineHost`.

use glam::{Affine3A, Vec3};
use serde::{Deserialize, Serialize};

/// Stable handle to an external object a control point can track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnchorId(pub u32);

/// Owning frame of local-offset control points
pub trait Frame {
    fn local_to_world_point(&self, local: Vec3) -> Vec3;
    fn world_to_local_point(&self, world: Vec3) -> Vec3;
}

impl Frame for Affine3A {
    fn local_to_world_point(&self, local: Vec3) -> Vec3 {
        self.transform_point3(local)
    }

    fn world_to_local_point(&self, world: Vec3) -> Vec3 {
        self.inverse().transform_point3(world)
    }
}

/// World positions of anchor objects
pub trait AnchorSource {
    /// Current position, `None` if the anchor no longer exists
    fn anchor_position(&self, id: AnchorId) -> Option<Vec3>;

    /// Move an anchor; returns false if it does not exist
    fn set_anchor_position(&mut self, id: AnchorId, position: Vec3) -> bool;
}

/// Bitmask of collision layers a cut query considers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);

    /// Mask containing a single layer (0..32)
    pub fn layer(layer: u8) -> Self {
        LayerMask(1u32.checked_shl(layer as u32).unwrap_or(0))
    }

    #[inline]
    pub fn contains(&self, layer: u8) -> bool {
        self.0 & Self::layer(layer).0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

/// Whether trigger volumes obstruct the line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TriggerPolicy {
    /// Defer to the collision backend's global setting
    #[default]
    UseGlobal,
    Ignore,
    Collide,
}

/// Where a line-of-sight query was blocked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HitPoint {
    pub point: Vec3,
    /// Surface normal at the hit (zero if the backend does not report one)
    pub normal: Vec3,
}

impl HitPoint {
    pub fn at(point: Vec3) -> Self {
        Self {
            point,
            normal: Vec3::ZERO,
        }
    }
}

/// Segment obstruction query
pub trait LineOfSight {
    /// First obstruction between `start` and `end`, if any
    fn query_hit(
        &self,
        start: Vec3,
        end: Vec3,
        mask: LayerMask,
        triggers: TriggerPolicy,
    ) -> Option<HitPoint>;
}

/// Line-of-sight that never reports a hit
#[derive(Debug, Clone, Copy, Default)]
pub struct ClearSight;

impl LineOfSight for ClearSight {
    fn query_hit(&self, _: Vec3, _: Vec3, _: LayerMask, _: TriggerPolicy) -> Option<HitPoint> {
        None
    }
}

/// Consumer of the final point sequence (e.g. a line renderer)
pub trait PointSink {
    fn set_positions(&mut self, points: &[Vec3]);
}

impl PointSink for Vec<Vec3> {
    fn set_positions(&mut self, points: &[Vec3]) {
        self.clear();
        self.extend_from_slice(points);
    }
}

/// Collaborators handed to the builder for one call
pub struct LineHost<'a> {
    pub frame: &'a dyn Frame,
    pub anchors: &'a mut dyn AnchorSource,
    pub line_of_sight: &'a dyn LineOfSight,
    pub sink: Option<&'a mut dyn PointSink>,
}

impl<'a> LineHost<'a> {
    pub fn new(
        frame: &'a dyn Frame,
        anchors: &'a mut dyn AnchorSource,
        line_of_sight: &'a dyn LineOfSight,
    ) -> Self {
        Self {
            frame,
            anchors,
            line_of_sight,
            sink: None,
        }
    }

    /// Attach a point sink
    pub fn with_sink(mut self, sink: &'a mut dyn PointSink) -> Self {
        self.sink = Some(sink);
        self
    }
}
