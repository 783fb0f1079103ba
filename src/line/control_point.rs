//! Control points: anchor-bound or frame-relative
//!
//! A control point either tracks an external anchor or stores an offset in
//! the owning frame. Both resolve to a world position on every rebuild.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::host::{AnchorId, AnchorSource, Frame};
use crate::curve::{ControlPositions, CurveKind};

/// Where a control point takes its position from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ControlPoint {
    /// Tracks an external anchor's world position
    Anchor(AnchorId),
    /// Offset relative to the owning frame
    LocalOffset(Vec3),
}

impl Default for ControlPoint {
    fn default() -> Self {
        ControlPoint::LocalOffset(Vec3::ZERO)
    }
}

impl ControlPoint {
    /// World position, `None` if the bound anchor is gone
    pub fn resolve(&self, frame: &dyn Frame, anchors: &dyn AnchorSource) -> Option<Vec3> {
        match self {
            ControlPoint::Anchor(id) => anchors.anchor_position(*id),
            ControlPoint::LocalOffset(offset) => Some(frame.local_to_world_point(*offset)),
        }
    }

    pub fn anchor(&self) -> Option<AnchorId> {
        match self {
            ControlPoint::Anchor(id) => Some(*id),
            ControlPoint::LocalOffset(_) => None,
        }
    }
}

/// Named control point positions of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointSlot {
    Start,
    End,
    Control1,
    Control2,
}

impl PointSlot {
    pub const ALL: [PointSlot; 4] = [
        PointSlot::Start,
        PointSlot::End,
        PointSlot::Control1,
        PointSlot::Control2,
    ];

    /// Slots read by a curve kind
    pub fn used_by(kind: CurveKind) -> &'static [PointSlot] {
        match kind.control_point_count() {
            4 => &Self::ALL,
            3 => &[PointSlot::Start, PointSlot::End, PointSlot::Control1],
            _ => &[PointSlot::Start, PointSlot::End],
        }
    }
}

/// The four control points of a line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoints {
    pub start: ControlPoint,
    pub end: ControlPoint,
    pub control1: ControlPoint,
    pub control2: ControlPoint,
}

impl Default for ControlPoints {
    fn default() -> Self {
        Self {
            start: ControlPoint::LocalOffset(Vec3::ZERO),
            end: ControlPoint::LocalOffset(Vec3::Y),
            control1: ControlPoint::LocalOffset(Vec3::ZERO),
            control2: ControlPoint::LocalOffset(Vec3::Y * 2.0),
        }
    }
}

impl ControlPoints {
    pub fn get(&self, slot: PointSlot) -> ControlPoint {
        match slot {
            PointSlot::Start => self.start,
            PointSlot::End => self.end,
            PointSlot::Control1 => self.control1,
            PointSlot::Control2 => self.control2,
        }
    }

    pub fn set(&mut self, slot: PointSlot, point: ControlPoint) {
        match slot {
            PointSlot::Start => self.start = point,
            PointSlot::End => self.end = point,
            PointSlot::Control1 => self.control1 = point,
            PointSlot::Control2 => self.control2 = point,
        }
    }

    /// Resolve every slot to world space
    ///
    /// Slots whose anchor is gone keep their `last_known` position. The
    /// returned list names the missing slots that `kind` actually reads.
    pub fn resolve(
        &self,
        kind: CurveKind,
        frame: &dyn Frame,
        anchors: &dyn AnchorSource,
        last_known: &ControlPositions,
    ) -> (ControlPositions, Vec<PointSlot>) {
        let mut positions = *last_known;
        let mut missing = Vec::new();

        for slot in PointSlot::ALL {
            match self.get(slot).resolve(frame, anchors) {
                Some(world) => set_position(&mut positions, slot, world),
                None if PointSlot::used_by(kind).contains(&slot) => missing.push(slot),
                None => {}
            }
        }

        (positions, missing)
    }
}

/// Read a slot from resolved positions
pub fn position(positions: &ControlPositions, slot: PointSlot) -> Vec3 {
    match slot {
        PointSlot::Start => positions.start,
        PointSlot::End => positions.end,
        PointSlot::Control1 => positions.control1,
        PointSlot::Control2 => positions.control2,
    }
}

/// Write a slot of resolved positions
pub fn set_position(positions: &mut ControlPositions, slot: PointSlot, world: Vec3) {
    match slot {
        PointSlot::Start => positions.start = world,
        PointSlot::End => positions.end = world,
        PointSlot::Control1 => positions.control1 = world,
        PointSlot::Control2 => positions.control2 = world,
    }
}
