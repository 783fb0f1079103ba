//! Line builder
//!
//! Owns a line's parameters, control points and point sequences, and
//! decides when to regenerate. Driven from the host's per-frame update:
//!
//! 1. Resolve control points to world space
//! 2. Update direction and distance
//! 3. Generate the curve into the reusable "generated" buffer
//! 4. Cut it against line-of-sight (or copy it) into the "in use" buffer
//! 5. Measure the in-use polyline
//! 6. Push the in-use points to the sink
//!
//! The sink only ever sees the result of a finished pipeline.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::control_point::{ControlPoint, ControlPoints, PointSlot, position};
use super::cut::{CutState, cut_line};
use super::host::{AnchorId, LineHost};
use super::schedule::IntervalTimer;
use crate::consts::*;
use crate::curve::{ControlPositions, CurveSampler, OrthogonalBasis};
use crate::polyline_length;
use crate::settings::LineSettings;

/// Lifecycle of a builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuilderPhase {
    /// No geometry yet
    Idle,
    /// Holds a generated and an in-use sequence
    Built,
}

/// What an update did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Nothing was due
    Unchanged,
    /// Curve regenerated (and re-cut)
    Rebuilt,
    /// Only the cut was recomputed on the existing curve
    Recut,
    /// A rebuild was due but a bound anchor is missing
    Skipped,
}

/// Stateful generator for one line
#[derive(Debug, Clone)]
pub struct LineBuilder {
    settings: LineSettings,
    points: ControlPoints,
    phase: BuilderPhase,

    sampler: CurveSampler,
    basis: OrthogonalBasis,

    /// World positions from the last resolve
    positions: ControlPositions,
    direction: Vec3,
    distance: f32,

    generated: Vec<Vec3>,
    in_use: Vec<Vec3>,
    cut: CutState,
    length: f32,

    rebuild_timer: IntervalTimer,
    cut_timer: IntervalTimer,
    rebuild_requested: bool,
    anchors_missing: bool,
}

impl Default for LineBuilder {
    fn default() -> Self {
        Self::new(LineSettings::default(), ControlPoints::default())
    }
}

impl LineBuilder {
    pub fn new(mut settings: LineSettings, points: ControlPoints) -> Self {
        settings.sanitize();
        let capacity = settings.curve.sample_count;

        Self {
            sampler: CurveSampler::new(settings.seed),
            settings,
            points,
            phase: BuilderPhase::Idle,
            basis: OrthogonalBasis::default(),
            positions: ControlPositions::default(),
            direction: Vec3::ZERO,
            distance: 0.0,
            generated: Vec::with_capacity(capacity),
            in_use: Vec::with_capacity(capacity),
            cut: CutState::clear(),
            length: 0.0,
            rebuild_timer: IntervalTimer::new(),
            cut_timer: IntervalTimer::new(),
            rebuild_requested: false,
            anchors_missing: false,
        }
    }

    // === Accessors ===

    pub fn settings(&self) -> &LineSettings {
        &self.settings
    }

    /// Direct settings access; takes effect on the next rebuild trigger
    pub fn settings_mut(&mut self) -> &mut LineSettings {
        &mut self.settings
    }

    pub fn control_points(&self) -> &ControlPoints {
        &self.points
    }

    pub fn phase(&self) -> BuilderPhase {
        self.phase
    }

    /// Full curve from the last rebuild
    pub fn generated(&self) -> &[Vec3] {
        &self.generated
    }

    /// Curve as handed to the sink (possibly cut short)
    pub fn in_use(&self) -> &[Vec3] {
        &self.in_use
    }

    pub fn cut_state(&self) -> &CutState {
        &self.cut
    }

    pub fn is_cut(&self) -> bool {
        self.cut.is_obstructed()
    }

    /// Polyline length of the in-use sequence
    pub fn length(&self) -> f32 {
        self.length
    }

    /// Normalized start→end direction (zero if degenerate)
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Start→end separation
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// World positions used by the last rebuild
    pub fn positions(&self) -> &ControlPositions {
        &self.positions
    }

    pub fn basis(&self) -> &OrthogonalBasis {
        &self.basis
    }

    // === Parameter changes ===

    /// Replace all settings and rebuild on the next update
    pub fn apply_settings(&mut self, mut settings: LineSettings) {
        settings.sanitize();
        if settings.seed != self.sampler.seed() {
            self.sampler = CurveSampler::new(settings.seed);
        }
        self.settings = settings;
        self.reserve(self.settings.curve.sample_count);
        self.request_rebuild();
    }

    /// Change the sample count, growing both buffers up front
    pub fn set_sample_count(&mut self, sample_count: usize) {
        self.settings.curve.sample_count = sample_count;
        self.settings.curve = self.settings.curve.sanitized();
        self.reserve(self.settings.curve.sample_count);
    }

    fn reserve(&mut self, capacity: usize) {
        self.generated.reserve(capacity.saturating_sub(self.generated.len()));
        self.in_use.reserve(capacity.saturating_sub(self.in_use.len()));
    }

    pub fn set_control_point(&mut self, slot: PointSlot, point: ControlPoint) {
        self.points.set(slot, point);
        self.request_rebuild();
    }

    /// Make a slot track an anchor
    pub fn bind_anchor(&mut self, slot: PointSlot, id: AnchorId) {
        self.set_control_point(slot, ControlPoint::Anchor(id));
    }

    /// Turn an anchor-bound slot into a local offset at the same world position
    ///
    /// Falls back to the last resolved position if the anchor is gone.
    /// Returns false if the slot already was a local offset.
    pub fn detach_to_local(&mut self, host: &LineHost, slot: PointSlot) -> bool {
        let point = self.points.get(slot);
        let ControlPoint::Anchor(_) = point else {
            return false;
        };

        let world = point
            .resolve(host.frame, &*host.anchors)
            .unwrap_or_else(|| position(&self.positions, slot));
        let local = host.frame.world_to_local_point(world);
        self.set_control_point(slot, ControlPoint::LocalOffset(local));
        true
    }

    /// Ask for a full rebuild on the next update
    pub fn request_rebuild(&mut self) {
        self.rebuild_requested = true;
    }

    // === Per-frame driving ===

    /// Advance by `dt` seconds, rebuilding or re-cutting as needed
    pub fn update(&mut self, host: &mut LineHost, dt: f32) -> UpdateOutcome {
        if let Some(distance) = self.settings.distance_override.take() {
            self.set_endpoint_distance(host, distance);
        }

        if self.phase == BuilderPhase::Idle || self.rebuild_requested || self.control_points_moved(host)
        {
            self.rebuild_timer.reset();
            return self.rebuild(host);
        }

        if !self.settings.needs_ticking() {
            return UpdateOutcome::Unchanged;
        }

        let rebuild_due = self.settings.auto_rebuild
            && self.rebuild_timer.tick(dt, self.settings.rebuild_interval);
        let cut_due = self.settings.dynamic_cutting()
            && self.cut_timer.tick(dt, self.settings.cutting.interval);

        if rebuild_due {
            self.rebuild(host)
        } else if cut_due {
            self.recut(host)
        } else {
            UpdateOutcome::Unchanged
        }
    }

    /// Regenerate the curve now
    pub fn rebuild(&mut self, host: &mut LineHost) -> UpdateOutcome {
        let kind = self.settings.kind;
        let (positions, missing) =
            self.points
                .resolve(kind, host.frame, &*host.anchors, &self.positions);
        self.positions = positions;

        if !missing.is_empty() {
            if !self.anchors_missing {
                log::warn!("Anchors missing for {:?}, keeping previous line", missing);
            }
            self.anchors_missing = true;
            return UpdateOutcome::Skipped;
        }
        if self.anchors_missing {
            log::info!("Anchors restored, rebuilding line");
            self.anchors_missing = false;
        }

        let axis = positions.axis();
        self.direction = axis.normalize_or_zero();
        self.distance = axis.length();

        self.sampler.generate(
            kind,
            &self.positions,
            &self.settings.curve,
            &mut self.basis,
            &mut self.generated,
        );
        self.apply_cut(host);

        self.rebuild_requested = false;
        self.phase = BuilderPhase::Built;
        self.push(host);

        log::debug!(
            "Rebuilt {} line: {} samples, {} in use, length {:.3}",
            kind.as_str(),
            self.generated.len(),
            self.in_use.len(),
            self.length
        );
        UpdateOutcome::Rebuilt
    }

    /// Recompute only the cut on the current curve
    pub fn recut(&mut self, host: &mut LineHost) -> UpdateOutcome {
        if self.phase == BuilderPhase::Idle {
            return self.rebuild(host);
        }
        self.apply_cut(host);
        self.push(host);
        UpdateOutcome::Recut
    }

    /// Place the end point `distance` away from the start
    ///
    /// Anchor-bound end points are moved along the current direction, but
    /// only when `allow_move_endpoint` is set. Local offsets are rescaled.
    /// Returns true only if the end point changed and the line was rebuilt;
    /// a missing anchor leaves the change pending for the next rebuild.
    pub fn set_endpoint_distance(&mut self, host: &mut LineHost, distance: f32) -> bool {
        let distance = distance.max(0.0);

        match self.points.end {
            ControlPoint::Anchor(id) => {
                if !self.settings.allow_move_endpoint {
                    log::debug!("Endpoint anchor {:?} is not movable, ignoring distance", id);
                    return false;
                }

                let start = self
                    .points
                    .start
                    .resolve(host.frame, &*host.anchors)
                    .unwrap_or(self.positions.start);
                let end = host.anchors.anchor_position(id).unwrap_or(self.positions.end);
                let mut direction = (end - start).normalize_or_zero();
                if direction.length_squared() <= ZERO_LENGTH_SQ {
                    direction = self.direction;
                }
                if direction.length_squared() <= ZERO_LENGTH_SQ {
                    log::warn!("Cannot place endpoint: line has no direction");
                    return false;
                }

                if !host.anchors.set_anchor_position(id, start + direction * distance) {
                    log::warn!("Endpoint anchor {:?} is missing", id);
                    return false;
                }
            }
            ControlPoint::LocalOffset(offset) => {
                let direction = offset.normalize_or_zero();
                if direction.length_squared() <= ZERO_LENGTH_SQ {
                    log::warn!("Cannot rescale a zero endpoint offset");
                    return false;
                }
                self.points.end = ControlPoint::LocalOffset(direction * distance);
            }
        }

        self.rebuild(host) == UpdateOutcome::Rebuilt
    }

    // === Internals ===

    /// Snapshot-compare the read control points against the last rebuild
    fn control_points_moved(&self, host: &LineHost) -> bool {
        let kind = self.settings.kind;
        let (current, missing) =
            self.points
                .resolve(kind, host.frame, &*host.anchors, &self.positions);

        if !missing.is_empty() {
            return false;
        }
        if self.anchors_missing {
            return true;
        }

        PointSlot::used_by(kind).iter().any(|&slot| {
            !position(&current, slot).abs_diff_eq(position(&self.positions, slot), MOVE_EPSILON)
        })
    }

    /// Derive the in-use sequence and its length from the generated one
    fn apply_cut(&mut self, host: &LineHost) {
        if self.settings.cutting.enabled {
            self.cut = cut_line(
                &self.generated,
                &mut self.in_use,
                host.line_of_sight,
                self.settings.cutting.mask,
                self.settings.cutting.triggers,
            );
        } else {
            self.in_use.clear();
            self.in_use.extend_from_slice(&self.generated);
            self.cut = CutState::clear();
        }
        self.length = polyline_length(&self.in_use);
    }

    fn push(&self, host: &mut LineHost) {
        if !self.settings.use_sink {
            return;
        }
        if let Some(sink) = host.sink.as_deref_mut() {
            sink.set_positions(&self.in_use);
        }
    }
}
