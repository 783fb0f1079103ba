//! Visibility cutting
//!
//! Walks the generated curve segment by segment and truncates it at the
//! first obstruction. The query is re-issued on every pass; nothing is
//! cached because obstacles can move independently of the line.

use glam::Vec3;

use super::host::{HitPoint, LayerMask, LineOfSight, TriggerPolicy};

/// Where the line got cut
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstruction {
    pub hit: HitPoint,
    /// Index of the blocked segment (from sample `segment` to `segment + 1`)
    pub segment: usize,
}

/// Result of the latest cut pass
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CutState {
    obstruction: Option<Obstruction>,
}

impl CutState {
    pub fn clear() -> Self {
        Self::default()
    }

    pub fn is_obstructed(&self) -> bool {
        self.obstruction.is_some()
    }

    /// Exact position the line was truncated at
    pub fn cut_point(&self) -> Option<Vec3> {
        self.obstruction.map(|o| o.hit.point)
    }

    pub fn obstruction(&self) -> Option<&Obstruction> {
        self.obstruction.as_ref()
    }
}

/// Copy `generated` into `in_use`, stopping at the first blocked segment
///
/// On a hit, `in_use` ends with the exact hit point and no later segment is
/// queried. Without a hit, `in_use` equals `generated`.
pub fn cut_line(
    generated: &[Vec3],
    in_use: &mut Vec<Vec3>,
    line_of_sight: &dyn LineOfSight,
    mask: LayerMask,
    triggers: TriggerPolicy,
) -> CutState {
    in_use.clear();
    in_use.reserve(generated.len());

    let Some(&first) = generated.first() else {
        return CutState::clear();
    };
    in_use.push(first);

    for (segment, pair) in generated.windows(2).enumerate() {
        if let Some(hit) = line_of_sight.query_hit(pair[0], pair[1], mask, triggers) {
            in_use.push(hit.point);
            log::debug!("Line cut on segment {} at {:?}", segment, hit.point);
            return CutState {
                obstruction: Some(Obstruction { hit, segment }),
            };
        }
        in_use.push(pair[1]);
    }

    CutState::clear()
}
