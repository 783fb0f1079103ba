//! Stateful line building
//!
//! Control points, host collaborators, visibility cutting and the rebuild
//! scheduler that ties them to the curve sampler.

pub mod anchors;
pub mod builder;
pub mod control_point;
pub mod cut;
pub mod host;
pub mod obstacles;
pub mod schedule;

pub use anchors::AnchorSet;
pub use builder::{BuilderPhase, LineBuilder, UpdateOutcome};
pub use control_point::{ControlPoint, ControlPoints, PointSlot};
pub use cut::{CutState, Obstruction, cut_line};
pub use host::{
    AnchorId, AnchorSource, ClearSight, Frame, HitPoint, LayerMask, LineHost, LineOfSight,
    PointSink, TriggerPolicy,
};
pub use obstacles::{ObstacleField, SphereObstacle};
pub use schedule::IntervalTimer;
