//! Line settings
//!
//! The parameter surface of a line. Plain values: changing a field does
//! nothing until the next rebuild. Persisted as JSON by the host.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::curve::{CurveKind, CurveParams};
use crate::line::{LayerMask, TriggerPolicy};

/// Visibility cutting options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutSettings {
    /// Truncate the line at the first obstruction
    pub enabled: bool,
    /// Re-run cutting on a timer even when the line did not move
    pub dynamic: bool,
    /// Seconds between dynamic cut passes (0 = every update)
    pub interval: f32,
    /// Layers that can block the line
    pub mask: LayerMask,
    /// Whether trigger volumes block the line
    pub triggers: TriggerPolicy,
}

impl Default for CutSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            dynamic: false,
            interval: 0.0,
            mask: LayerMask::ALL,
            triggers: TriggerPolicy::UseGlobal,
        }
    }
}

/// Line parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineSettings {
    /// Curve shape
    pub kind: CurveKind,
    /// Sample count, noise, amplitude and wave power
    pub curve: CurveParams,

    // === Cutting ===
    pub cutting: CutSettings,

    // === Scheduling ===
    /// Regenerate the curve every `rebuild_interval` seconds
    pub auto_rebuild: bool,
    /// Seconds between automatic rebuilds
    pub rebuild_interval: f32,

    // === Endpoint distance ===
    /// Let distance changes move an anchor-bound end point
    pub allow_move_endpoint: bool,
    /// Pending manual distance, applied on the next update
    pub distance_override: Option<f32>,

    // === Output ===
    /// Push results to the point sink
    pub use_sink: bool,
    /// Seed for basis and noise randomness
    pub seed: u64,
}

impl Default for LineSettings {
    fn default() -> Self {
        Self {
            kind: CurveKind::Linear,
            curve: CurveParams::default(),

            cutting: CutSettings::default(),

            auto_rebuild: false,
            rebuild_interval: DEFAULT_REBUILD_INTERVAL,

            allow_move_endpoint: false,
            distance_override: None,

            use_sink: true,
            seed: 0,
        }
    }
}

impl LineSettings {
    /// Default settings for a given curve kind
    pub fn for_kind(kind: CurveKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Clamp out-of-range values in place
    pub fn sanitize(&mut self) {
        self.curve = self.curve.sanitized();
        if self.rebuild_interval < 0.0 {
            log::warn!("Negative rebuild interval {}, clamping to 0", self.rebuild_interval);
            self.rebuild_interval = 0.0;
        }
        self.cutting.interval = self.cutting.interval.max(0.0);
        if let Some(d) = self.distance_override {
            self.distance_override = Some(d.max(0.0));
        }
    }

    /// Whether cutting runs on its own timer
    pub fn dynamic_cutting(&self) -> bool {
        self.cutting.enabled && self.cutting.dynamic
    }

    /// Whether the builder needs timer ticks at all
    pub fn needs_ticking(&self) -> bool {
        self.auto_rebuild || self.dynamic_cutting()
    }

    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse settings, falling back to defaults on malformed input
    pub fn load_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded line settings ({})", settings.kind.as_str());
                settings
            }
            Err(err) => {
                log::warn!("Invalid line settings ({}), using defaults", err);
                Self::default()
            }
        }
    }
}
