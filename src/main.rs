//! Curve Lines demo
//!
//! Drives a single line through a short fixed-timestep simulation: the end
//! anchor bobs up and down while a sphere sweeps across the line. Pass a
//! JSON settings file as the first argument to override the defaults.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::{Affine3A, Vec3};

    use curve_lines::line::{ObstacleField, SphereObstacle};
    use curve_lines::{
        AnchorSet, AnchorSource, ControlPoint, CurveKind, LineBuilder, LineHost, LineSettings,
        PointSlot, UpdateOutcome,
    };

    /// Simulation step (seconds)
    const SIM_DT: f32 = 1.0 / 120.0;
    /// Max sim steps per frame (prevents spiral of death)
    const MAX_SUBSTEPS: u32 = 8;
    /// Frame time of the fake render loop
    const FRAME_DT: f32 = 1.0 / 60.0;
    const DEMO_SECONDS: f32 = 2.0;

    #[derive(Debug, Default)]
    struct Tally {
        rebuilt: u32,
        recut: u32,
        skipped: u32,
    }

    impl Tally {
        fn record(&mut self, outcome: UpdateOutcome) {
            match outcome {
                UpdateOutcome::Rebuilt => self.rebuilt += 1,
                UpdateOutcome::Recut => self.recut += 1,
                UpdateOutcome::Skipped => self.skipped += 1,
                UpdateOutcome::Unchanged => {}
            }
        }
    }

    fn default_settings() -> LineSettings {
        let mut settings = LineSettings::for_kind(CurveKind::SpiralRight);
        settings.curve.sample_count = 48;
        settings.curve.amplitude = 3;
        settings.curve.wave_power = 1.0;
        settings.cutting.enabled = true;
        settings.cutting.dynamic = true;
        settings.cutting.interval = 0.05;
        settings.seed = 7;
        settings
    }

    fn load_settings() -> LineSettings {
        let Some(path) = std::env::args().nth(1) else {
            return default_settings();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => LineSettings::load_or_default(&json),
            Err(err) => {
                log::warn!("Could not read {}: {}, using demo settings", path, err);
                default_settings()
            }
        }
    }

    pub fn run() {
        let settings = load_settings();
        log::info!("Demo line: {}", settings.kind.as_str());

        let frame = Affine3A::from_translation(Vec3::new(0.0, 1.0, 0.0));
        let mut anchors = AnchorSet::new();
        let end = anchors.spawn(Vec3::new(12.0, 1.0, 0.0));

        let mut obstacles = ObstacleField::new();
        let blocker = obstacles.add(SphereObstacle::new(Vec3::new(6.0, 1.0, -8.0), 1.5));

        let mut line = LineBuilder::new(settings, Default::default());
        line.set_control_point(PointSlot::Start, ControlPoint::LocalOffset(Vec3::ZERO));
        line.bind_anchor(PointSlot::End, end);

        let mut points: Vec<Vec3> = Vec::new();
        let mut tally = Tally::default();
        let mut accumulator = 0.0;
        let mut time = 0.0;

        while time < DEMO_SECONDS {
            accumulator += FRAME_DT;

            let mut substeps = 0;
            while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                time += SIM_DT;
                anchors.set_anchor_position(end, Vec3::new(12.0, 1.0 + (time * 2.0).sin(), 0.0));
                if let Some(sphere) = obstacles.get_mut(blocker) {
                    sphere.center.z = -8.0 + time * 8.0;
                }

                let mut host =
                    LineHost::new(&frame, &mut anchors, &obstacles).with_sink(&mut points);
                tally.record(line.update(&mut host, SIM_DT));

                accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        println!(
            "{:.2}s: {} rebuilds, {} re-cuts, {} skipped",
            time, tally.rebuilt, tally.recut, tally.skipped
        );
        println!(
            "{} of {} samples in use, length {:.3}, cut at {:?}",
            line.in_use().len(),
            line.generated().len(),
            line.length(),
            line.cut_state().cut_point()
        );
        for p in &points {
            println!("  {:>8.3} {:>8.3} {:>8.3}", p.x, p.y, p.z);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Curve Lines demo starting...");
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on the web; hosts drive LineBuilder themselves
}
