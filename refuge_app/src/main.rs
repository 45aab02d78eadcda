//! Headless refuge simulation
//!
//! Builds the scene from a config file, then runs a fixed-step loop with a
//! wandering pointer and an occasional change of population targets.
//!
//! Usage: `refuge [config.toml|config.ron] [seconds]`

use log::{error, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use refuge_engine::foundation::logging;
use refuge_engine::prelude::*;

/// Simulation step in seconds
const STEP: f32 = 1.0 / 30.0;

const VIEWPORT: (u32, u32) = (800, 600);

#[derive(Error, Debug)]
enum AppError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("scene: {0}")]
    Scene(#[from] SceneError),

    #[error("invalid duration '{0}'")]
    Duration(String),
}

struct RefugeApp {
    registry: SceneRegistry,
    bridge: MemoryBridge,
    sync: PopulationSync,
    growth: GrowthRule,
    clock: DayClock,
    timer: FrameTimer,
    camera: PickCamera,
    pointer: PointerState,
    rng: StdRng,
}

impl RefugeApp {
    fn new(config: SimulationConfig) -> Result<Self, AppError> {
        let mut registry = SceneRegistry::new(config.clone());
        registry.events_mut().register_handler(
            EventType::Describe,
            Box::new(|event: &SceneEvent| {
                if let SceneEvent::Describe { name, .. } = event {
                    info!("info popup: {name}");
                }
                false
            }),
        );
        registry.events_mut().register_handler(
            EventType::DescribeMany,
            Box::new(|event: &SceneEvent| {
                if let SceneEvent::DescribeMany { names } = event {
                    info!("info popup: {}", names.join(", "));
                }
                false
            }),
        );
        registry.populate_scenery()?;

        let mut bridge = MemoryBridge::with_initial(&config.initial);
        let sync = PopulationSync::new();
        sync.connect(&mut bridge);
        sync.initial_pass(&bridge, &mut registry)?;

        let rng = config.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let camera = PickCamera::looking_at(
            Vec3::new(0.0, 120.0, 120.0),
            Vec3::zeros(),
            VIEWPORT.0 as f32 / VIEWPORT.1 as f32,
        );

        Ok(Self {
            registry,
            bridge,
            sync,
            growth: GrowthRule::new(&config.growth),
            clock: DayClock::new(config.growth.seconds_per_day),
            timer: FrameTimer::new(),
            camera,
            pointer: PointerState::new(VIEWPORT.0, VIEWPORT.1),
            rng,
        })
    }

    fn run(&mut self, seconds: f32) -> Result<(), AppError> {
        let frames = (seconds / STEP).ceil() as u64;
        let retarget_frame = frames / 2;
        let mut eaten = 0;

        for frame in 0..frames {
            let elapsed = self.timer.advance(STEP);
            self.wander_pointer(frame);

            if frame == retarget_frame {
                let hares = self.rng.gen_range(1..=8);
                info!("population target changed: hares -> {hares}");
                self.bridge.set("hares", hares);
            }
            self.sync.apply_pending(&mut self.registry)?;

            let summary = self.registry.tick(elapsed);
            eaten += summary.removed;

            self.clock.set_elapsed(elapsed);
            self.growth.apply(&self.clock, &mut self.registry)?;
        }

        info!(
            "ran {} frames ({:.1}s, day {}): {} entities, {} hares, {} trees, {} grass eaten",
            self.timer.frame_count(),
            self.timer.total_time(),
            self.clock.current_day(),
            self.registry.len(),
            self.registry.count_of_kind(EntityKind::Hare),
            self.registry.count_of_kind(EntityKind::Tree),
            eaten,
        );
        Ok(())
    }

    fn wander_pointer(&mut self, frame: u64) {
        let x = self.rng.gen_range(0.0..f64::from(VIEWPORT.0));
        let y = self.rng.gen_range(0.0..f64::from(VIEWPORT.1));
        self.pointer.update_position(x, y);

        let Some(ray) = self.camera.pointer_ray(&self.pointer) else {
            return;
        };
        self.registry.handle_hover(&ray);
        // Click about once a second
        if frame % 30 == 0 {
            self.registry.handle_click(&ray);
        }
    }
}

fn load_config(path: Option<&str>) -> Result<SimulationConfig, AppError> {
    let config = match path {
        Some(path) => {
            info!("loading configuration from {path}");
            SimulationConfig::load_from_file(path)?
        }
        None => SimulationConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn start() -> Result<(), AppError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = load_config(args.first().map(String::as_str))?;
    let seconds = match args.get(1) {
        Some(raw) => raw.parse::<f32>().map_err(|_| AppError::Duration(raw.clone()))?,
        None => 30.0,
    };

    let mut app = RefugeApp::new(config)?;
    app.run(seconds)
}

fn main() -> Result<(), AppError> {
    logging::init();
    info!("Starting refuge simulation");

    start().map_err(|err| {
        error!("Simulation failed: {err}");
        err
    })
}
