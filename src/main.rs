//! Vantage - Orbit camera and grounded role movement demo
//!
//! Runs the stage headless, feeding it scripted keyboard and touch input
//! through the same collector a window would use, and logs the poses.

mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use glam::Vec2;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use winit::event::{ElementState, TouchPhase};
use winit::keyboard::{KeyCode, PhysicalKey};

use vantage_core::FrameClock;
use vantage_game::{InputCollector, Stage, StageCamera};

use settings::Settings;

/// Touch motion played during a phase, in window pixels per frame
#[derive(Debug, Clone, Copy)]
enum TouchScript {
    None,
    Swipe(Vec2),
    HoldAndSwipe(Vec2),
}

/// One stretch of held input
struct Phase {
    name: &'static str,
    keys: &'static [KeyCode],
    touch: TouchScript,
}

const SCRIPT: &[Phase] = &[
    Phase { name: "orbit left", keys: &[KeyCode::ArrowLeft], touch: TouchScript::None },
    Phase { name: "orbit up", keys: &[KeyCode::ArrowUp], touch: TouchScript::None },
    Phase {
        name: "walk forward",
        keys: &[KeyCode::ShiftLeft, KeyCode::KeyW],
        touch: TouchScript::None,
    },
    Phase { name: "zoom in", keys: &[KeyCode::Space, KeyCode::ArrowUp], touch: TouchScript::None },
    Phase { name: "idle", keys: &[], touch: TouchScript::None },
    Phase { name: "swipe", keys: &[], touch: TouchScript::Swipe(Vec2::new(4.0, 0.0)) },
    Phase {
        name: "hold and swipe",
        keys: &[],
        touch: TouchScript::HoldAndSwipe(Vec2::new(0.0, -3.0)),
    },
];

/// Touch ids used while scripting
const HOLD_FINGER: u64 = 0;
const SWIPE_FINGER: u64 = 1;

fn main() -> Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    info!("Starting Vantage...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_from(&PathBuf::from(path)),
        None => load_or_create_settings(),
    };

    let mut stage = Stage::new(settings.stage.clone()).context("Failed to build the stage")?;
    let mut clock = FrameClock::new(settings.time.clone());
    let mut input = InputCollector::new();

    for phase in SCRIPT {
        info!("Phase: {}", phase.name);
        run_phase(&mut stage, &mut clock, &mut input, phase, &settings);
    }

    info!(
        "Done after {} frames ({:.1}s simulated)",
        clock.frame_count, clock.total_time
    );
    Ok(())
}

/// Load settings from the config directory, writing defaults there on first run
fn load_or_create_settings() -> Settings {
    let exists = Settings::settings_path().is_some_and(|path| path.exists());
    let settings = Settings::load();
    if !exists {
        if let Err(e) = settings.save() {
            warn!("Could not write default settings: {}", e);
        }
    }
    settings
}

fn run_phase(
    stage: &mut Stage,
    clock: &mut FrameClock,
    input: &mut InputCollector,
    phase: &Phase,
    settings: &Settings,
) {
    for key in phase.keys {
        input.handle_keyboard(PhysicalKey::Code(*key), ElementState::Pressed);
    }

    let mut finger = Vec2::new(400.0, 300.0);
    let hold = Vec2::new(200.0, 300.0);
    match phase.touch {
        TouchScript::None => {}
        TouchScript::Swipe(_) => input.handle_touch_event(SWIPE_FINGER, TouchPhase::Started, finger),
        TouchScript::HoldAndSwipe(_) => {
            input.handle_touch_event(HOLD_FINGER, TouchPhase::Started, hold);
            input.handle_touch_event(SWIPE_FINGER, TouchPhase::Started, finger);
        }
    }

    for _ in 0..settings.demo.frames_per_phase {
        if let TouchScript::Swipe(step) | TouchScript::HoldAndSwipe(step) = phase.touch {
            finger += step;
            input.handle_touch_event(SWIPE_FINGER, TouchPhase::Moved, finger);
        }

        let dt = clock.tick(settings.demo.frame_time);
        stage.tick(&input.snapshot(), dt);
        input.end_frame();

        if settings.demo.log_interval > 0 && clock.frame_count % u64::from(settings.demo.log_interval) == 0 {
            log_poses(stage);
        }
    }

    input.clear_all();
}

fn log_poses(stage: &Stage) {
    let role = stage.role_position().unwrap_or_default();
    let camera = stage.camera_transform().unwrap_or_default();
    match &stage.camera {
        StageCamera::Orbit(orbit) => {
            let state = orbit.state();
            info!(
                "Frame {}: role {:.2?}, camera {:.2?}, orbit h={:.2} v={:.2} r={:.2}",
                stage.frame(),
                role,
                camera.position,
                state.horizontal_angle,
                state.vertical_angle,
                state.radius
            );
        }
        StageCamera::Free(free) => {
            info!(
                "Frame {}: role {:.2?}, camera {:.2?}, yaw={:.1} pitch={:.1} fov={:.1}",
                stage.frame(),
                role,
                camera.position,
                free.yaw(),
                free.pitch(),
                free.fov()
            );
        }
    }
}
