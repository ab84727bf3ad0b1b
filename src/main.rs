/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::{GameConfig, LogConfig};
use domain::clock::Millis;
use sim::session::SessionController;
use ui::gamepad::GamepadState;
use ui::input::{intent_for_key, InputState, RawInput};
use ui::renderer::Renderer;
use ui::sound::SoundEngine;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    let config = GameConfig::load();
    init_logging(&config.log);

    let mut ctl = match SessionController::new(config.rules.clone()) {
        Ok(ctl) => ctl,
        Err(e) => {
            eprintln!("Invalid desk layout: {e}");
            return;
        }
    };

    let mut renderer = Renderer::new();

    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();
    if sound.is_none() {
        warn!("no audio output device, sound disabled");
    }

    let result = game_loop(&mut ctl, &mut renderer, sound.as_ref(), &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }

    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    info!(phase = ctl.phase().name(), "session ended");
    println!();
    println!("Thanks for playing Cyber Detective. Stay suspicious out there!");
}

/// Logs go to a file so they never tear the alternate screen.
/// `RUST_LOG` overrides the configured level. If the file cannot be
/// opened the game runs without logging.
fn init_logging(cfg: &LogConfig) {
    let file = match File::create(&cfg.file) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: cannot open log file {}: {e}", cfg.file.display());
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn game_loop(
    ctl: &mut SessionController,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
    config: &GameConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut gp = GamepadState::new();
    gp.load_button_config(&config.gamepad);
    let origin = Instant::now();
    let mut last_tick = origin;
    let tick_rate = Duration::from_millis(config.tick_rate_ms);

    loop {
        kb.drain_events();
        gp.update();

        if kb.ctrl_c_pressed() {
            break;
        }

        let phase = ctl.phase();
        for raw in &kb.raw_events {
            let intent = match *raw {
                RawInput::Key(key) => intent_for_key(phase, &key),
                RawInput::Click { col, row } => renderer
                    .canvas_point(col, row)
                    .map(|(x, y)| sim::intent::Intent::Click { x, y }),
            };
            if let Some(intent) = intent {
                ctl.push(intent);
            }
        }
        for intent in gp.intents(phase) {
            ctl.push(intent);
        }

        let now = origin.elapsed().as_millis() as Millis;
        if last_tick.elapsed() >= tick_rate {
            let events = ctl.tick(now);
            if let Some(sfx) = sound {
                sfx.play_events(&events);
            }
            last_tick = Instant::now();
        }

        if ctl.exit_requested() {
            break;
        }

        renderer.render(&ctl.snapshot(now), gp.pointer())?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}
