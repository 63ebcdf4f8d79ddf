//! Roaming Pet headless driver
//!
//! Runs a scripted session against the simulation core and logs snapshots.
//! Usage: `roaming-pet [settings.json]` (set `RUST_LOG=debug` for detail)

use glam::Vec2;

use roaming_pet::Runner;
use roaming_pet::settings::Settings;
use roaming_pet::sim::{Bounds, Command, Companion, DomainEvent, Gesture, Region, StreakStatus};

const FRAME_MS: f32 = 1000.0 / 60.0;

fn main() {
    env_logger::init();
    log::info!("Roaming Pet (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };

    let bounds = Bounds::new(1920.0, 1080.0);
    let start = Vec2::new(bounds.width / 2.0, settings.companion.height);
    let mut run = Runner::new().start(Companion::new(settings, bounds, start));

    // Editor window and taskbar to land on
    run.push(Command::Regions(vec![
        Region::new(700.0, 600.0, 900.0, 400.0).with_label("editor"),
        Region::new(0.0, 1040.0, 1920.0, 40.0).with_label("taskbar"),
    ]));
    run.push(Command::Pointer { x: 1400.0, y: 300.0 });

    let script: Vec<(u32, Command)> = vec![
        (60, Command::Event(DomainEvent::Typing)),
        (120, Command::Gesture(Gesture::Fling { vx: 900.0, vy: -1200.0 })),
        (
            240,
            Command::AttachRope {
                anchor: Vec2::new(960.0, 0.0),
                length: Some(300.0),
            },
        ),
        (300, Command::Gesture(Gesture::Drag { dx: 40.0, dy: 0.0 })),
        (420, Command::ReleaseRope),
        (
            540,
            Command::GrindSurface(Some(Region::new(0.0, 1040.0, 1920.0, 40.0).with_label("taskbar"))),
        ),
        (
            560,
            Command::StartRoll {
                x: 400.0,
                y: 940.0,
                speed: 6.0,
            },
        ),
        (600, Command::Tilt(0.5)),
        (620, Command::Gesture(Gesture::Tap)),
        (700, Command::StopRoll),
        (760, Command::Event(DomainEvent::CiFailing)),
        (900, Command::Event(DomainEvent::AgentPrMerged)),
        (1000, Command::Streak(StreakStatus::derive(12, false, 20))),
    ];

    let mut script = script.into_iter().peekable();
    for frame in 0..1200u32 {
        while let Some((_, command)) = script.next_if(|(at, _)| *at == frame) {
            log::info!("Frame {frame}: {command:?}");
            run.push(command);
        }
        let snapshot = run.advance(FRAME_MS);
        if frame % 60 == 0 {
            log::info!(
                "Frame {frame}: ({:.1}, {:.1}) {:?} #{} gaze ({:.2}, {:.2})",
                snapshot.position.x,
                snapshot.position.y,
                snapshot.state,
                snapshot.frame,
                snapshot.gaze.x,
                snapshot.gaze.y
            );
        }
    }

    let pet = run.stop();
    match serde_json::to_string(&pet.snapshot()) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize final snapshot: {e}"),
    }
}
