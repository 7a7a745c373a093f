use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use glam::Vec3;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use sweepline_core::{EngineConfig, LineSegment, SweepingTrailManager};
use sweepline_platform::HeadlessDevice;

fn main() {
    // Init logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter("info")
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    info!("Sweepline starting");
    if let Err(e) = run(std::env::args_os().nth(1).map(PathBuf::from)) {
        eprintln!("Sweepline error: {e}");
    }
}

/// Steps every configured trail against a headless device, sweeping each
/// header around a circle.
fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
    let config = match config_path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };

    let device = Arc::new(HeadlessDevice::new());
    let mut manager = SweepingTrailManager::new(device);
    for preset in &config.trails {
        manager.create_from_preset(preset)?;
    }

    let names: Vec<String> = manager.trail_names().map(str::to_owned).collect();
    for frame in 0..config.frames {
        let angle = frame as f32 * 0.2;
        let (sin, cos) = angle.sin_cos();
        for name in &names {
            if let Some(trail) = manager.trail_mut(name) {
                trail.set_header(LineSegment::new(
                    Vec3::new(10.0 * sin, 0.0, 10.0 * cos),
                    Vec3::new(5.0 * sin, 0.0, 5.0 * cos),
                ));
            }
        }
        manager.update_all(config.delta_time);
        for call in manager.draw_calls() {
            debug!(frame, buffer = ?call.buffer, vertices = call.vertex_count, "draw");
        }
    }

    for name in &names {
        if let Some(trail) = manager.trail(name) {
            info!(
                trail = %name,
                fixed = trail.fixed_segment_count(),
                vertices = trail.last_drawn_vertex_count(),
                capacity = trail.vertex_capacity(),
                "final trail state"
            );
        }
    }
    Ok(())
}
