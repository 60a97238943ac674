//! Application wiring for the `cadence` binary.
//!
//! `cadence [LIBRARY_DIR] [QUERY]`. Builds the catalog, engine and controller, attaches observers and runs
//! the control loop until asked to quit.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::catalog::LocalCatalog;
use crate::engine::RodioEngine;
use crate::logging;
use crate::media::MediaResolver;
use crate::player::{PlaybackController, PlayerRemote};

mod event_loop;
mod now_playing;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_problem) = settings::load_settings();
    logging::init(&settings.logging);
    if let Some(problem) = settings_problem {
        warn!("{problem}");
    }

    let mut args = env::args().skip(1);
    let dir = args
        .next()
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let query = args.next();

    let catalog = Arc::new(LocalCatalog::open(&dir, &settings.library)?);
    // The library root serves the media unless a base address was configured.
    let base = settings
        .media
        .base_address
        .clone()
        .unwrap_or_else(|| catalog.root().to_string_lossy().into_owned());
    let resolver = MediaResolver::new(base);
    info!(media = resolver.base(), "media base address");

    let (engine, engine_events) =
        RodioEngine::spawn(Duration::from_millis(settings.playback.tick_ms))?;
    let mut controller = PlaybackController::new(engine, resolver, settings.playback.volume);

    let (remote, control_rx) = PlayerRemote::channel();
    if settings.mpris.enabled {
        crate::mpris::spawn_mpris(remote.clone(), controller.subscribe());
    }
    now_playing::spawn(controller.subscribe());

    let queued = match query {
        Some(q) => startup::queue_search(
            &mut controller,
            catalog.clone(),
            &q,
            Duration::from_millis(settings.search.debounce_ms),
        )?,
        None => startup::queue_library(&mut controller, catalog.as_ref())?,
    };
    info!(tracks = queued, library = %dir.display(), "cadence ready");

    // Observers hold their own remotes. Without any, the loop ends with the queue.
    drop(remote);
    event_loop::run(&mut controller, &engine_events, &control_rx);

    controller.shutdown(Duration::from_millis(settings.playback.quit_fade_out_ms));
    Ok(())
}
