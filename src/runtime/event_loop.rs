use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

use tracing::{debug, warn};

use crate::engine::{Engine, EngineNotice};
use crate::player::{ControlCmd, PlaybackController};

/// How long to wait for a command before checking engine events again.
const POLL: Duration = Duration::from_millis(50);

/// Feed engine events and observer commands to the controller, one at a
/// time and in arrival order.
///
/// Returns on a quit command. Once every remote is gone nothing can restart
/// playback, so the loop also returns as soon as the session stops playing.
pub fn run<E: Engine>(
    controller: &mut PlaybackController<E>,
    engine_events: &Receiver<EngineNotice>,
    control_rx: &Receiver<ControlCmd>,
) {
    let mut engine_gone = false;
    let mut remotes_gone = false;

    loop {
        if !engine_gone {
            loop {
                match engine_events.try_recv() {
                    Ok(notice) => controller.handle_event(notice),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        warn!("audio engine stopped reporting events");
                        engine_gone = true;
                        break;
                    }
                }
            }
        }

        if remotes_gone {
            if !controller.session().is_playing || engine_gone {
                debug!("playback finished with no remotes attached");
                return;
            }
            std::thread::sleep(POLL);
            continue;
        }

        match control_rx.recv_timeout(POLL) {
            Ok(ControlCmd::Player(cmd)) => controller.dispatch(cmd),
            Ok(ControlCmd::Quit) => {
                debug!("quit requested");
                return;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                debug!("all remotes dropped");
                remotes_gone = true;
            }
        }
    }
}
