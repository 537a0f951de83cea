use crossbeam_channel::Receiver;
use std::time::Instant;

use crate::leadership::watchdog::watchdog_handler::LeadershipStatusWatchdogHandler;
use crate::node::state::ProtectedNode;

pub struct WatchLeaderStatusParams {
    pub protected_node: ProtectedNode,
    pub watchdog_handler: LeadershipStatusWatchdogHandler,
}

/// Failure detector worker. Sleeps until the detector expiry and fires it,
/// every reset wakes it up to recompute the wait.
pub fn watch_leader_status(params: WatchLeaderStatusParams, terminate_worker_rx: Receiver<()>) {
    info!("Watch leader expiration status worker started");
    loop {
        let remaining = {
            let node = params.protected_node.lock();
            node.failure_detector().remaining(Instant::now())
        };
        let timeout = crossbeam_channel::after(remaining);
        select!(
            recv(terminate_worker_rx) -> res  => {
                if res.is_err() {
                    error!("Abnormal exit for watch leader expiration status worker");
                }
                break
            },
            recv(timeout) -> _  => {
                let mut node = params.protected_node.lock();
                node.fire_failure_detector(Instant::now());
            },
            recv(params.watchdog_handler.reset_leadership_watchdog_rx()) -> reset_result => {
                if let Err(err) = reset_result {
                    error!("Invalid result from watchdog_event_rx: {}", err);
                }
                continue
            },
        );
    }
    info!("Watch leader expiration status worker stopped");
}
