use crossbeam_channel::{Receiver, Sender};

/// Wakes the failure detector watcher after a reset so that it recomputes its wait.
#[derive(Debug, Clone)]
pub struct LeadershipStatusWatchdogHandler {
    reset_leadership_watchdog_tx: Sender<()>,
    reset_leadership_watchdog_rx: Receiver<()>,
}

impl LeadershipStatusWatchdogHandler {
    pub fn new() -> LeadershipStatusWatchdogHandler {
        let (reset_leadership_watchdog_tx, reset_leadership_watchdog_rx): (
            Sender<()>,
            Receiver<()>,
        ) = crossbeam_channel::unbounded();

        LeadershipStatusWatchdogHandler {
            reset_leadership_watchdog_tx,
            reset_leadership_watchdog_rx,
        }
    }

    pub fn reset_leadership_status_watchdog(&self) {
        let send_result = self.reset_leadership_watchdog_tx.try_send(());
        if let Err(err) = send_result {
            error!("Cannot send failure detector reset notification: {}", err);
        }
    }

    pub fn reset_leadership_watchdog_rx(&self) -> &Receiver<()> {
        &self.reset_leadership_watchdog_rx
    }
}

impl Default for LeadershipStatusWatchdogHandler {
    fn default() -> Self {
        LeadershipStatusWatchdogHandler::new()
    }
}
