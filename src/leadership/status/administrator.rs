use crate::leadership::status::RoleChangedEvent;
use crossbeam_channel::{Receiver, Sender};

/// Channel pair carrying role transitions from the node state to the status watcher.
#[derive(Debug, Clone)]
pub struct ElectionsAdministrator {
    role_changed_tx: Sender<RoleChangedEvent>,
    role_changed_rx: Receiver<RoleChangedEvent>,
}

impl ElectionsAdministrator {
    pub fn new() -> ElectionsAdministrator {
        let (role_changed_tx, role_changed_rx): (
            Sender<RoleChangedEvent>,
            Receiver<RoleChangedEvent>,
        ) = crossbeam_channel::unbounded();

        ElectionsAdministrator {
            role_changed_tx,
            role_changed_rx,
        }
    }

    pub fn notify_role_changed(&self, event: RoleChangedEvent) {
        if let Err(err) = self.role_changed_tx.try_send(event) {
            error!("Cannot send role changed event: {}", err);
        }
    }

    pub fn role_changed_rx(&self) -> &Receiver<RoleChangedEvent> {
        &self.role_changed_rx
    }
}

impl Default for ElectionsAdministrator {
    fn default() -> Self {
        ElectionsAdministrator::new()
    }
}
