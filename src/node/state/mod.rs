use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::leadership::status::administrator::ElectionsAdministrator;
use crate::leadership::status::{CandidateInfo, RoleChangedEvent};
use crate::leadership::watchdog::watchdog_handler::LeadershipStatusWatchdogHandler;
use crate::leadership::watchdog::FailureDetector;


pub type ProtectedNode = Arc<Mutex<Node>>;

/// Current role of the node. The candidacy deadline lives inside the variant, so a role
/// and its deadline are always read and written together.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Display)]
pub enum Role {
    /// Waits for heartbeats or the failure detector expiry.
    Follower,

    /// Contends for leadership until the deadline.
    #[display(fmt = "Candidate")]
    Candidate { deadline: Instant },

    /// Broadcasts heartbeats.
    Leader,
}

impl Role {
    pub fn is_follower(&self) -> bool {
        *self == Role::Follower
    }

    pub fn is_candidate(&self) -> bool {
        matches!(self, Role::Candidate { .. })
    }

    pub fn is_leader(&self) -> bool {
        *self == Role::Leader
    }
}

/// Per-node protocol context: identity, role and the failure detector.
#[derive(Debug)]
pub struct Node {
    pub id: u64,
    role: Role,
    candidacy: u64,
    candidacy_window: Duration,
    failure_detector: FailureDetector,
    elections_administrator: ElectionsAdministrator,
    watchdog_handler: LeadershipStatusWatchdogHandler,
}

impl Node {
    pub fn new(
        id: u64,
        failure_detector_interval: Duration,
        candidacy_window: Duration,
        elections_administrator: ElectionsAdministrator,
        watchdog_handler: LeadershipStatusWatchdogHandler,
    ) -> Node {
        Node {
            id,
            role: Role::Follower,
            candidacy: 0,
            candidacy_window,
            failure_detector: FailureDetector::new(failure_detector_interval, Instant::now()),
            elections_administrator,
            watchdog_handler,
        }
    }

    /// Returns the current role together with its candidacy deadline.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Counter of started candidacies.
    pub fn candidacy(&self) -> u64 {
        self.candidacy
    }

    pub fn failure_detector(&self) -> &FailureDetector {
        &self.failure_detector
    }

    /// Replaces the current role. Starting a candidacy always counts as a change,
    /// even for a node that is already a candidate.
    pub fn transition_to(&mut self, role: Role) {
        let previous = self.role;
        self.role = role;

        let event = match role {
            Role::Candidate { deadline } => {
                self.candidacy += 1;
                RoleChangedEvent::CandidacyStarted(CandidateInfo {
                    candidate_id: self.id,
                    candidacy: self.candidacy,
                    deadline,
                })
            }
            Role::Leader => RoleChangedEvent::PromotedToLeader(self.id),
            Role::Follower => RoleChangedEvent::ResetToFollower(self.id),
        };

        if previous.is_candidate() && role.is_candidate() {
            debug!("Node {} Candidacy {} deadline refreshed", self.id, self.candidacy);
        } else if previous != role {
            info!("Node {} Status changed from {} to {}", self.id, previous, role);
        } else {
            return;
        }

        self.elections_administrator.notify_role_changed(event);
    }

    pub fn become_candidate(&mut self, now: Instant) {
        let deadline = now + self.candidacy_window;
        self.transition_to(Role::Candidate { deadline });
    }

    pub fn become_follower(&mut self) {
        self.transition_to(Role::Follower);
    }

    /// Gives up the candidacy if it is still the current one.
    pub fn withdraw_candidacy(&mut self, candidacy: u64) -> bool {
        if self.role.is_candidate() && self.candidacy == candidacy {
            self.become_follower();
            return true;
        }

        false
    }

    /// True while the node is a candidate of this candidacy and its deadline is ahead.
    pub fn is_candidacy_active(&self, candidacy: u64, now: Instant) -> bool {
        match self.role {
            Role::Candidate { deadline } => self.candidacy == candidacy && now < deadline,
            _ => false,
        }
    }

    /// Promotes a candidate whose deadline elapsed.
    pub fn promote_if_deadline_elapsed(&mut self, now: Instant) -> bool {
        if let Role::Candidate { deadline } = self.role {
            if now >= deadline {
                self.transition_to(Role::Leader);
                return true;
            }
        }

        false
    }

    /// Re-arms the failure detector with its start-up interval.
    pub fn reset_failure_detector(&mut self, now: Instant) {
        self.failure_detector.rearm(now);
        self.watchdog_handler.reset_leadership_status_watchdog();
    }

    /// Handles the expiry of the failure detector. A follower becomes a candidate,
    /// other roles only re-arm. Returns false if the detector was re-armed meanwhile.
    pub fn fire_failure_detector(&mut self, now: Instant) -> bool {
        if !self.failure_detector.is_expired(now) {
            return false;
        }

        if self.role.is_follower() {
            info!("Node {} Failure detected. Starting new election", self.id);
            self.become_candidate(now);
        } else {
            trace!("Node {} Failure detector fired while {}", self.id, self.role);
        }

        self.reset_failure_detector(now);

        true
    }
}
