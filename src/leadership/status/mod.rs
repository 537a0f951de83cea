use std::time::Instant;

pub mod administrator;
pub mod node_leadership_fsm;

/// Notifies the leadership status watcher about role transitions.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RoleChangedEvent {
    CandidacyStarted(CandidateInfo),
    PromotedToLeader(u64), //node id
    ResetToFollower(u64),  //node id
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CandidateInfo {
    pub candidate_id: u64,
    pub candidacy: u64,
    pub deadline: Instant,
}
