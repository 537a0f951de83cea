use std::time::Duration;

pub mod election;
pub mod election_request_processor;
pub mod heartbeat_request_processor;
pub mod heartbeat_sender;
pub mod status;
pub mod watchdog;


/// Source of the failure detector interval. Queried once on node start.
pub trait ElectionTimer: Send + 'static {
    fn next_elections_timeout(&self) -> Duration;
}
