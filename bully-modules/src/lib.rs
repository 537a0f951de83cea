//! Pluggable collaborators for the bully node: in-process and TCP peer transports,
//! static cluster configuration, bootstrap peer table and election timers.

#[macro_use]
extern crate log;
extern crate bully;
extern crate crossbeam_channel;
extern crate serde;
extern crate serde_json;

mod cluster;
mod communication;
mod election;
mod service_discovery;

pub use cluster::ClusterConfiguration;
pub use communication::duplex_channel::DuplexChannel;
pub use communication::inproc::inproc_peer_communicator::InProcPeerCommunicator;
pub use communication::network::network_peer_communicator::NetworkPeerCommunicator;
pub use election::fixed_election_timer::FixedElectionTimer;
pub use election::randomized_election_timer::RandomizedElectionTimer;
pub use service_discovery::static_table::{PeerEntry, StaticTableServiceDiscovery};
pub use service_discovery::PeerCommunicatorServiceDiscovery;
