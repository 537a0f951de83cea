//! # Bully leader election
//!
//! Every node watches the liveness of the current leader with a failure detector. When
//! it expires, the node becomes a candidate and sends an election request to all peers.
//! Any peer with a higher identity answers 'greater' and contends itself, the candidate
//! then withdraws. A candidate that is not contradicted before its deadline becomes the
//! leader and broadcasts heartbeats, which demote every receiver to follower.
//!
//! Transport and cluster membership are plugged in through the [`PeerRequestHandler`],
//! [`PeerRequestChannels`] and [`Cluster`] traits.

#![warn(missing_debug_implementations, unsafe_code)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate crossbeam_channel;
#[macro_use]
extern crate derive_more;

mod common;
mod communication;
mod errors;
mod leadership;
mod node;
mod request_handler;

pub use communication::peers::{
    ElectionRequest, ElectionResponse, HeartbeatRequest, HeartbeatResponse,
};
pub use communication::peers::{PeerRequest, PeerRequestChannels, PeerRequestHandler};
pub use errors::{new_err, BullyError, BullyErrorKind};
pub use leadership::ElectionTimer;
pub use node::configuration::{Cluster, NodeConfiguration, NodeTimings};
pub use node::state::Role;
pub use node::NodeWorker;

/// Starts all node workers: failure detector, leadership status watcher,
/// heartbeat sender and peer request processor.
pub fn start_node<Pc, Et, Cl>(
    node_config: NodeConfiguration<Pc, Et, Cl>,
) -> Result<NodeWorker, BullyError>
where
    Pc: PeerRequestHandler + PeerRequestChannels,
    Et: ElectionTimer,
    Cl: Cluster,
{
    node::start_node(node_config)
}
