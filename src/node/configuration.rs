use std::time::Duration;

use crate::communication::peers::{PeerRequestChannels, PeerRequestHandler};
use crate::ElectionTimer;

/// Protocol cadences of the node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct NodeTimings {
    /// Period of the leader heartbeats.
    pub heartbeat_interval: Duration,

    /// Time a candidate waits for a higher-priority rival before self-promotion.
    pub candidacy_window: Duration,

    /// Pause between the election rounds of a candidacy.
    pub election_round_pause: Duration,
}

impl Default for NodeTimings {
    fn default() -> Self {
        NodeTimings {
            heartbeat_interval: Duration::from_millis(200),
            candidacy_window: Duration::from_millis(5000),
            election_round_pause: Duration::from_millis(200),
        }
    }
}

/// Static membership view of the cluster.
pub trait Cluster: Send + Sync + Clone + 'static {
    /// All node ids in ascending order, including the caller.
    fn all_nodes(&self) -> Vec<u64>;

    /// All node ids except the provided one, in ascending order.
    fn peers(&self, node_id: u64) -> Vec<u64> {
        let mut peer_ids = self.all_nodes();
        peer_ids.retain(|&x| x != node_id);
        peer_ids.sort();

        peer_ids
    }

    fn is_member(&self, node_id: u64) -> bool {
        self.all_nodes().contains(&node_id)
    }
}

#[derive(Clone, Debug)]
pub struct NodeConfiguration<Pc, Et, Cl>
where
    Pc: PeerRequestHandler + PeerRequestChannels,
    Et: ElectionTimer,
    Cl: Cluster,
{
    pub node_id: u64,
    pub cluster_configuration: Cl,
    pub peer_communicator: Pc,
    pub election_timer: Et,
    pub timings: NodeTimings,
}
