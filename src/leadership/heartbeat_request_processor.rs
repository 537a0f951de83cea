use std::time::Instant;

use crate::communication::peers::{validate_sender, HeartbeatRequest, HeartbeatResponse};
use crate::errors::Result;
use crate::node::state::ProtectedNode;
use crate::Cluster;

/// Any heartbeat demotes the node to follower, whatever the identity of the sender.
pub fn process_heartbeat_request<Cl: Cluster>(
    request: HeartbeatRequest,
    protected_node: &ProtectedNode,
    cluster_configuration: &Cl,
) -> Result<HeartbeatResponse> {
    let mut node = protected_node.lock();

    validate_sender(node.id, request.leader_id, cluster_configuration)?;

    trace!("Node {} Heartbeat received from node {}", node.id, request.leader_id);

    node.become_follower();
    node.reset_failure_detector(Instant::now());

    Ok(HeartbeatResponse {
        success: true,
        peer_id: node.id,
    })
}
