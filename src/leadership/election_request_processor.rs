use std::time::Instant;

use crate::communication::peers::{validate_sender, ElectionRequest, ElectionResponse};
use crate::errors::Result;
use crate::node::state::ProtectedNode;
use crate::Cluster;

/// Bully rule: a node with a higher identity answers 'greater' and starts its own
/// candidacy. Any valid election request re-arms the failure detector.
pub fn process_election_request<Cl: Cluster>(
    request: ElectionRequest,
    protected_node: &ProtectedNode,
    cluster_configuration: &Cl,
) -> Result<ElectionResponse> {
    let mut node = protected_node.lock();

    validate_sender(node.id, request.candidate_id, cluster_configuration)?;

    let now = Instant::now();
    let is_greater = node.id > request.candidate_id;
    if is_greater {
        info!("Node {} Higher than candidate {}. Contending", node.id, request.candidate_id);
        node.become_candidate(now);
    }

    node.reset_failure_detector(now);

    Ok(ElectionResponse {
        is_greater,
        peer_id: node.id,
    })
}
