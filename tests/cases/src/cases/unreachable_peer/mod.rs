mod unreachable_peer_communicator;

use crate::steps;
use unreachable_peer_communicator::UnreachablePeerCommunicator;

/// Node 4 is a cluster member that never answers. The highest reachable node wins.
pub fn run() {
    let all_nodes = vec![1, 2, 3, 4];
    let running_nodes = vec![1, 2, 3];

    let peer_communicator = UnreachablePeerCommunicator::new(
        steps::get_peer_communicator(all_nodes.clone()),
        vec![4],
    );

    let cluster = steps::cluster::start_initial_cluster(
        running_nodes,
        peer_communicator.clone(),
        |node_id, _, pc| steps::create_node(node_id, all_nodes.clone(), pc),
    );

    let elected = cluster.wait_for_leader(3, steps::get_election_timeout());
    info!("Leaders: {:?}", cluster.leaders());
    assert!(elected, "node 3 was not elected");
    assert!(peer_communicator.blocked_requests() > 0);

    cluster.terminate();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_unreachable_higher_peer() {
        crate::cases::unreachable_peer::run()
    }
}
